//! Message catalogs for finding texts.
//!
//! Each rule id doubles as a message key; an optional explanatory comment
//! lives under `<id>-comment`. Lookups fall back from the requested language
//! to English, and finally to the key itself so an unknown id still produces
//! output instead of an empty report line.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Supported report languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ru,
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            other => Err(format!("unsupported language {other:?}, expected en or ru")),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Ru => write!(f, "ru"),
        }
    }
}

/// Renders message keys into human-readable finding texts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Localizer {
    lang: Lang,
}

impl Localizer {
    #[must_use]
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    /// Render `key` with `{0}`-style placeholders substituted. Unknown keys
    /// come back verbatim.
    #[must_use]
    pub fn localize(&self, key: &str, args: &[&str]) -> String {
        let template = lookup(self.lang, key)
            .or_else(|| lookup(Lang::En, key))
            .unwrap_or(key);
        format(template, args)
    }

    /// Like [`Self::localize`], but an unknown key renders as the empty
    /// string. Used for comments, which most rules do not carry.
    #[must_use]
    pub fn localize_optional(&self, key: &str, args: &[&str]) -> String {
        match lookup(self.lang, key).or_else(|| lookup(Lang::En, key)) {
            Some(template) => format(template, args),
            None => String::new(),
        }
    }
}

fn format(template: &str, args: &[&str]) -> String {
    let mut out = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{i}}}"), arg);
    }
    out
}

fn lookup(lang: Lang, key: &str) -> Option<&'static str> {
    match lang {
        Lang::En => en(key),
        Lang::Ru => ru(key),
    }
}

#[allow(clippy::too_many_lines)]
fn en(key: &str) -> Option<&'static str> {
    Some(match key {
        "total-changes" => "{0} changes: {1} error, {2} warning, {3} info",

        "api-path-added" => "api path added",
        "api-path-removed-without-deprecation" => "api path removed without deprecation",
        "api-removed-without-deprecation" => "api removed without deprecation",
        "api-operation-added" => "endpoint added",
        "api-operation-id-removed" => "api operation id {0} removed",

        "request-parameter-became-required" => {
            "the {0} request parameter {1} became required"
        }
        "new-required-request-parameter" => {
            "added the new required {0} request parameter {1}"
        }
        "request-parameter-removed" => "deleted the {0} request parameter {1}",
        "request-parameter-removed-comment" => {
            "This is safe only if the parameter was deprecated beforehand; \
             clients still sending it may be rejected."
        }
        "request-parameter-type-changed" => {
            "the {0} request parameter {1} type changed from {2} to {3}"
        }
        "request-parameter-min-items-set" => {
            "the {0} request parameter {1} minItems was set to {2}"
        }
        "request-parameter-min-items-set-comment" => {
            "Setting minItems on an existing parameter can reject requests \
             that were previously accepted."
        }
        "request-parameter-min-items-increased" => {
            "the {0} request parameter {1} minItems increased from {2} to {3}"
        }
        "request-parameter-max-length-decreased" => {
            "the {0} request parameter {1} maxLength decreased from {2} to {3}"
        }
        "request-parameter-max-set" => {
            "the {0} request parameter {1} maximum was set to {2}"
        }
        "request-parameter-max-set-comment" => {
            "Requests with values above the new maximum will be rejected."
        }
        "request-parameter-pattern-changed" => {
            "the {0} request parameter {1} pattern changed from {2} to {3}"
        }
        "request-parameter-pattern-changed-comment" => {
            "A changed pattern is only backward compatible if the new pattern \
             is more permissive, which cannot be determined automatically."
        }
        "request-parameter-enum-value-removed" => {
            "removed the enum value {2} of the {0} request parameter {1}"
        }

        "request-body-became-required" => "request body became required",
        "request-media-type-removed" => "removed the request media type {0}",

        "response-success-status-removed" => "removed the success response status {0}",
        "response-non-success-status-removed" => {
            "removed the non-success response status {0}"
        }
        "response-required-property-removed" => {
            "removed the required property {0} from the response status {1}"
        }
        "response-header-removed" => "removed the header {0} from the response status {1}",
        "response-media-type-added" => {
            "added the media type {0} to the response status {1}"
        }

        "api-sunset-date-too-small" => {
            "sunset date {0} is too small, must be at least {1} days from now"
        }
        "api-deprecated-without-sunset" => {
            "operation deprecated without an x-sunset date"
        }

        _ => return None,
    })
}

fn ru(key: &str) -> Option<&'static str> {
    Some(match key {
        "total-changes" => {
            "изменений: {0} (ошибок: {1}, предупреждений: {2}, информационных: {3})"
        }
        "api-path-added" => "добавлен путь api",
        "api-path-removed-without-deprecation" => "путь api удален без устаревания",
        "api-removed-without-deprecation" => "api удален без устаревания",
        "api-operation-added" => "добавлена операция",
        "request-parameter-became-required" => {
            "параметр запроса {1} ({0}) стал обязательным"
        }
        "new-required-request-parameter" => {
            "добавлен новый обязательный параметр запроса {1} ({0})"
        }
        "request-parameter-removed" => "удален параметр запроса {1} ({0})",
        "request-body-became-required" => "тело запроса стало обязательным",
        "request-media-type-removed" => "удален тип содержимого запроса {0}",
        "response-success-status-removed" => "удален успешный статус ответа {0}",
        "response-header-removed" => "удален заголовок {0} из статуса ответа {1}",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_substitution() {
        let l = Localizer::new(Lang::En);
        assert_eq!(
            l.localize("request-parameter-removed", &["query", "filter"]),
            "deleted the query request parameter filter"
        );
    }

    #[test]
    fn test_fallback_ru_to_en_to_key() {
        let l = Localizer::new(Lang::Ru);
        // key missing from the ru catalog falls back to English
        assert!(l
            .localize("request-parameter-pattern-changed", &["q", "f", "a", "b"])
            .starts_with("the q request parameter"));
        // key missing everywhere comes back verbatim
        assert_eq!(l.localize("no-such-key", &[]), "no-such-key");
    }

    #[test]
    fn test_optional_lookup_is_empty_for_missing_comment() {
        let l = Localizer::new(Lang::En);
        assert_eq!(l.localize_optional("api-path-added-comment", &[]), "");
        assert!(!l
            .localize_optional("request-parameter-removed-comment", &[])
            .is_empty());
    }

    #[test]
    fn test_lang_parsing() {
        assert_eq!("EN".parse::<Lang>().unwrap(), Lang::En);
        assert_eq!("ru".parse::<Lang>().unwrap(), Lang::Ru);
        assert!("de".parse::<Lang>().is_err());
    }
}
