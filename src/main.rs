//! oas-tools: semantic OpenAPI contract diff and breaking-change checker.

#![allow(clippy::too_many_lines, clippy::struct_excessive_bools)]

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use oas_tools::{
    checker::{CheckConfig, Lang, Level, Localizer},
    cli::{self, CompareRequest, IgnoreFiles},
    diff::DiffConfig,
    error::OasDiffError,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "oas-tools")]
#[command(version)]
#[command(about = "Semantic OpenAPI contract diff and breaking-change checker", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No changes at or above the failure threshold
    1  Changes at or above the failure threshold
    2  Error occurred (bad flags, unreadable or invalid documents)

EXAMPLES:
    # Human-readable changelog of every change
    oas-tools changelog base.yaml revision.yaml

    # CI gate: fail on breaking changes, with agreed suppressions
    oas-tools breaking base.yaml revision.yaml --err-ignore ignore-errs.txt

    # Raw structured diff for further processing
    oas-tools diff base.yaml revision.yaml --format json > diff.json

    # Contracts split across many files, matched by file name
    oas-tools breaking --composed \"base/*.yaml\" \"revision/*.yaml\"")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every comparing subcommand.
#[derive(Args)]
struct CompareFlags {
    /// Path to the base (old) OpenAPI document, or a glob with --composed
    base: String,

    /// Path to the revised (new) OpenAPI document, or a glob with --composed
    revision: String,

    /// Treat base and revision as glob patterns and pair files by name
    #[arg(short, long)]
    composed: bool,

    /// Only compare paths matching this regular expression
    #[arg(long, value_name = "REGEX")]
    match_path: Option<String>,

    /// Prefix added to base paths before matching
    #[arg(long, default_value = "")]
    prefix_base: String,

    /// Prefix added to revision paths before matching
    #[arg(long, default_value = "")]
    prefix_revision: String,

    /// Prefix stripped from base paths before matching
    #[arg(long, default_value = "")]
    strip_prefix_base: String,

    /// Prefix stripped from revision paths before matching
    #[arg(long, default_value = "")]
    strip_prefix_revision: String,

    /// Keep path parameter names significant when matching endpoints
    #[arg(long)]
    include_path_params: bool,

    /// Elements to exclude from comparison
    /// (description, examples, extensions, servers, security)
    #[arg(long, value_delimiter = ',')]
    exclude_elements: Vec<String>,

    /// Maximum reference-chain expansions before a schema branch is marked
    /// circular
    #[arg(long = "max-circular-dep", value_name = "N", default_value = "5")]
    max_circular_refs: usize,
}

/// Flags shared by the checker-backed subcommands.
#[derive(Args)]
struct CheckFlags {
    /// Output format
    #[arg(short, long, default_value = "text")]
    format: ReportFormat,

    /// Report language
    #[arg(long, env = "OAS_TOOLS_LANG", default_value = "en")]
    lang: Lang,

    /// Optional checks to enable, by id
    #[arg(long, value_delimiter = ',', value_name = "ID")]
    include_checks: Vec<String>,

    /// Minimum days between deprecation and sunset for alpha/beta operations
    #[arg(long, default_value = "31")]
    deprecation_days_beta: i64,

    /// Minimum days between deprecation and sunset for stable operations
    #[arg(long, default_value = "180")]
    deprecation_days_stable: i64,

    /// Suppression file for warning-level findings
    #[arg(long, value_name = "PATH")]
    warn_ignore: Option<PathBuf>,

    /// Suppression file for error-level findings
    #[arg(long, value_name = "PATH")]
    err_ignore: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report every change between two contracts, informational included
    Changelog {
        #[command(flatten)]
        compare: CompareFlags,

        #[command(flatten)]
        check: CheckFlags,

        /// Exit with code 1 when findings at or above this level remain
        #[arg(long, value_enum)]
        fail_on: Option<Level>,
    },

    /// Report backward-incompatible changes (warnings and errors)
    Breaking {
        #[command(flatten)]
        compare: CompareFlags,

        #[command(flatten)]
        check: CheckFlags,

        /// Exit with code 1 when findings at or above this level remain
        #[arg(long, value_enum, default_value = "err")]
        fail_on: Level,
    },

    /// Emit the raw structured diff without running any checks
    Diff {
        #[command(flatten)]
        compare: CompareFlags,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: ReportFormat,

        /// Exit with code 1 when the documents differ
        #[arg(long)]
        fail_on_diff: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn build_diff_config(flags: &CompareFlags, breaking_only: bool) -> Result<DiffConfig, OasDiffError> {
    let mut config = DiffConfig {
        breaking_only,
        max_circular_refs: flags.max_circular_refs,
        path_prefix_base: flags.prefix_base.clone(),
        path_prefix_revision: flags.prefix_revision.clone(),
        path_strip_prefix_base: flags.strip_prefix_base.clone(),
        path_strip_prefix_revision: flags.strip_prefix_revision.clone(),
        include_path_params: flags.include_path_params,
        ..DiffConfig::new()
    }
    .with_exclude_elements(&flags.exclude_elements)?;
    if let Some(pattern) = &flags.match_path {
        config = config.with_path_filter(pattern)?;
    }
    Ok(config)
}

fn build_check_config(flags: &CheckFlags) -> Result<CheckConfig, OasDiffError> {
    CheckConfig {
        localizer: Localizer::new(flags.lang),
        deprecation_days_beta: flags.deprecation_days_beta,
        deprecation_days_stable: flags.deprecation_days_stable,
        ..CheckConfig::default()
    }
    .with_include_checks(&flags.include_checks)
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    Ok(match cli.command {
        Commands::Changelog {
            compare,
            check,
            fail_on,
        } => {
            let diff_config = build_diff_config(&compare, false)?;
            let check_config = build_check_config(&check)?;
            cli::run_changelog(
                &CompareRequest {
                    base: &compare.base,
                    revision: &compare.revision,
                    composed: compare.composed,
                    diff_config: &diff_config,
                },
                &check_config,
                check.format,
                fail_on,
                &IgnoreFiles {
                    warn: check.warn_ignore,
                    err: check.err_ignore,
                },
            )?
        }

        Commands::Breaking {
            compare,
            check,
            fail_on,
        } => {
            let diff_config = build_diff_config(&compare, true)?;
            let check_config = build_check_config(&check)?;
            cli::run_breaking(
                &CompareRequest {
                    base: &compare.base,
                    revision: &compare.revision,
                    composed: compare.composed,
                    diff_config: &diff_config,
                },
                &check_config,
                check.format,
                fail_on,
                &IgnoreFiles {
                    warn: check.warn_ignore,
                    err: check.err_ignore,
                },
            )?
        }

        Commands::Diff {
            compare,
            format,
            fail_on_diff,
        } => {
            let diff_config = build_diff_config(&compare, false)?;
            cli::run_diff(
                &CompareRequest {
                    base: &compare.base,
                    revision: &compare.revision,
                    composed: compare.composed,
                    diff_config: &diff_config,
                },
                format,
                fail_on_diff,
            )?
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "oas-tools", &mut io::stdout());
            0
        }
    })
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            for cause in err.chain().skip(1) {
                eprintln!("  caused by: {cause}");
            }
            let code = err
                .downcast_ref::<OasDiffError>()
                .map_or(2, OasDiffError::exit_code);
            std::process::exit(code);
        }
    }
}
