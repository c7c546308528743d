//! loc-diff: multi-version line-of-code diff and accounting tool
//!
//! Counts base, deleted, modified and added lines between versions of files
//! or source trees, and renders redlines of the changes.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use loc_diff::{
    cli,
    config::{AppConfig, CompareConfig, ConfigError, Validatable},
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with filter and format info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nBuilt-in Language Filters:",
        "\n  c, rust, shell, sql, html, pascal, cobol, generic",
        "\n\nOutput Formats:",
        "\n  summary, count, json, redline, html",
        "\n\nAccounting:",
        "\n  Base, Deleted, Modified, Added, Total = Base + Modified + Added"
    )
}

#[derive(Parser)]
#[command(name = "loc-diff")]
#[command(version, long_version = build_long_version())]
#[command(about = "Multi-version line-of-code diff and accounting tool", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success (no changes, or no --fail-on-change)
    1  Changes detected with --fail-on-change
    3  Error occurred

EXAMPLES:
    # Compare two releases of a source tree
    loc-diff diff release-1.0/ release-1.1/

    # Browsable redline report
    loc-diff diff old/ new/ -O redline.html

    # COBOL scope terminators count as code
    loc-diff diff old.cbl new.cbl --options \"-countEnd -countExit\"

    # Three-way: base and two descendants
    loc-diff diff3 base.c mine.c theirs.c -o redline

    # Size of a tree, as a single number
    loc-diff count src/ -o count")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Options shared by the analyzing subcommands
#[derive(Parser)]
struct AnalysisArgs {
    /// Option string, e.g. "-lang=cobol -countEnd -tabWidth=4"
    #[arg(long, allow_hyphen_values = true)]
    options: Option<String>,

    /// Force a language filter by name (see `loc-diff filters`)
    #[arg(long)]
    language: Option<String>,

    /// Output format (auto picks from the output file extension, summary otherwise)
    #[arg(short, long, default_value = "auto")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// YAML file with extra language filter definitions
    #[arg(long)]
    filters_file: Option<PathBuf>,
}

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// The older file or directory
    before: PathBuf,

    /// The newer file or directory
    after: PathBuf,

    #[command(flatten)]
    analysis: AnalysisArgs,

    /// Exit with code 1 if any line changed
    #[arg(long)]
    fail_on_change: bool,
}

/// Arguments for the `diff3` subcommand
#[derive(Parser)]
struct Diff3Args {
    /// The common ancestor
    base: PathBuf,

    /// The first descendant
    a: PathBuf,

    /// The second descendant
    b: PathBuf,

    #[command(flatten)]
    analysis: AnalysisArgs,

    /// Exit with code 1 if any line changed
    #[arg(long)]
    fail_on_change: bool,
}

/// Arguments for the `count` subcommand
#[derive(Parser)]
struct CountArgs {
    /// File or directory to count
    path: PathBuf,

    #[command(flatten)]
    analysis: AnalysisArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two files or directory trees
    Diff(DiffArgs),

    /// Compare a base file with two descendants
    Diff3(Diff3Args),

    /// Count the significant lines of a file or tree
    Count(CountArgs),

    /// List the registered language filters
    Filters {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// YAML file with extra language filter definitions
        #[arg(long)]
        filters_file: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .loc-diff.yaml in the current directory
    Init,
}

/// Layer command-line arguments over the discovered config file.
fn effective_config(cli: &Cli, analysis: &AnalysisArgs, fail_on_change: bool) -> Result<AppConfig> {
    let overrides = AppConfig::builder()
        .output_format(analysis.output)
        .output_file(analysis.output_file.clone())
        .no_color(cli.no_color)
        .fail_on_change(fail_on_change)
        .quiet(cli.quiet)
        .language(analysis.language.clone())
        .options(analysis.options.clone())
        .filter_definitions_file(analysis.filters_file.clone())
        .build();

    let (config, loaded_from) = AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let listed: Vec<String> = errors.iter().map(ConfigError::to_string).collect();
        anyhow::bail!("invalid configuration:\n  {}", listed.join("\n  "));
    }
    Ok(config)
}

/// Run an analyzing handler and exit with its code.
fn run_analysis(
    config: AppConfig,
    versions: Vec<PathBuf>,
    handler: fn(CompareConfig, &loc_diff::filter::FilterRegistry) -> Result<i32>,
) -> Result<()> {
    let registry = config
        .filters
        .build_registry()
        .context("failed to build language filters")?;
    let compare = CompareConfig::from_app_config(&config, versions)
        .context("invalid analysis options")?;

    let exit_code = handler(compare, &registry)?;
    if exit_code != exit_codes::SUCCESS {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    if let Err(e) = dispatch(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_codes::ERROR);
    }
}

fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Diff(args) => {
            let config = effective_config(cli, &args.analysis, args.fail_on_change)?;
            run_analysis(
                config,
                vec![args.before.clone(), args.after.clone()],
                cli::run_diff,
            )
        }

        Commands::Diff3(args) => {
            let config = effective_config(cli, &args.analysis, args.fail_on_change)?;
            run_analysis(
                config,
                vec![args.base.clone(), args.a.clone(), args.b.clone()],
                cli::run_diff,
            )
        }

        Commands::Count(args) => {
            let config = effective_config(cli, &args.analysis, false)?;
            run_analysis(config, vec![args.path.clone()], cli::run_count)
        }

        Commands::Filters { json, filters_file } => {
            let (mut config, _) = loc_diff::config::load_or_default(cli.config.as_deref());
            if filters_file.is_some() {
                config.filters.definitions_file.clone_from(filters_file);
            }
            let registry = config
                .filters
                .build_registry()
                .context("failed to build language filters")?;
            cli::run_filters(&registry, *json)
        }

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "loc-diff", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = loc_diff::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    loc_diff::config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    ::dirs::config_dir().map(|p| p.join("loc-diff").display().to_string()),
                    ::dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!("  (plus the enclosing git repository root)");
                eprintln!();
                eprintln!("Recognized file names:");
                for name in loc_diff::config::file::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match loc_diff::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(loc_diff::config::default_config_path());
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = loc_diff::config::generate_full_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}
