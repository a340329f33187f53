//! board2kconf: version identity and requirement checks
//!
//! Evaluates requirement lines against installed versions and reports the
//! firmware checkout's build.

use anyhow::{Context, Result};
use board2kconf::{
    cli::{self, exit_codes, GitDescribe},
    config::{self, OutputFormat, Validatable},
    AppConfig, Distribution, InstallationCache,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "board2kconf")]
#[command(version)]
#[command(about = "Version requirement and firmware build checks", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Every requirement satisfied
    1  A requirement or minimum feature line not met
    3  Error occurred

EXAMPLES:
    # Check a version against a requirement
    board2kconf satisfies 2.1.1 '>=2.1, !=2.1.1'

    # Check configured dependencies against installed versions
    board2kconf deps urwid=2.2 pyserial=3.5

    # Inspect the firmware checkout
    board2kconf firmware --min-line 12")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Output format for reports
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a version against a comma-separated requirement
    Satisfies {
        /// Candidate version
        version: String,

        /// Requirement such as ">=1.0, !=1.5"
        requirement: String,
    },

    /// Check configured dependency requirements against installed versions
    Deps {
        /// Installed distributions as NAME=VERSION (or NAME==VERSION)
        #[arg(value_name = "NAME=VERSION")]
        installed: Vec<String>,

        /// Extra requirement lines, replacing the configured ones
        #[arg(short, long = "require", value_name = "LINE")]
        requirements: Vec<String>,
    },

    /// Report the firmware checkout's version
    Firmware {
        /// Parse this `git describe` output instead of locating a checkout
        #[arg(long)]
        describe: Option<String>,

        /// Firmware checkout directory
        #[arg(long)]
        path: Option<PathBuf>,

        /// Fail unless the feature line is at least this
        #[arg(long)]
        min_line: Option<u64>,
    },

    /// Show configuration, its schema or an example file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (defaults + file + flags)
    Show,
    /// Print the JSON Schema of the config file
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print an example config file
    Example,
}

fn main() {
    let cli = Cli::parse();
    let (config, load_failure) = effective_config(&cli);

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let no_color_env = std::env::var_os("NO_COLOR").is_some();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .with_ansi(config.output.use_color(no_color_env)),
        )
        .init();

    if let Some(failure) = load_failure {
        tracing::warn!("{failure}");
    }

    let code = match run(cli, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}

/// Load the file config and layer the global flags over it.
///
/// Runs before logging is set up, so a file that fails to load is returned
/// as a message for the caller to log.
fn effective_config(cli: &Cli) -> (AppConfig, Option<String>) {
    let (mut config, load_failure) = match config::discover_config_file(cli.config.as_deref()) {
        Some(path) => match config::load_config_file(&path) {
            Ok(config) => (config, None),
            Err(e) => (
                AppConfig::default(),
                Some(format!("Failed to load config from {}: {e}", path.display())),
            ),
        },
        None => (AppConfig::default(), None),
    };
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    config.merge(&AppConfig::builder().no_color(cli.no_color).build());
    (config, load_failure)
}

fn ensure_valid(config: &AppConfig) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let listed = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n  ");
    anyhow::bail!("invalid configuration:\n  {listed}")
}

fn run(cli: Cli, mut config: AppConfig) -> Result<i32> {
    match cli.command {
        Commands::Satisfies {
            version,
            requirement,
        } => cli::run_satisfies(&version, &requirement, config.output.format),

        Commands::Deps {
            installed,
            requirements,
        } => {
            if !requirements.is_empty() {
                config.dependencies.requirements = requirements;
            }
            ensure_valid(&config)?;
            let installed = installed
                .iter()
                .map(|entry| {
                    entry
                        .parse::<Distribution>()
                        .with_context(|| format!("invalid installed distribution '{entry}'"))
                })
                .collect::<Result<Vec<_>>>()?;
            cli::run_deps(&config, &installed)
        }

        Commands::Firmware {
            describe,
            path,
            min_line,
        } => {
            config.merge(
                &AppConfig::builder()
                    .firmware_path(path)
                    .min_feature_line(min_line)
                    .build(),
            );
            ensure_valid(&config)?;
            let cache = InstallationCache::new();
            cli::run_firmware(
                &config.firmware,
                describe.as_deref(),
                &cache,
                &GitDescribe::new(),
                config.output.format,
            )
        }

        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let yaml =
                        serde_yaml::to_string(&config).context("failed to serialize config")?;
                    print!("{yaml}");
                }
                ConfigAction::Schema { output } => {
                    let schema = config::generate_json_schema();
                    match output {
                        Some(path) => {
                            std::fs::write(&path, &schema)
                                .with_context(|| format!("failed to write {}", path.display()))?;
                            eprintln!("Schema written to {}", path.display());
                        }
                        None => println!("{schema}"),
                    }
                }
                ConfigAction::Example => print!("{}", config::generate_example_config()),
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "board2kconf", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }
    }
}
