//! `cachebust` command-line tool

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cachebust::cli::{CliConfig, Commands, OutputFormat, execute_command, output::print_error};

#[derive(Parser)]
#[command(name = "cachebust")]
#[command(about = "Inspect and exercise the cache invalidation registry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,

    /// Configuration file (TOML, or JSON by extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// File backing the persisted audit log
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum CliCommand {
    /// List action identifiers
    Actions {
        /// Only list actions of this domain
        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Show the patterns an action clears
    Patterns {
        /// Action identifier, e.g. fishing:catch
        action: String,
    },

    /// Dispatch actions and print the clear calls they issue
    Invalidate {
        /// Action identifiers
        #[arg(required = true)]
        actions: Vec<String>,

        /// Log each dispatch
        #[arg(long)]
        debug: bool,
    },

    /// Print the persisted audit log
    Audit,

    /// Run a visibility sweep after hiding the page
    Simulate {
        /// How long the page stays hidden
        #[arg(long)]
        hidden_ms: u64,
    },

    /// Print staleness tiers with thresholds and patterns
    Tiers,

    /// Print the effective registry configuration as TOML
    Config,
}

impl From<CliCommand> for Commands {
    fn from(command: CliCommand) -> Self {
        match command {
            CliCommand::Actions { domain } => Commands::Actions { domain },
            CliCommand::Patterns { action } => Commands::Patterns { action },
            CliCommand::Invalidate { actions, debug } => Commands::Invalidate { actions, debug },
            CliCommand::Audit => Commands::Audit,
            CliCommand::Simulate { hidden_ms } => Commands::Simulate { hidden_ms },
            CliCommand::Tiers => Commands::Tiers,
            CliCommand::Config => Commands::Config,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Library logs go through `log`; the subscriber bridges them to stderr
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig {
        config_file: cli.config,
        session_file: cli.session_file,
        output_format: cli.format,
        quiet: cli.quiet,
    };
    let quiet = config.quiet;

    if let Err(err) = execute_command(cli.command.into(), config) {
        print_error(&err.to_string(), quiet);
        std::process::exit(err.exit_code());
    }
}
