//! Regmark CLI - annotate regulatory document text with formatting rules.

mod commands;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "regmark")]
#[command(about = "Annotate regulatory document summaries with rule-based markup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Rule file path (defaults to the per-user config directory)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Format text from a file (or stdin) into annotated markup
    Format {
        /// Input file; reads stdin when omitted
        input: Option<PathBuf>,

        /// Fetch the rule set from this URL before formatting
        #[arg(long)]
        remote: Option<Url>,
    },

    /// Manage and test formatting rules
    Rules {
        #[command(subcommand)]
        command: commands::RulesCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Format { input, remote } => commands::handle_format(input, cli.rules, remote),
        Command::Rules { command } => commands::handle_rules_command(command, cli.rules),
    }
}

/// Logs go to stderr so markup on stdout stays clean
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
