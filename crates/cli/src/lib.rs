pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ridematch_core::config::{AppConfig, ConfigOverrides, LoadOptions, LoggingConfig};

#[derive(Debug, Parser)]
#[command(
    name = "ridematch",
    about = "Ridematch operator CLI",
    long_about = "Parse shopper messages, run recommendations against a catalog file, and inspect configuration.",
    after_help = "Examples:\n  ridematch parse \"em cao 1m6, tầm 40-55tr\"\n  ridematch recommend --catalog catalog.json --history \"thích honda\" \"đi làm hằng ngày\"\n  ridematch config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Log level for stderr output (overrides logging.level)")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Parse a message (plus optional history) into a structured query")]
    Parse {
        #[arg(long, help = "Earlier user message, oldest first; repeatable")]
        history: Vec<String>,
        message: String,
    },
    #[command(about = "Recommend products from a JSON catalog for a message")]
    Recommend {
        #[arg(long, help = "Catalog JSON file (overrides catalog.path)")]
        catalog: Option<PathBuf>,
        #[arg(long, help = "Earlier user message, oldest first; repeatable")]
        history: Vec<String>,
        message: String,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let logging_options = LoadOptions {
        overrides: ConfigOverrides { log_level: cli.log_level, ..ConfigOverrides::default() },
        ..LoadOptions::default()
    };
    if let Ok(config) = AppConfig::load(logging_options) {
        init_logging(&config.logging);
    }

    let result = match cli.command {
        Command::Parse { history, message } => commands::parse::run(&history, &message),
        Command::Recommend { catalog, history, message } => {
            commands::recommend::run(catalog, &history, &message)
        }
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_logging(logging: &LoggingConfig) {
    use ridematch_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}
