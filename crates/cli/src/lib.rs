pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use quoteforge_core::config::AppConfig;

#[derive(Debug, Parser)]
#[command(
    name = "quoteforge",
    about = "Quoteforge operator CLI",
    long_about = "Manage the quote database, price quotes against the product catalog, and drive the draft-to-generated lifecycle.",
    after_help = "Examples:\n  quoteforge migrate\n  quoteforge seed\n  quoteforge price quote-demo-001\n  quoteforge generate quote-demo-001"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog and draft quote")]
    Seed,
    #[command(about = "Inspect effective configuration values with source precedence")]
    Config,
    #[command(about = "Compute the full cost breakdown and period costs for a quote")]
    Price {
        #[arg(help = "Identifier of the quote to price")]
        quote_id: String,
    },
    #[command(about = "Transition a draft quote to generated, assigning its quotation number")]
    Generate {
        #[arg(help = "Identifier of the draft quote to generate")]
        quote_id: String,
    },
    #[command(about = "Copy a quote into a fresh unnumbered draft")]
    Duplicate {
        #[arg(help = "Identifier of the quote to copy")]
        quote_id: String,
    },
}

pub fn init_logging(config: &AppConfig) {
    use quoteforge_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Price { quote_id } => commands::price::run(&quote_id),
        Command::Generate { quote_id } => commands::generate::run(&quote_id),
        Command::Duplicate { quote_id } => commands::duplicate::run(&quote_id),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
