use std::process::ExitCode;

use quoteforge_core::config::{AppConfig, LoadOptions};

fn main() -> ExitCode {
    // Logging failure must not block the command itself; commands report
    // their own errors through structured output.
    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        quoteforge_cli::init_logging(&config);
    }

    quoteforge_cli::run()
}
