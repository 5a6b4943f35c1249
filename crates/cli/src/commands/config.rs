use quoteforge_core::config::{AppConfig, LoadOptions};

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let lines = vec![
        "effective config (source precedence: env > file > default):".to_string(),
        format!("  database.url = {}", config.database.url),
        format!("  database.max_connections = {}", config.database.max_connections),
        format!("  database.timeout_secs = {}", config.database.timeout_secs),
        format!("  company.name = {}", config.company.name),
        format!("  company.email = {}", config.company.email),
        format!("  company.phone = {}", config.company.phone),
        format!("  company.address = {}", config.company.address),
        format!("  company.website = {}", config.company.website),
        format!("  company.currency_label = {}", config.company.currency_label),
        format!("  logging.level = {}", config.logging.level),
        format!("  logging.format = {:?}", config.logging.format),
    ];

    lines.join("\n")
}
