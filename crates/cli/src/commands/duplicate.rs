use chrono::Utc;
use uuid::Uuid;

use quoteforge_core::domain::quote::QuoteId;
use quoteforge_db::{duplicate_quote, LifecycleError, SqlQuoteRepository};

use crate::commands::{build_runtime, connect_and_migrate, load_config, CommandResult};

pub fn run(quote_id: &str) -> CommandResult {
    let config = match load_config("duplicate") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let runtime = match build_runtime("duplicate") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = connect_and_migrate(&config).await?;

        let quotes = SqlQuoteRepository::new(pool.clone());
        let new_id = QuoteId(Uuid::new_v4().to_string());
        let copy = duplicate_quote(&quotes, &QuoteId(quote_id.to_string()), new_id, Utc::now())
            .await
            .map_err(|error| {
                let class = match error {
                    LifecycleError::NotFound(_) => "quote_missing",
                    _ => "persistence",
                };
                (class, error.to_string(), 6u8)
            })?;
        pool.close().await;

        Ok::<String, (&'static str, String, u8)>(format!(
            "quote `{quote_id}` duplicated as draft `{}`",
            copy.id.0
        ))
    });

    match result {
        Ok(message) => CommandResult::success("duplicate", message),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("duplicate", error_class, message, exit_code)
        }
    }
}
