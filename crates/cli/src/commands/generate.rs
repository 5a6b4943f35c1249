use chrono::Utc;

use quoteforge_core::domain::quote::QuoteId;
use quoteforge_db::{generate_quote, LifecycleError, SqlQuotationCounter, SqlQuoteRepository};

use crate::commands::{build_runtime, connect_and_migrate, load_config, CommandResult};

pub fn run(quote_id: &str) -> CommandResult {
    let config = match load_config("generate") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let runtime = match build_runtime("generate") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = connect_and_migrate(&config).await?;

        let quotes = SqlQuoteRepository::new(pool.clone());
        let numbers = SqlQuotationCounter::new(pool.clone());
        let generated =
            generate_quote(&quotes, &numbers, &QuoteId(quote_id.to_string()), Utc::now())
                .await
                .map_err(|error| (lifecycle_error_class(&error), error.to_string(), 6u8))?;
        pool.close().await;

        Ok::<String, (&'static str, String, u8)>(format!(
            "quote `{}` generated as {}",
            generated.id.0,
            generated.quotation_number.as_deref().unwrap_or("<unnumbered>")
        ))
    });

    match result {
        Ok(message) => CommandResult::success("generate", message),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("generate", error_class, message, exit_code)
        }
    }
}

fn lifecycle_error_class(error: &LifecycleError) -> &'static str {
    match error {
        LifecycleError::NotFound(_) => "quote_missing",
        LifecycleError::Domain(_) => "invalid_transition",
        LifecycleError::Repository(_) => "persistence",
    }
}
