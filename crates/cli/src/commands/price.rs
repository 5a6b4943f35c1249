use serde::Serialize;

use quoteforge_core::domain::quote::QuoteId;
use quoteforge_core::pricing::{CostingEngine, DeterministicCostingEngine, QuoteCosting};
use quoteforge_db::{ProductRepository, QuoteRepository, SqlProductRepository, SqlQuoteRepository};

use crate::commands::{build_runtime, connect_and_migrate, load_config, CommandResult};

#[derive(Debug, Serialize)]
struct PriceOutput {
    command: String,
    status: String,
    quote_id: String,
    quotation_number: Option<String>,
    currency_label: String,
    costing: QuoteCosting,
}

pub fn run(quote_id: &str) -> CommandResult {
    let config = match load_config("price") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let runtime = match build_runtime("price") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = connect_and_migrate(&config).await?;

        let catalog = SqlProductRepository::new(pool.clone())
            .snapshot()
            .await
            .map_err(|error| ("catalog_load", error.to_string(), 5u8))?;
        let quote = SqlQuoteRepository::new(pool.clone())
            .find_by_id(&QuoteId(quote_id.to_string()))
            .await
            .map_err(|error| ("quote_load", error.to_string(), 5u8))?
            .ok_or_else(|| ("quote_missing", format!("quote `{quote_id}` not found"), 6u8))?;
        pool.close().await;

        let costing = DeterministicCostingEngine.cost(&catalog, &quote);
        Ok::<PriceOutput, (&'static str, String, u8)>(PriceOutput {
            command: "price".to_string(),
            status: "ok".to_string(),
            quote_id: quote.id.0,
            quotation_number: quote.quotation_number,
            currency_label: config.company.currency_label.clone(),
            costing,
        })
    });

    match result {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(json) => CommandResult { exit_code: 0, output: json },
            Err(error) => {
                CommandResult::failure("price", "serialization", error.to_string(), 7)
            }
        },
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("price", error_class, message, exit_code)
        }
    }
}
