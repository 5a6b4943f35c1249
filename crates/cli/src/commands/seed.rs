use quoteforge_db::SeedDataset;

use crate::commands::{build_runtime, connect_and_migrate, load_config, CommandResult};

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let runtime = match build_runtime("seed") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = connect_and_migrate(&config).await?;

        let seed = SeedDataset::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;
        let verification = SeedDataset::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 5u8))?;
        pool.close().await;

        if !verification.complete {
            return Err((
                "seed_verification",
                format!(
                    "seed incomplete: {} products, {} quotes found",
                    verification.products_found, verification.quotes_found
                ),
                5u8,
            ));
        }

        Ok::<String, (&'static str, String, u8)>(format!(
            "loaded {} products and {} quote(s)",
            seed.products_loaded, seed.quotes_loaded
        ))
    });

    match result {
        Ok(message) => CommandResult::success("seed", message),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}
