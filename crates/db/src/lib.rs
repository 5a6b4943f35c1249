pub mod connection;
pub mod fixtures;
pub mod lifecycle;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use fixtures::{SeedDataset, SeedResult, VerificationResult};
pub use lifecycle::{duplicate_quote, generate_quote, LifecycleError};
pub use repositories::{
    InMemoryProductRepository, InMemoryQuotationCounter, InMemoryQuoteRepository,
    ProductRepository, QuotationNumberSource, QuoteRepository, RepositoryError,
    SqlProductRepository, SqlQuotationCounter, SqlQuoteRepository,
};
