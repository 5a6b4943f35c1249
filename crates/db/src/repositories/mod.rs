use async_trait::async_trait;
use thiserror::Error;

use quoteforge_core::domain::catalog::{Catalog, Product, ProductId};
use quoteforge_core::domain::quote::{Quote, QuoteId};

pub mod memory;
pub mod product;
pub mod quote;

pub use memory::{InMemoryProductRepository, InMemoryQuotationCounter, InMemoryQuoteRepository};
pub use product::SqlProductRepository;
pub use quote::{SqlQuotationCounter, SqlQuoteRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("quote `{0}` has been generated and can no longer be modified")]
    QuoteLocked(String),
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn save(&self, product: Product) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError>;

    /// The catalog snapshot the pricing engine evaluates against.
    async fn snapshot(&self) -> Result<Catalog, RepositoryError> {
        Ok(Catalog::new(self.list().await?))
    }
}

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn find_by_id(&self, id: &QuoteId) -> Result<Option<Quote>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Quote>, RepositoryError>;
    async fn create(&self, quote: Quote) -> Result<(), RepositoryError>;
    /// Edit path: overwrites the stored quote. Rejected with `QuoteLocked`
    /// when the stored row has already been generated.
    async fn update(&self, quote: Quote) -> Result<(), RepositoryError>;
    /// Draft-only; deleting a generated quote is rejected with `QuoteLocked`.
    async fn delete(&self, id: &QuoteId) -> Result<(), RepositoryError>;
}

/// Atomic per-year quotation sequence. Two concurrent calls for the same
/// year always observe distinct sequence numbers.
#[async_trait]
pub trait QuotationNumberSource: Send + Sync {
    async fn next_sequence(&self, year: i32) -> Result<u32, RepositoryError>;
}
