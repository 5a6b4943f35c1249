use std::collections::HashMap;

use tokio::sync::{Mutex, RwLock};

use quoteforge_core::domain::catalog::{Product, ProductId};
use quoteforge_core::domain::quote::{Quote, QuoteId, QuoteStatus};

use super::{ProductRepository, QuotationNumberSource, QuoteRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<String, Product>>,
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.get(&id.0).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        let mut list: Vec<Product> = products.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(list)
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        products.insert(product.id.0.clone(), product);
        Ok(())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        products.remove(&id.0);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuoteRepository {
    quotes: RwLock<HashMap<String, Quote>>,
}

#[async_trait::async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn find_by_id(&self, id: &QuoteId) -> Result<Option<Quote>, RepositoryError> {
        let quotes = self.quotes.read().await;
        Ok(quotes.get(&id.0).cloned())
    }

    async fn list(&self) -> Result<Vec<Quote>, RepositoryError> {
        let quotes = self.quotes.read().await;
        let mut list: Vec<Quote> = quotes.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(list)
    }

    async fn create(&self, quote: Quote) -> Result<(), RepositoryError> {
        let mut quotes = self.quotes.write().await;
        quotes.insert(quote.id.0.clone(), quote);
        Ok(())
    }

    async fn update(&self, quote: Quote) -> Result<(), RepositoryError> {
        let mut quotes = self.quotes.write().await;
        match quotes.get(&quote.id.0) {
            Some(stored) if stored.status == QuoteStatus::Generated => {
                Err(RepositoryError::QuoteLocked(quote.id.0.clone()))
            }
            Some(_) => {
                quotes.insert(quote.id.0.clone(), quote);
                Ok(())
            }
            None => Err(RepositoryError::Database(sqlx::Error::RowNotFound)),
        }
    }

    async fn delete(&self, id: &QuoteId) -> Result<(), RepositoryError> {
        let mut quotes = self.quotes.write().await;
        match quotes.get(&id.0) {
            Some(stored) if stored.status == QuoteStatus::Generated => {
                Err(RepositoryError::QuoteLocked(id.0.clone()))
            }
            _ => {
                quotes.remove(&id.0);
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct InMemoryQuotationCounter {
    sequences: Mutex<HashMap<i32, u32>>,
}

#[async_trait::async_trait]
impl QuotationNumberSource for InMemoryQuotationCounter {
    async fn next_sequence(&self, year: i32) -> Result<u32, RepositoryError> {
        let mut sequences = self.sequences.lock().await;
        let sequence = sequences.entry(year).or_insert(0);
        *sequence += 1;
        Ok(*sequence)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use quoteforge_core::domain::catalog::{Product, ProductId};
    use quoteforge_core::domain::quote::{ClientDetails, Quote, QuoteId};

    use crate::repositories::{
        InMemoryProductRepository, InMemoryQuotationCounter, InMemoryQuoteRepository,
        ProductRepository, QuotationNumberSource, QuoteRepository, RepositoryError,
    };

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: name.to_string(),
            category: String::new(),
            description: String::new(),
            website_link: String::new(),
            key_features: String::new(),
            setup_fee: Decimal::ZERO,
            pricing_plans: Vec::new(),
            add_ons: Vec::new(),
        }
    }

    #[tokio::test]
    async fn product_repo_round_trip_and_snapshot() {
        let repo = InMemoryProductRepository::default();
        repo.save(product("p-2", "Billing")).await.expect("save");
        repo.save(product("p-1", "Analytics")).await.expect("save");

        let snapshot = repo.snapshot().await.expect("snapshot");
        assert_eq!(snapshot.products().len(), 2);
        assert_eq!(snapshot.products()[0].name, "Analytics");
    }

    #[tokio::test]
    async fn quote_repo_guards_the_edit_path() {
        let repo = InMemoryQuoteRepository::default();
        let mut quote =
            Quote::new(QuoteId("q-1".to_string()), ClientDetails::default(), Utc::now());
        repo.create(quote.clone()).await.expect("create");

        quote.generate("Q-2026-001".to_string()).expect("generate");
        repo.update(quote.clone()).await.expect("transition persists");

        let error = repo.update(quote).await.expect_err("locked after generation");
        assert!(matches!(error, RepositoryError::QuoteLocked(_)));
    }

    #[tokio::test]
    async fn counter_is_per_year() {
        let counter = InMemoryQuotationCounter::default();
        assert_eq!(counter.next_sequence(2026).await.expect("seq"), 1);
        assert_eq!(counter.next_sequence(2026).await.expect("seq"), 2);
        assert_eq!(counter.next_sequence(2025).await.expect("seq"), 1);
    }
}
