use chrono::{DateTime, Utc};
use sqlx::Row;

use quoteforge_core::domain::quote::{
    ClientDetails, CustomRequirement, ProductConfiguration, Quote, QuoteDiscount, QuoteId,
    QuoteStatus,
};

use super::{QuotationNumberSource, QuoteRepository, RepositoryError};
use crate::DbPool;

pub struct SqlQuoteRepository {
    pool: DbPool,
}

impl SqlQuoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn stored_status(&self, id: &QuoteId) -> Result<Option<QuoteStatus>, RepositoryError> {
        let row = sqlx::query("SELECT status FROM quote WHERE id = ?1")
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| decode_status(&row.try_get::<String, _>("status")?)).transpose()
    }
}

fn decode_status(raw: &str) -> Result<QuoteStatus, RepositoryError> {
    match raw {
        "draft" => Ok(QuoteStatus::Draft),
        "generated" => Ok(QuoteStatus::Generated),
        other => Err(RepositoryError::Decode(format!("unknown quote status `{other}`"))),
    }
}

fn encode_status(status: QuoteStatus) -> &'static str {
    match status {
        QuoteStatus::Draft => "draft",
        QuoteStatus::Generated => "generated",
    }
}

fn decode_quote(row: &sqlx::sqlite::SqliteRow) -> Result<Quote, RepositoryError> {
    let configurations_json: String = row.try_get("configurations")?;
    let requirements_json: String = row.try_get("custom_requirements")?;
    let discounts_json: String = row.try_get("discounts")?;
    let status: String = row.try_get("status")?;
    let created_at: String = row.try_get("created_at")?;

    let configurations: Vec<ProductConfiguration> = serde_json::from_str(&configurations_json)
        .map_err(|error| RepositoryError::Decode(format!("quote.configurations: {error}")))?;
    let custom_requirements: Vec<CustomRequirement> = serde_json::from_str(&requirements_json)
        .map_err(|error| RepositoryError::Decode(format!("quote.custom_requirements: {error}")))?;
    let discounts: Vec<QuoteDiscount> = serde_json::from_str(&discounts_json)
        .map_err(|error| RepositoryError::Decode(format!("quote.discounts: {error}")))?;

    Ok(Quote {
        id: QuoteId(row.try_get("id")?),
        client: ClientDetails {
            name: row.try_get("client_name")?,
            email: row.try_get("client_email")?,
            company: row.try_get("client_company")?,
            phone: row.try_get("client_phone")?,
        },
        quote_reference: row.try_get("quote_reference")?,
        project_timeline: row.try_get("project_timeline")?,
        additional_notes: row.try_get("additional_notes")?,
        configurations,
        custom_requirements,
        discounts,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|error| RepositoryError::Decode(format!("quote.created_at: {error}")))?
            .with_timezone(&Utc),
        status: decode_status(&status)?,
        quotation_number: row.try_get("quotation_number")?,
    })
}

fn encode_selections(
    quote: &Quote,
) -> Result<(String, String, String), RepositoryError> {
    let configurations = serde_json::to_string(&quote.configurations)
        .map_err(|error| RepositoryError::Decode(format!("quote.configurations: {error}")))?;
    let custom_requirements = serde_json::to_string(&quote.custom_requirements)
        .map_err(|error| RepositoryError::Decode(format!("quote.custom_requirements: {error}")))?;
    let discounts = serde_json::to_string(&quote.discounts)
        .map_err(|error| RepositoryError::Decode(format!("quote.discounts: {error}")))?;
    Ok((configurations, custom_requirements, discounts))
}

#[async_trait::async_trait]
impl QuoteRepository for SqlQuoteRepository {
    async fn find_by_id(&self, id: &QuoteId) -> Result<Option<Quote>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM quote WHERE id = ?1")
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode_quote).transpose()
    }

    async fn list(&self) -> Result<Vec<Quote>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM quote ORDER BY created_at DESC, id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_quote).collect()
    }

    async fn create(&self, quote: Quote) -> Result<(), RepositoryError> {
        let (configurations, custom_requirements, discounts) = encode_selections(&quote)?;

        sqlx::query(
            "INSERT INTO quote \
             (id, client_name, client_email, client_company, client_phone, quote_reference, \
              project_timeline, additional_notes, configurations, custom_requirements, \
              discounts, status, quotation_number, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&quote.id.0)
        .bind(&quote.client.name)
        .bind(&quote.client.email)
        .bind(&quote.client.company)
        .bind(&quote.client.phone)
        .bind(&quote.quote_reference)
        .bind(&quote.project_timeline)
        .bind(&quote.additional_notes)
        .bind(&configurations)
        .bind(&custom_requirements)
        .bind(&discounts)
        .bind(encode_status(quote.status))
        .bind(&quote.quotation_number)
        .bind(quote.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, quote: Quote) -> Result<(), RepositoryError> {
        let (configurations, custom_requirements, discounts) = encode_selections(&quote)?;

        // Guard on the stored status: a generated row may never be
        // overwritten through the edit path.
        let result = sqlx::query(
            "UPDATE quote SET \
               client_name = ?2, client_email = ?3, client_company = ?4, client_phone = ?5, \
               quote_reference = ?6, project_timeline = ?7, additional_notes = ?8, \
               configurations = ?9, custom_requirements = ?10, discounts = ?11, \
               status = ?12, quotation_number = ?13 \
             WHERE id = ?1 AND status = 'draft'",
        )
        .bind(&quote.id.0)
        .bind(&quote.client.name)
        .bind(&quote.client.email)
        .bind(&quote.client.company)
        .bind(&quote.client.phone)
        .bind(&quote.quote_reference)
        .bind(&quote.project_timeline)
        .bind(&quote.additional_notes)
        .bind(&configurations)
        .bind(&custom_requirements)
        .bind(&discounts)
        .bind(encode_status(quote.status))
        .bind(&quote.quotation_number)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.stored_status(&quote.id).await? {
                Some(QuoteStatus::Generated) => {
                    Err(RepositoryError::QuoteLocked(quote.id.0.clone()))
                }
                Some(QuoteStatus::Draft) | None => Err(RepositoryError::Database(
                    sqlx::Error::RowNotFound,
                )),
            };
        }
        Ok(())
    }

    async fn delete(&self, id: &QuoteId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM quote WHERE id = ?1 AND status = 'draft'")
            .bind(&id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            if let Some(QuoteStatus::Generated) = self.stored_status(id).await? {
                return Err(RepositoryError::QuoteLocked(id.0.clone()));
            }
        }
        Ok(())
    }
}

pub struct SqlQuotationCounter {
    pool: DbPool,
}

impl SqlQuotationCounter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl QuotationNumberSource for SqlQuotationCounter {
    async fn next_sequence(&self, year: i32) -> Result<u32, RepositoryError> {
        // Single-statement upsert-and-return keeps assignment atomic; a
        // read-then-increment in two statements could hand out duplicates
        // under concurrent generation.
        let row = sqlx::query(
            "INSERT INTO quotation_counter (year, last_sequence) VALUES (?1, 1) \
             ON CONFLICT(year) DO UPDATE SET last_sequence = last_sequence + 1 \
             RETURNING last_sequence",
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        let sequence: i64 = row.try_get("last_sequence")?;
        u32::try_from(sequence).map_err(|_| {
            RepositoryError::Decode(format!("quotation sequence overflow for year {year}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use quoteforge_core::domain::catalog::{BillingFrequency, PlanId, ProductId};
    use quoteforge_core::domain::quote::{
        ClientDetails, LineDiscount, ProductConfiguration, Quote, QuoteId, QuoteStatus,
    };

    use crate::migrations::run_pending;
    use crate::repositories::{
        QuotationNumberSource, QuoteRepository, RepositoryError, SqlQuotationCounter,
        SqlQuoteRepository,
    };
    use crate::{connect_with_settings, DbPool};

    async fn pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool");
        run_pending(&pool).await.expect("migrations");
        pool
    }

    fn draft(id: &str) -> Quote {
        let mut quote = Quote::new(
            QuoteId(id.to_string()),
            ClientDetails {
                name: "Acme".to_string(),
                email: "ops@acme.example".to_string(),
                company: "Acme Corp".to_string(),
                phone: String::new(),
            },
            Utc::now(),
        );
        quote.configurations.push(ProductConfiguration {
            product_id: ProductId("crm-suite".to_string()),
            plan_id: PlanId("plan-pro".to_string()),
            frequency: BillingFrequency::Monthly,
            selected_add_on_ids: Vec::new(),
            include_setup_cost: true,
            discount: LineDiscount {
                discount_type: quoteforge_core::domain::quote::DiscountType::Percentage,
                frequency: None,
                value: Decimal::from(10),
            },
        });
        quote
    }

    #[tokio::test]
    async fn create_and_find_round_trips_selection_content() {
        let repo = SqlQuoteRepository::new(pool().await);
        let quote = draft("q-1");
        repo.create(quote.clone()).await.expect("create");

        let found =
            repo.find_by_id(&QuoteId("q-1".to_string())).await.expect("find").expect("present");
        assert_eq!(found.client, quote.client);
        assert_eq!(found.configurations, quote.configurations);
        assert_eq!(found.status, QuoteStatus::Draft);
        assert_eq!(found.quotation_number, None);
    }

    #[tokio::test]
    async fn update_succeeds_while_draft() {
        let repo = SqlQuoteRepository::new(pool().await);
        repo.create(draft("q-1")).await.expect("create");

        let mut edited = draft("q-1");
        edited.additional_notes = "net-30 payment terms".to_string();
        repo.update(edited).await.expect("update draft");

        let found =
            repo.find_by_id(&QuoteId("q-1".to_string())).await.expect("find").expect("present");
        assert_eq!(found.additional_notes, "net-30 payment terms");
    }

    #[tokio::test]
    async fn update_rejects_generated_quotes_with_a_distinct_error() {
        let repo = SqlQuoteRepository::new(pool().await);
        let mut quote = draft("q-1");
        repo.create(quote.clone()).await.expect("create");

        quote.generate("Q-2026-001".to_string()).expect("generate");
        repo.update(quote.clone()).await.expect("transition update overwrites the draft row");

        let mut edit = quote.clone();
        edit.additional_notes = "late edit".to_string();
        assert!(edit.ensure_editable().is_err());
        let error = repo.update(edit).await.expect_err("store rejects the edit too");
        assert!(matches!(error, RepositoryError::QuoteLocked(_)));
    }

    #[tokio::test]
    async fn delete_rejects_generated_quotes() {
        let repo = SqlQuoteRepository::new(pool().await);
        let mut quote = draft("q-1");
        repo.create(quote.clone()).await.expect("create");
        quote.generate("Q-2026-001".to_string()).expect("generate");
        repo.update(quote).await.expect("persist generated");

        let error = repo
            .delete(&QuoteId("q-1".to_string()))
            .await
            .expect_err("generated quotes cannot be deleted");
        assert!(matches!(error, RepositoryError::QuoteLocked(_)));
    }

    #[tokio::test]
    async fn delete_is_silent_for_missing_quotes() {
        let repo = SqlQuoteRepository::new(pool().await);
        repo.delete(&QuoteId("ghost".to_string())).await.expect("no-op delete");
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let repo = SqlQuoteRepository::new(pool().await);
        let mut older = draft("q-old");
        older.created_at = Utc::now() - chrono::Duration::days(2);
        repo.create(older).await.expect("create older");
        repo.create(draft("q-new")).await.expect("create newer");

        let quotes = repo.list().await.expect("list");
        assert_eq!(quotes[0].id, QuoteId("q-new".to_string()));
        assert_eq!(quotes[1].id, QuoteId("q-old".to_string()));
    }

    #[tokio::test]
    async fn counter_sequences_are_per_year_and_dense() {
        let counter = SqlQuotationCounter::new(pool().await);
        assert_eq!(counter.next_sequence(2026).await.expect("seq"), 1);
        assert_eq!(counter.next_sequence(2026).await.expect("seq"), 2);
        assert_eq!(counter.next_sequence(2027).await.expect("seq"), 1);
        assert_eq!(counter.next_sequence(2026).await.expect("seq"), 3);
    }

    #[tokio::test]
    async fn concurrent_counter_calls_never_share_a_sequence() {
        // Shared-cache URI so every pooled connection sees the same
        // in-memory database.
        let pool = connect_with_settings(
            "sqlite:file:counter_race_test?mode=memory&cache=shared",
            4,
            5,
        )
        .await
        .expect("pool");
        run_pending(&pool).await.expect("migrations");
        let counter = Arc::new(SqlQuotationCounter::new(pool));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                counter.next_sequence(2026).await.expect("sequence")
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            let sequence = handle.await.expect("join");
            assert!(seen.insert(sequence), "duplicate sequence {sequence}");
        }
        assert_eq!(seen.len(), 16);
    }
}
