use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;
use tracing::info;

use quoteforge_core::domain::quote::{format_quotation_number, Quote, QuoteId, QuoteStatus};
use quoteforge_core::errors::DomainError;

use crate::repositories::{QuotationNumberSource, QuoteRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("quote `{0}` was not found")]
    NotFound(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Draft -> Generated: pulls the next per-year sequence from the atomic
/// counter, assigns `Q-<year>-<NNN>`, and persists. The sequence comes from
/// the counter rather than a scan of existing quotes, so concurrent
/// generations cannot collide on a number.
pub async fn generate_quote(
    quotes: &dyn QuoteRepository,
    numbers: &dyn QuotationNumberSource,
    id: &QuoteId,
    now: DateTime<Utc>,
) -> Result<Quote, LifecycleError> {
    let mut quote =
        quotes.find_by_id(id).await?.ok_or_else(|| LifecycleError::NotFound(id.0.clone()))?;

    // Fail the transition before burning a sequence number.
    if !quote.can_transition_to(QuoteStatus::Generated) {
        return Err(DomainError::InvalidQuoteTransition {
            from: quote.status,
            to: QuoteStatus::Generated,
        }
        .into());
    }

    let year = now.year();
    let sequence = numbers.next_sequence(year).await?;
    quote.generate(format_quotation_number(year, sequence))?;
    quotes.update(quote.clone()).await?;

    info!(
        quote_id = %quote.id.0,
        quotation_number = quote.quotation_number.as_deref().unwrap_or(""),
        "quote generated"
    );
    Ok(quote)
}

/// Creates a fresh Draft copying the source quote's selection content, with
/// a new identity and creation time and no quotation number.
pub async fn duplicate_quote(
    quotes: &dyn QuoteRepository,
    source_id: &QuoteId,
    new_id: QuoteId,
    now: DateTime<Utc>,
) -> Result<Quote, LifecycleError> {
    let source = quotes
        .find_by_id(source_id)
        .await?
        .ok_or_else(|| LifecycleError::NotFound(source_id.0.clone()))?;

    let copy = source.duplicate(new_id, now);
    quotes.create(copy.clone()).await?;

    info!(source_id = %source_id.0, copy_id = %copy.id.0, "quote duplicated");
    Ok(copy)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use quoteforge_core::domain::quote::{ClientDetails, Quote, QuoteId, QuoteStatus};
    use quoteforge_core::errors::DomainError;

    use crate::repositories::{
        InMemoryQuotationCounter, InMemoryQuoteRepository, QuoteRepository,
    };

    use super::{duplicate_quote, generate_quote, LifecycleError};

    fn draft(id: &str) -> Quote {
        Quote::new(QuoteId(id.to_string()), ClientDetails::default(), Utc::now())
    }

    #[tokio::test]
    async fn generates_with_a_year_scoped_sequence() {
        let quotes = InMemoryQuoteRepository::default();
        let numbers = InMemoryQuotationCounter::default();
        quotes.create(draft("q-1")).await.expect("create");
        quotes.create(draft("q-2")).await.expect("create");

        let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        let first =
            generate_quote(&quotes, &numbers, &QuoteId("q-1".to_string()), now).await.expect("generate");
        let second =
            generate_quote(&quotes, &numbers, &QuoteId("q-2".to_string()), now).await.expect("generate");

        assert_eq!(first.quotation_number.as_deref(), Some("Q-2026-001"));
        assert_eq!(second.quotation_number.as_deref(), Some("Q-2026-002"));
        assert_eq!(first.status, QuoteStatus::Generated);

        let stored = quotes
            .find_by_id(&QuoteId("q-1".to_string()))
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.quotation_number.as_deref(), Some("Q-2026-001"));
    }

    #[tokio::test]
    async fn regenerating_is_an_invalid_transition_and_burns_no_sequence() {
        let quotes = InMemoryQuoteRepository::default();
        let numbers = InMemoryQuotationCounter::default();
        quotes.create(draft("q-1")).await.expect("create");
        quotes.create(draft("q-2")).await.expect("create");

        let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        generate_quote(&quotes, &numbers, &QuoteId("q-1".to_string()), now)
            .await
            .expect("first generate");

        let error = generate_quote(&quotes, &numbers, &QuoteId("q-1".to_string()), now)
            .await
            .expect_err("second generate fails");
        assert!(matches!(
            error,
            LifecycleError::Domain(DomainError::InvalidQuoteTransition { .. })
        ));

        // The failed attempt must not have consumed a sequence.
        let next = generate_quote(&quotes, &numbers, &QuoteId("q-2".to_string()), now)
            .await
            .expect("generate second quote");
        assert_eq!(next.quotation_number.as_deref(), Some("Q-2026-002"));
    }

    #[tokio::test]
    async fn missing_quote_is_not_found() {
        let quotes = InMemoryQuoteRepository::default();
        let numbers = InMemoryQuotationCounter::default();

        let error = generate_quote(&quotes, &numbers, &QuoteId("ghost".to_string()), Utc::now())
            .await
            .expect_err("missing quote");
        assert!(matches!(error, LifecycleError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_creates_an_unnumbered_draft_copy() {
        let quotes = InMemoryQuoteRepository::default();
        let numbers = InMemoryQuotationCounter::default();
        let mut original = draft("q-1");
        original.additional_notes = "priority client".to_string();
        quotes.create(original).await.expect("create");

        let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        generate_quote(&quotes, &numbers, &QuoteId("q-1".to_string()), now)
            .await
            .expect("generate original");

        let copy = duplicate_quote(&quotes, &QuoteId("q-1".to_string()), QuoteId("q-2".to_string()), now)
            .await
            .expect("duplicate");

        assert_eq!(copy.status, QuoteStatus::Draft);
        assert_eq!(copy.quotation_number, None);
        assert_eq!(copy.additional_notes, "priority client");
        assert_eq!(copy.created_at, now);
    }
}
