use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{lenient_frequency, AddOnId, BillingFrequency, PlanId, ProductId};
use crate::errors::DomainError;
use crate::money::lenient_amount;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    #[default]
    Percentage,
    Fixed,
}

/// The discount shape shared by product configurations and custom
/// requirements. `frequency` is informational only: it decides which
/// cost-by-period column the discount is displayed under, never the amount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDiscount {
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default, deserialize_with = "lenient_frequency")]
    pub frequency: Option<BillingFrequency>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub value: Decimal,
}

impl LineDiscount {
    pub fn is_active(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Discount amount against `base`: a percentage of the line's own price,
    /// or the literal value when fixed. Percentages above 100 are honored
    /// literally.
    pub fn amount_against(&self, base: Decimal) -> Decimal {
        match self.discount_type {
            DiscountType::Percentage => base * self.value / Decimal::ONE_HUNDRED,
            DiscountType::Fixed => self.value,
        }
    }
}

/// One product selected onto a quote: a plan, a billing frequency, optional
/// add-ons, optional setup-fee inclusion, and an optional line discount.
/// References into the catalog are weak; dangling ids price as zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfiguration {
    pub product_id: ProductId,
    pub plan_id: PlanId,
    pub frequency: BillingFrequency,
    #[serde(default)]
    pub selected_add_on_ids: Vec<AddOnId>,
    #[serde(default)]
    pub include_setup_cost: bool,
    #[serde(default)]
    pub discount: LineDiscount,
}

/// A bespoke line item not tied to the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRequirement {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "lenient_frequency")]
    pub frequency: Option<BillingFrequency>,
    #[serde(default)]
    pub discount: LineDiscount,
}

impl CustomRequirement {
    /// Requirements with no cadence tag bill once, matching how the quote
    /// forms treat an unset frequency.
    pub fn is_one_time(&self) -> bool {
        matches!(self.frequency, None | Some(BillingFrequency::OneTime))
    }
}

/// Quote-level discount, applied after all line items against the running
/// total (or against one period bucket in the cost-by-period view).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDiscount {
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub value: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_frequency")]
    pub frequency: Option<BillingFrequency>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Generated,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    #[serde(default)]
    pub client: ClientDetails,
    #[serde(default)]
    pub quote_reference: String,
    #[serde(default)]
    pub project_timeline: String,
    #[serde(default)]
    pub additional_notes: String,
    #[serde(default)]
    pub configurations: Vec<ProductConfiguration>,
    #[serde(default)]
    pub custom_requirements: Vec<CustomRequirement>,
    #[serde(default)]
    pub discounts: Vec<QuoteDiscount>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(default)]
    pub quotation_number: Option<String>,
}

impl Quote {
    pub fn new(id: QuoteId, client: ClientDetails, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            client,
            quote_reference: String::new(),
            project_timeline: String::new(),
            additional_notes: String::new(),
            configurations: Vec::new(),
            custom_requirements: Vec::new(),
            discounts: Vec::new(),
            created_at,
            status: QuoteStatus::Draft,
            quotation_number: None,
        }
    }

    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        matches!((self.status, next), (QuoteStatus::Draft, QuoteStatus::Generated))
    }

    pub fn transition_to(&mut self, next: QuoteStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidQuoteTransition { from: self.status, to: next })
    }

    /// Guard for the edit/delete path: selection content is frozen once a
    /// quote has been generated.
    pub fn ensure_editable(&self) -> Result<(), DomainError> {
        match self.status {
            QuoteStatus::Draft => Ok(()),
            QuoteStatus::Generated => Err(DomainError::QuoteLocked { id: self.id.0.clone() }),
        }
    }

    /// Transitions Draft -> Generated and assigns the quotation number. A
    /// number already carried by the quote is kept as-is.
    pub fn generate(&mut self, quotation_number: String) -> Result<(), DomainError> {
        self.transition_to(QuoteStatus::Generated)?;
        if self.quotation_number.is_none() {
            self.quotation_number = Some(quotation_number);
        }
        Ok(())
    }

    /// A fresh Draft copying all selection content; identity, quotation
    /// number, and creation time are reset.
    pub fn duplicate(&self, new_id: QuoteId, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id,
            client: self.client.clone(),
            quote_reference: self.quote_reference.clone(),
            project_timeline: self.project_timeline.clone(),
            additional_notes: self.additional_notes.clone(),
            configurations: self.configurations.clone(),
            custom_requirements: self.custom_requirements.clone(),
            discounts: self.discounts.clone(),
            created_at: now,
            status: QuoteStatus::Draft,
            quotation_number: None,
        }
    }
}

/// `Q-<year>-<NNN>`, e.g. `Q-2026-007`. Sequences are per calendar year.
pub fn format_quotation_number(year: i32, sequence: u32) -> String {
    format!("Q-{year}-{sequence:03}")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::catalog::{BillingFrequency, PlanId, ProductId};
    use crate::errors::DomainError;

    use super::{
        format_quotation_number, ClientDetails, DiscountType, LineDiscount, ProductConfiguration,
        Quote, QuoteId, QuoteStatus,
    };

    fn draft() -> Quote {
        let mut quote = Quote::new(
            QuoteId("q-1".to_string()),
            ClientDetails { name: "Acme".to_string(), ..ClientDetails::default() },
            Utc::now(),
        );
        quote.configurations.push(ProductConfiguration {
            product_id: ProductId("crm-suite".to_string()),
            plan_id: PlanId("plan-pro".to_string()),
            frequency: BillingFrequency::Monthly,
            selected_add_on_ids: Vec::new(),
            include_setup_cost: false,
            discount: LineDiscount::default(),
        });
        quote
    }

    #[test]
    fn draft_generates_once() {
        let mut quote = draft();
        quote.generate("Q-2026-001".to_string()).expect("draft -> generated");
        assert_eq!(quote.status, QuoteStatus::Generated);
        assert_eq!(quote.quotation_number.as_deref(), Some("Q-2026-001"));
    }

    #[test]
    fn generated_quotes_cannot_regenerate() {
        let mut quote = draft();
        quote.generate("Q-2026-001".to_string()).expect("first generate");
        let error = quote.generate("Q-2026-002".to_string()).expect_err("second generate");
        assert!(matches!(error, DomainError::InvalidQuoteTransition { .. }));
        assert_eq!(quote.quotation_number.as_deref(), Some("Q-2026-001"));
    }

    #[test]
    fn pre_assigned_number_survives_generation() {
        let mut quote = draft();
        quote.quotation_number = Some("Q-2025-099".to_string());
        quote.generate("Q-2026-001".to_string()).expect("generate");
        assert_eq!(quote.quotation_number.as_deref(), Some("Q-2025-099"));
    }

    #[test]
    fn generated_quotes_reject_edits() {
        let mut quote = draft();
        quote.generate("Q-2026-001".to_string()).expect("generate");
        let error = quote.ensure_editable().expect_err("generated quotes are locked");
        assert!(matches!(error, DomainError::QuoteLocked { .. }));
    }

    #[test]
    fn duplicate_resets_identity_and_lifecycle() {
        let mut original = draft();
        original.generate("Q-2026-001".to_string()).expect("generate");

        let now = Utc::now();
        let copy = original.duplicate(QuoteId("q-2".to_string()), now);

        assert_eq!(copy.id, QuoteId("q-2".to_string()));
        assert_eq!(copy.status, QuoteStatus::Draft);
        assert_eq!(copy.quotation_number, None);
        assert_eq!(copy.created_at, now);
        assert_eq!(copy.configurations, original.configurations);
        assert_eq!(copy.client, original.client);
    }

    #[test]
    fn quotation_numbers_are_zero_padded() {
        assert_eq!(format_quotation_number(2026, 7), "Q-2026-007");
        assert_eq!(format_quotation_number(2026, 123), "Q-2026-123");
        assert_eq!(format_quotation_number(2026, 1000), "Q-2026-1000");
    }

    #[test]
    fn percentage_discount_is_a_share_of_its_own_base() {
        let discount = LineDiscount {
            discount_type: DiscountType::Percentage,
            frequency: None,
            value: Decimal::from(10),
        };
        assert_eq!(discount.amount_against(Decimal::from(200)), Decimal::from(20));
    }

    #[test]
    fn fixed_discount_ignores_the_base() {
        let discount = LineDiscount {
            discount_type: DiscountType::Fixed,
            frequency: None,
            value: Decimal::from(35),
        };
        assert_eq!(discount.amount_against(Decimal::from(200)), Decimal::from(35));
    }
}
