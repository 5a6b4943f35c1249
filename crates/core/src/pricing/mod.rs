//! The one cost model every renderer calls. Both passes are pure folds over
//! a catalog snapshot and a quote's selections: they never touch I/O, never
//! mutate their inputs, and always return a complete result, even for an
//! empty selection.

pub mod breakdown;
pub mod periods;

pub use breakdown::compute_total_breakdown;
pub use periods::compute_cost_by_period;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{BillingFrequency, Catalog};
use crate::domain::quote::Quote;

/// Categorized subtotals for a quote. `discounts` is the sum of every
/// discount amount taken (a positive number); `total` is the running total
/// after sequential discount application, floored at zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub products: Decimal,
    pub setup_costs: Decimal,
    pub add_ons: Decimal,
    pub custom_requirements: Decimal,
    pub discounts: Decimal,
    pub total: Decimal,
}

/// Projected cost per billing cadence. Every field is non-negative after all
/// discount passes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCosts {
    pub one_time: Decimal,
    pub monthly: Decimal,
    pub quarterly: Decimal,
    pub yearly: Decimal,
}

impl PeriodCosts {
    /// The bucket a frequency tag addresses directly (discount targeting).
    pub(crate) fn bucket_mut(&mut self, frequency: BillingFrequency) -> &mut Decimal {
        match frequency {
            BillingFrequency::OneTime => &mut self.one_time,
            BillingFrequency::Monthly => &mut self.monthly,
            BillingFrequency::Quarterly => &mut self.quarterly,
            BillingFrequency::Yearly => &mut self.yearly,
        }
    }

    /// The bucket a recurring charge lands in. Plans and add-ons without a
    /// recognizable recurring cadence fall back to monthly.
    pub(crate) fn recurring_bucket_mut(&mut self, frequency: BillingFrequency) -> &mut Decimal {
        match frequency {
            BillingFrequency::Monthly | BillingFrequency::OneTime => &mut self.monthly,
            BillingFrequency::Quarterly => &mut self.quarterly,
            BillingFrequency::Yearly => &mut self.yearly,
        }
    }

    pub(crate) fn recurring_total(&self) -> Decimal {
        self.monthly + self.quarterly + self.yearly
    }

    pub(crate) fn clamp_non_negative(&mut self) {
        self.one_time = self.one_time.max(Decimal::ZERO);
        self.monthly = self.monthly.max(Decimal::ZERO);
        self.quarterly = self.quarterly.max(Decimal::ZERO);
        self.yearly = self.yearly.max(Decimal::ZERO);
    }
}

/// Both pricing views computed together, the shape presentation surfaces and
/// exports consume.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteCosting {
    pub breakdown: CostBreakdown,
    pub periods: PeriodCosts,
}

pub trait CostingEngine: Send + Sync {
    fn cost(&self, catalog: &Catalog, quote: &Quote) -> QuoteCosting;
}

#[derive(Default)]
pub struct DeterministicCostingEngine;

impl CostingEngine for DeterministicCostingEngine {
    fn cost(&self, catalog: &Catalog, quote: &Quote) -> QuoteCosting {
        QuoteCosting {
            breakdown: compute_total_breakdown(catalog, quote),
            periods: compute_cost_by_period(catalog, quote),
        }
    }
}
