pub mod config;
pub mod domain;
pub mod errors;
pub mod money;
pub mod pricing;

pub use domain::catalog::{
    AddOn, AddOnId, BillingFrequency, Catalog, PlanId, PricingOption, PricingPlan, Product,
    ProductId,
};
pub use domain::quote::{
    format_quotation_number, ClientDetails, CustomRequirement, DiscountType, LineDiscount,
    ProductConfiguration, Quote, QuoteDiscount, QuoteId, QuoteStatus,
};
pub use errors::{ApplicationError, DomainError};
pub use pricing::{
    compute_cost_by_period, compute_total_breakdown, CostBreakdown, CostingEngine,
    DeterministicCostingEngine, PeriodCosts, QuoteCosting,
};
