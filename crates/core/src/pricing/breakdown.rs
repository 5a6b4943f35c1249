use rust_decimal::Decimal;

use crate::domain::catalog::Catalog;
use crate::domain::quote::{DiscountType, Quote};

use super::CostBreakdown;

/// Folds a quote's selections into categorized subtotals.
///
/// Accumulation order is part of the contract: product configurations first
/// (plan, setup, add-ons, then that configuration's own discount), custom
/// requirements next (gross price recorded, discount netted separately),
/// quote-level discounts last. Each quote-level discount is computed against
/// the already-discounted running total, so two sequential 10% discounts take
/// 19%, not 20%. Only the final total is floored at zero; intermediate values
/// may go negative.
///
/// Dangling references never error: a missing product skips its whole
/// configuration, a missing plan or frequency option contributes zero plan
/// cost while setup fee and add-ons are still evaluated, and unknown add-on
/// ids are ignored.
pub fn compute_total_breakdown(catalog: &Catalog, quote: &Quote) -> CostBreakdown {
    let mut breakdown = CostBreakdown::default();
    let mut total = Decimal::ZERO;

    for config in &quote.configurations {
        let Some(product) = catalog.find(&config.product_id) else {
            continue;
        };

        let plan_price = product
            .plan_price(&config.plan_id, config.frequency)
            .unwrap_or(Decimal::ZERO);
        breakdown.products += plan_price;
        total += plan_price;

        if config.include_setup_cost && !product.setup_fee.is_zero() {
            breakdown.setup_costs += product.setup_fee;
            total += product.setup_fee;
        }

        for add_on_id in &config.selected_add_on_ids {
            if let Some(add_on) = product.add_on(add_on_id) {
                breakdown.add_ons += add_on.additional_cost;
                total += add_on.additional_cost;
            }
        }

        // Percentage discounts here are a share of this configuration's own
        // plan price, not of the accumulated product subtotal.
        if config.discount.is_active() {
            let amount = config.discount.amount_against(plan_price);
            breakdown.discounts += amount;
            total -= amount;
        }
    }

    for requirement in &quote.custom_requirements {
        breakdown.custom_requirements += requirement.price;
        total += requirement.price;

        if requirement.discount.is_active() {
            let amount = requirement.discount.amount_against(requirement.price);
            breakdown.discounts += amount;
            total -= amount;
        }
    }

    for discount in &quote.discounts {
        let amount = match discount.discount_type {
            DiscountType::Percentage => total * discount.value / Decimal::ONE_HUNDRED,
            DiscountType::Fixed => discount.value,
        };
        breakdown.discounts += amount;
        total -= amount;
    }

    breakdown.total = total.max(Decimal::ZERO);
    breakdown
}
