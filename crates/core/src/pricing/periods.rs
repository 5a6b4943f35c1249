use rust_decimal::Decimal;

use crate::domain::catalog::{BillingFrequency, Catalog};
use crate::domain::quote::{DiscountType, Quote};

use super::PeriodCosts;

/// Projects a quote's selections into one-time/monthly/quarterly/yearly
/// buckets. This is an independent pass over the same inputs as the total
/// breakdown, not a re-slicing of its numbers: discount targeting works
/// differently here.
///
/// Bucketing rules:
/// - setup fees always land in `one_time`, whatever the plan's cadence;
/// - line discounts are netted off the plan or requirement before bucketing;
/// - add-ons bill at their own frequency tag, falling back to the parent
///   configuration's cadence; a one-time cadence, tagged or inherited,
///   routes to `one_time`;
/// - quote-level discounts run last: a frequency tag targets that bucket, an
///   untagged percentage spreads proportionally over the recurring buckets,
///   an untagged fixed amount comes out of `one_time`. Buckets are clamped
///   to zero after every discount, so no discount can push a bucket negative
///   even transiently.
pub fn compute_cost_by_period(catalog: &Catalog, quote: &Quote) -> PeriodCosts {
    let mut periods = PeriodCosts::default();

    for config in &quote.configurations {
        let Some(product) = catalog.find(&config.product_id) else {
            continue;
        };
        if config.include_setup_cost && !product.setup_fee.is_zero() {
            periods.one_time += product.setup_fee;
        }
    }

    for requirement in &quote.custom_requirements {
        if requirement.is_one_time() {
            periods.one_time += requirement.price;
        }
    }

    for config in &quote.configurations {
        let Some(product) = catalog.find(&config.product_id) else {
            continue;
        };

        if let Some(plan_price) = product.plan_price(&config.plan_id, config.frequency) {
            let discount = if config.discount.is_active() {
                config.discount.amount_against(plan_price)
            } else {
                Decimal::ZERO
            };
            *periods.recurring_bucket_mut(config.frequency) += plan_price - discount;
        }

        for add_on_id in &config.selected_add_on_ids {
            let Some(add_on) = product.add_on(add_on_id) else {
                continue;
            };
            // Untagged add-ons inherit the configuration's cadence; an
            // inherited one-time cadence bills once, same as an explicit tag.
            match add_on.frequency.unwrap_or(config.frequency) {
                BillingFrequency::OneTime => periods.one_time += add_on.additional_cost,
                frequency => {
                    *periods.recurring_bucket_mut(frequency) += add_on.additional_cost;
                }
            }
        }
    }

    for requirement in &quote.custom_requirements {
        let Some(frequency) = requirement.frequency else {
            continue;
        };
        if !frequency.is_recurring() {
            continue;
        }

        let discount = if requirement.discount.is_active() {
            requirement.discount.amount_against(requirement.price)
        } else {
            Decimal::ZERO
        };
        *periods.recurring_bucket_mut(frequency) += requirement.price - discount;
    }

    for discount in &quote.discounts {
        match (discount.discount_type, discount.frequency) {
            (DiscountType::Percentage, Some(frequency)) => {
                let bucket = periods.bucket_mut(frequency);
                *bucket -= *bucket * discount.value / Decimal::ONE_HUNDRED;
            }
            (DiscountType::Percentage, None) => {
                // Spread over the recurring buckets weighted by their share
                // of the combined recurring total; each bucket's share of
                // the total discount reduces to `bucket * value / 100`.
                if periods.recurring_total() > Decimal::ZERO {
                    let rate = discount.value / Decimal::ONE_HUNDRED;
                    periods.monthly -= periods.monthly * rate;
                    periods.quarterly -= periods.quarterly * rate;
                    periods.yearly -= periods.yearly * rate;
                }
            }
            (DiscountType::Fixed, Some(frequency)) => {
                *periods.bucket_mut(frequency) -= discount.value;
            }
            (DiscountType::Fixed, None) => {
                periods.one_time -= discount.value;
            }
        }
        periods.clamp_non_negative();
    }

    // Line discounts larger than their line can leave a bucket negative even
    // when no quote-level discount ran.
    periods.clamp_non_negative();
    periods
}
