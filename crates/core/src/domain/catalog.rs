use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::money::lenient_amount;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddOnId(pub String);

/// Billing cadence for plans, add-ons, custom requirements, and discounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BillingFrequency {
    OneTime,
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingFrequency {
    /// Case-insensitive parse of the labels used in imported catalog data.
    /// Unknown or empty labels yield `None` rather than an error.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "one-time" | "onetime" | "one_time" => Some(Self::OneTime),
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OneTime => "one-time",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::OneTime)
    }
}

/// Serde adapter for optional frequency tags: unknown labels, empty strings,
/// and null all map to `None` instead of failing deserialization.
pub fn lenient_frequency<'de, D>(deserializer: D) -> Result<Option<BillingFrequency>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(BillingFrequency::from_label))
}

/// One price point on a plan: the cost of the plan when billed at this
/// frequency. Within a plan, frequencies are unique.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingOption {
    pub id: String,
    pub frequency: BillingFrequency,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: Decimal,
}

/// A named pricing tier on a product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub id: PlanId,
    pub name: String,
    #[serde(default)]
    pub features: String,
    #[serde(default)]
    pub pricing_options: Vec<PricingOption>,
}

impl PricingPlan {
    pub fn option_for(&self, frequency: BillingFrequency) -> Option<&PricingOption> {
        self.pricing_options.iter().find(|option| option.frequency == frequency)
    }
}

/// Optional extra attached to a product configuration. Add-ons carry their
/// own billing cadence independent of the plan they accompany.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: AddOnId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub additional_cost: Decimal,
    #[serde(default)]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_frequency")]
    pub frequency: Option<BillingFrequency>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website_link: String,
    #[serde(default)]
    pub key_features: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub setup_fee: Decimal,
    #[serde(default)]
    pub pricing_plans: Vec<PricingPlan>,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
}

impl Product {
    pub fn plan(&self, plan_id: &PlanId) -> Option<&PricingPlan> {
        self.pricing_plans.iter().find(|plan| &plan.id == plan_id)
    }

    pub fn add_on(&self, add_on_id: &AddOnId) -> Option<&AddOn> {
        self.add_ons.iter().find(|add_on| &add_on.id == add_on_id)
    }

    /// Resolves the price of `plan_id` billed at `frequency`. `None` when the
    /// plan or the frequency option is missing; callers treat that as a zero
    /// plan contribution rather than an error.
    pub fn plan_price(&self, plan_id: &PlanId, frequency: BillingFrequency) -> Option<Decimal> {
        self.plan(plan_id)?.option_for(frequency).map(|option| option.price)
    }
}

/// Immutable snapshot of the sellable catalog at evaluation time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
