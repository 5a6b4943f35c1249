use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::Row;

use quoteforge_core::domain::catalog::{
    AddOn, AddOnId, BillingFrequency, PlanId, PricingOption, PricingPlan, Product, ProductId,
};
use quoteforge_core::domain::quote::{
    ClientDetails, CustomRequirement, DiscountType, LineDiscount, ProductConfiguration, Quote,
    QuoteDiscount, QuoteId,
};

use crate::connection::DbPool;
use crate::repositories::{
    ProductRepository, QuoteRepository, RepositoryError, SqlProductRepository, SqlQuoteRepository,
};

/// Deterministic demo dataset: a small catalog plus one draft quote that
/// exercises every pricing path (plan, setup fee, add-ons, custom
/// requirement, line discounts, and an overall discount).
pub struct SeedDataset;

#[derive(Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub products_loaded: usize,
    pub quotes_loaded: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub struct VerificationResult {
    pub products_found: i64,
    pub quotes_found: i64,
    pub complete: bool,
}

pub const SEED_QUOTE_ID: &str = "quote-demo-001";

impl SeedDataset {
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let products = Self::products();
        let product_repo = SqlProductRepository::new(pool.clone());
        for product in &products {
            product_repo.save(product.clone()).await?;
        }

        let quote_repo = SqlQuoteRepository::new(pool.clone());
        let quote = Self::draft_quote();
        if quote_repo.find_by_id(&quote.id).await?.is_none() {
            quote_repo.create(quote).await?;
        }

        Ok(SeedResult { products_loaded: products.len(), quotes_loaded: 1 })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let products_found: i64 = sqlx::query("SELECT COUNT(*) AS n FROM product")
            .fetch_one(pool)
            .await?
            .get("n");
        let quotes_found: i64 = sqlx::query("SELECT COUNT(*) AS n FROM quote WHERE id = ?1")
            .bind(SEED_QUOTE_ID)
            .fetch_one(pool)
            .await?
            .get("n");

        Ok(VerificationResult {
            products_found,
            quotes_found,
            complete: products_found >= Self::products().len() as i64 && quotes_found == 1,
        })
    }

    fn products() -> Vec<Product> {
        vec![
            Product {
                id: ProductId("prod-crm".to_string()),
                name: "CRM Suite".to_string(),
                category: "Software".to_string(),
                description: "Pipeline and customer management".to_string(),
                website_link: "https://example.com/crm".to_string(),
                key_features: "Pipelines, dashboards, automations".to_string(),
                setup_fee: Decimal::from(500),
                pricing_plans: vec![
                    PricingPlan {
                        id: PlanId("plan-starter".to_string()),
                        name: "Starter".to_string(),
                        features: "Up to 5 seats".to_string(),
                        pricing_options: vec![
                            PricingOption {
                                id: "opt-starter-m".to_string(),
                                frequency: BillingFrequency::Monthly,
                                price: Decimal::from(2_500),
                            },
                            PricingOption {
                                id: "opt-starter-y".to_string(),
                                frequency: BillingFrequency::Yearly,
                                price: Decimal::from(25_000),
                            },
                        ],
                    },
                    PricingPlan {
                        id: PlanId("plan-business".to_string()),
                        name: "Business".to_string(),
                        features: "Unlimited seats, priority support".to_string(),
                        pricing_options: vec![
                            PricingOption {
                                id: "opt-business-m".to_string(),
                                frequency: BillingFrequency::Monthly,
                                price: Decimal::from(6_000),
                            },
                            PricingOption {
                                id: "opt-business-q".to_string(),
                                frequency: BillingFrequency::Quarterly,
                                price: Decimal::from(16_500),
                            },
                        ],
                    },
                ],
                add_ons: vec![
                    AddOn {
                        id: AddOnId("addon-sso".to_string()),
                        name: "Single Sign-On".to_string(),
                        description: "SAML/OIDC integration".to_string(),
                        additional_cost: Decimal::from(800),
                        kind: "security".to_string(),
                        frequency: Some(BillingFrequency::Monthly),
                    },
                    AddOn {
                        id: AddOnId("addon-onboarding".to_string()),
                        name: "Guided Onboarding".to_string(),
                        description: "Two-week rollout program".to_string(),
                        additional_cost: Decimal::from(5_000),
                        kind: "services".to_string(),
                        frequency: Some(BillingFrequency::OneTime),
                    },
                ],
            },
            Product {
                id: ProductId("prod-hosting".to_string()),
                name: "Managed Hosting".to_string(),
                category: "Infrastructure".to_string(),
                description: "Fully managed application hosting".to_string(),
                website_link: "https://example.com/hosting".to_string(),
                key_features: "Backups, monitoring, SLA".to_string(),
                setup_fee: Decimal::from(1_000),
                pricing_plans: vec![PricingPlan {
                    id: PlanId("plan-standard".to_string()),
                    name: "Standard".to_string(),
                    features: "Single region".to_string(),
                    pricing_options: vec![PricingOption {
                        id: "opt-standard-m".to_string(),
                        frequency: BillingFrequency::Monthly,
                        price: Decimal::from(3_500),
                    }],
                }],
                add_ons: Vec::new(),
            },
        ]
    }

    fn draft_quote() -> Quote {
        let mut quote = Quote::new(
            QuoteId(SEED_QUOTE_ID.to_string()),
            ClientDetails {
                name: "Jordan Rivers".to_string(),
                email: "jordan@globex.example".to_string(),
                company: "Globex Industries".to_string(),
                phone: "+91-98765-43210".to_string(),
            },
            Utc::now(),
        );
        quote.quote_reference = "Globex CRM rollout".to_string();
        quote.project_timeline = "6 weeks".to_string();
        quote.configurations.push(ProductConfiguration {
            product_id: ProductId("prod-crm".to_string()),
            plan_id: PlanId("plan-business".to_string()),
            frequency: BillingFrequency::Monthly,
            selected_add_on_ids: vec![
                AddOnId("addon-sso".to_string()),
                AddOnId("addon-onboarding".to_string()),
            ],
            include_setup_cost: true,
            discount: LineDiscount {
                discount_type: DiscountType::Percentage,
                frequency: None,
                value: Decimal::from(10),
            },
        });
        quote.custom_requirements.push(CustomRequirement {
            name: "Legacy data migration".to_string(),
            description: "Import from existing spreadsheets".to_string(),
            price: Decimal::from(12_000),
            frequency: None,
            discount: LineDiscount::default(),
        });
        quote.discounts.push(QuoteDiscount {
            discount_type: DiscountType::Fixed,
            value: Decimal::from(1_000),
            description: "Launch promotion".to_string(),
            frequency: None,
        });
        quote
    }
}
