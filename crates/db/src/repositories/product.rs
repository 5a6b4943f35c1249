use chrono::Utc;
use sqlx::Row;

use quoteforge_core::domain::catalog::{AddOn, PricingPlan, Product, ProductId};
use quoteforge_core::money::parse_amount;

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let setup_fee: String = row.try_get("setup_fee")?;
    let pricing_plans_json: String = row.try_get("pricing_plans")?;
    let add_ons_json: String = row.try_get("add_ons")?;

    let pricing_plans: Vec<PricingPlan> = serde_json::from_str(&pricing_plans_json)
        .map_err(|error| RepositoryError::Decode(format!("product.pricing_plans: {error}")))?;
    let add_ons: Vec<AddOn> = serde_json::from_str(&add_ons_json)
        .map_err(|error| RepositoryError::Decode(format!("product.add_ons: {error}")))?;

    Ok(Product {
        id: ProductId(row.try_get("id")?),
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        description: row.try_get("description")?,
        website_link: row.try_get("website_link")?,
        key_features: row.try_get("key_features")?,
        setup_fee: parse_amount(&setup_fee),
        pricing_plans,
        add_ons,
    })
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM product WHERE id = ?1")
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode_product).transpose()
    }

    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM product ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_product).collect()
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let pricing_plans = serde_json::to_string(&product.pricing_plans)
            .map_err(|error| RepositoryError::Decode(format!("product.pricing_plans: {error}")))?;
        let add_ons = serde_json::to_string(&product.add_ons)
            .map_err(|error| RepositoryError::Decode(format!("product.add_ons: {error}")))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO product \
             (id, name, category, description, website_link, key_features, setup_fee, \
              pricing_plans, add_ons, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10) \
             ON CONFLICT(id) DO UPDATE SET \
               name = excluded.name, \
               category = excluded.category, \
               description = excluded.description, \
               website_link = excluded.website_link, \
               key_features = excluded.key_features, \
               setup_fee = excluded.setup_fee, \
               pricing_plans = excluded.pricing_plans, \
               add_ons = excluded.add_ons, \
               updated_at = excluded.updated_at",
        )
        .bind(&product.id.0)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(&product.website_link)
        .bind(&product.key_features)
        .bind(product.setup_fee.to_string())
        .bind(&pricing_plans)
        .bind(&add_ons)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM product WHERE id = ?1").bind(&id.0).execute(&self.pool).await?;
        Ok(())
    }
}
