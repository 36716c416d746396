//! # Category Repository
//!
//! Inventory categories and product/category links.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use vend_core::{Category, Product};

/// Repository for category operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Creates a category.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - name already exists
    pub async fn insert(&self, name: &str, description: Option<&str>) -> DbResult<Category> {
        debug!(name = %name, "Creating category");

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.map(String::from),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO categories (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(category)
    }

    /// Lists all categories by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Links a product to a category. Re-linking is a no-op.
    pub async fn assign(&self, product_id: &str, category_id: &str) -> DbResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO product_categories (product_id, category_id) VALUES (?1, ?2)",
        )
        .bind(product_id)
        .bind(category_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes a product/category link.
    pub async fn unassign(&self, product_id: &str, category_id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "DELETE FROM product_categories WHERE product_id = ?1 AND category_id = ?2",
        )
        .bind(product_id)
        .bind(category_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product/category link", product_id));
        }

        Ok(())
    }

    /// Lists products linked to a category.
    pub async fn products_in(&self, category_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT p.id, p.barcode, p.name, p.price_cents, p.cost_cents, p.quantity, p.unit, \
                    p.group_name, p.subgroup, p.created_at, p.updated_at \
             FROM products p \
             JOIN product_categories pc ON pc.product_id = p.id \
             WHERE pc.category_id = ?1 \
             ORDER BY p.name",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn seed_product(db: &Database, name: &str) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            barcode: None,
            name: name.to_string(),
            price_cents: 100,
            cost_cents: 50,
            quantity: 1,
            unit: "pcs".to_string(),
            group_name: None,
            subgroup: None,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    #[tokio::test]
    async fn test_category_links() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let drinks = repo.insert("Drinks", Some("Cold and hot")).await.unwrap();
        let tea = seed_product(&db, "Tea").await;
        let juice = seed_product(&db, "Juice").await;

        repo.assign(&tea.id, &drinks.id).await.unwrap();
        repo.assign(&juice.id, &drinks.id).await.unwrap();
        // Re-assign is a no-op, not an error
        repo.assign(&juice.id, &drinks.id).await.unwrap();

        let linked = repo.products_in(&drinks.id).await.unwrap();
        assert_eq!(linked.len(), 2);
        assert_eq!(linked[0].name, "Juice");

        repo.unassign(&tea.id, &drinks.id).await.unwrap();
        assert_eq!(repo.products_in(&drinks.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        repo.insert("Drinks", None).await.unwrap();
        let err = repo.insert("Drinks", None).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
