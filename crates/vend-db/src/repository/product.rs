//! # Product Repository
//!
//! Database operations for the local product inventory.
//!
//! ## Key Operations
//! - Exact barcode lookup (the first step of the scan resolution chain)
//! - Substring search over name and barcode
//! - CRUD + stock updates
//!
//! Stock decrements for sales do NOT live here: they happen inside the
//! invoice commit transaction (see `repository::invoice`), so stock and
//! invoice lines can never drift apart on a failure.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use vend_core::{Product, ProductSort};

const PRODUCT_COLUMNS: &str = "id, barcode, name, price_cents, cost_cents, quantity, unit, \
                               group_name, subgroup, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Finds a product by exact barcode match.
    ///
    /// This is step one of the resolution chain; the local store always wins
    /// over the cloud catalog.
    pub async fn find_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Searches products by name or barcode substring.
    ///
    /// ## Arguments
    /// * `term` - Search term (matched with LIKE on name and barcode)
    /// * `limit` - Maximum results to return
    pub async fn search(&self, term: &str, limit: u32) -> DbResult<Vec<Product>> {
        let term = term.trim();
        debug!(term = %term, limit = %limit, "Searching products");

        if term.is_empty() {
            return self.list(ProductSort::Name, limit).await;
        }

        let pattern = format!("%{}%", term);
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name LIKE ?1 OR barcode LIKE ?1 \
             ORDER BY name LIMIT ?2"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists products with a chosen sort key.
    ///
    /// The sort column is mapped from the enum here; user input never
    /// reaches the ORDER BY clause as text.
    pub async fn list(&self, sort: ProductSort, limit: u32) -> DbResult<Vec<Product>> {
        let order = match sort {
            ProductSort::Name => "name",
            ProductSort::Price => "price_cents",
            ProductSort::Quantity => "quantity",
        };

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY {order} LIMIT ?1");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - barcode already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(name = %product.name, barcode = ?product.barcode, "Inserting product");

        sqlx::query(
            "INSERT INTO products ( \
                id, barcode, name, price_cents, cost_cents, quantity, unit, \
                group_name, subgroup, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.quantity)
        .bind(&product.unit)
        .bind(&product.group_name)
        .bind(&product.subgroup)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a zero-priced placeholder for a product resolved from the
    /// cloud catalog.
    ///
    /// The placeholder carries only barcode and name; price stays 0, which
    /// keeps it out of carts until the operator fills in the rest.
    pub async fn insert_placeholder(&self, barcode: &str, name: &str) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            barcode: Some(barcode.to_string()),
            name: name.to_string(),
            price_cents: 0,
            cost_cents: 0,
            quantity: 0,
            unit: "pcs".to_string(),
            group_name: None,
            subgroup: None,
            created_at: now,
            updated_at: now,
        };

        self.insert(&product).await?;
        Ok(product)
    }

    /// Updates an existing product's editable fields.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                barcode = ?2, \
                name = ?3, \
                price_cents = ?4, \
                cost_cents = ?5, \
                quantity = ?6, \
                unit = ?7, \
                group_name = ?8, \
                subgroup = ?9, \
                updated_at = ?10 \
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.quantity)
        .bind(&product.unit)
        .bind(&product.group_name)
        .bind(&product.subgroup)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id.as_str()));
        }

        Ok(())
    }

    /// Sets a product's on-hand quantity to an absolute value.
    ///
    /// Used by the inventory edit form. Sale-driven decrements go through
    /// the invoice commit transaction instead.
    pub async fn set_quantity(&self, id: &str, quantity: i64) -> DbResult<()> {
        debug!(id = %id, quantity = %quantity, "Setting product quantity");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET quantity = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample(barcode: &str, name: &str, price_cents: i64, quantity: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            barcode: Some(barcode.to_string()),
            name: name.to_string(),
            price_cents,
            cost_cents: 0,
            quantity,
            unit: "pcs".to_string(),
            group_name: None,
            subgroup: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find_by_barcode() {
        let db = test_db().await;
        let repo = db.products();

        let product = sample("4870001000013", "Mineral water 0.5l", 250, 10);
        repo.insert(&product).await.unwrap();

        let found = repo.find_by_barcode("4870001000013").await.unwrap().unwrap();
        assert_eq!(found.id, product.id);
        assert_eq!(found.name, "Mineral water 0.5l");
        assert_eq!(found.price_cents, 250);

        assert!(repo.find_by_barcode("0000000000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_barcode_rejected() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample("12345678", "First", 100, 0)).await.unwrap();
        let err = repo
            .insert(&sample("12345678", "Second", 100, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_search_by_name_and_barcode() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample("11111111", "Green tea", 300, 5)).await.unwrap();
        repo.insert(&sample("22222222", "Black tea", 280, 5)).await.unwrap();
        repo.insert(&sample("33333333", "Coffee", 550, 5)).await.unwrap();

        let teas = repo.search("tea", 20).await.unwrap();
        assert_eq!(teas.len(), 2);

        let by_code = repo.search("3333", 20).await.unwrap();
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].name, "Coffee");
    }

    #[tokio::test]
    async fn test_list_sorted() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample("1111", "B item", 200, 3)).await.unwrap();
        repo.insert(&sample("2222", "A item", 900, 1)).await.unwrap();

        let by_name = repo.list(ProductSort::Name, 10).await.unwrap();
        assert_eq!(by_name[0].name, "A item");

        let by_price = repo.list(ProductSort::Price, 10).await.unwrap();
        assert_eq!(by_price[0].name, "B item");

        let by_qty = repo.list(ProductSort::Quantity, 10).await.unwrap();
        assert_eq!(by_qty[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_placeholder_has_zero_price() {
        let db = test_db().await;
        let repo = db.products();

        let placeholder = repo
            .insert_placeholder("4870001000099", "Cloud item")
            .await
            .unwrap();

        assert!(placeholder.needs_price());
        let found = repo.find_by_barcode("4870001000099").await.unwrap().unwrap();
        assert_eq!(found.price_cents, 0);
        assert_eq!(found.quantity, 0);
    }

    #[tokio::test]
    async fn test_update_and_set_quantity() {
        let db = test_db().await;
        let repo = db.products();

        let mut product = sample("5555", "Juice", 400, 2);
        repo.insert(&product).await.unwrap();

        product.price_cents = 450;
        product.name = "Orange juice".to_string();
        repo.update(&product).await.unwrap();

        repo.set_quantity(&product.id, 7).await.unwrap();

        let found = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.price_cents, 450);
        assert_eq!(found.name, "Orange juice");
        assert_eq!(found.quantity, 7);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let db = test_db().await;
        let repo = db.products();

        let ghost = sample("9999", "Ghost", 100, 0);
        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
