//! # Product Repository
//!
//! The inventory store: product CRUD plus the atomic stock decrement.
//!
//! ## The Stock Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │              try_decrement("Milk", 6)                               │
//! │                                                                     │
//! │  UPDATE products                                                    │
//! │  SET quantity = quantity - 6                                        │
//! │  WHERE name = 'Milk' AND quantity >= 6                              │
//! │  RETURNING quantity                                                 │
//! │                                                                     │
//! │  One statement reads, checks, and writes under SQLite's write       │
//! │  lock. Two terminals selling the last units can never both pass     │
//! │  the guard; the loser's UPDATE matches zero rows and nothing is     │
//! │  mutated. quantity >= 0 therefore holds after every operation,      │
//! │  failed decrements included.                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukkan_core::{NewProduct, Product};

const PRODUCT_COLUMNS: &str =
    "id, name, cost_price, sell_price, quantity, expiry_date, supplier";

/// Optional filters for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name.
    pub name_contains: Option<String>,

    /// Only products expiring on or before this date (products without
    /// an expiry never match).
    pub expires_on_or_before: Option<NaiveDate>,
}

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

    /// Gets a product by name (the business key and barcode payload).
    pub async fn get(&self, name: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by row id (used by edit flows).
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products, optionally filtered, ordered by name.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE 1=1"));

        if let Some(name) = &filter.name_contains {
            qb.push(" AND name LIKE ")
                .push_bind(format!("%{}%", name.trim()));
        }
        if let Some(cutoff) = filter.expires_on_or_before {
            qb.push(" AND expiry_date IS NOT NULL AND expiry_date <= ")
                .push_bind(cutoff);
        }
        qb.push(" ORDER BY name");

        let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the inserted product with its row id
    /// * `Err(DbError::UniqueViolation)` - name already exists
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(name = %new.name(), "Inserting product");

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, cost_price, sell_price, quantity, expiry_date, supplier)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            "#,
        )
        .bind(new.name())
        .bind(new.cost_price())
        .bind(new.sell_price())
        .bind(new.quantity())
        .bind(new.expiry_date())
        .bind(new.supplier())
        .fetch_one(&self.pool)
        .await?;

        Ok(Product {
            id,
            name: new.name().to_string(),
            cost_price: new.cost_price(),
            sell_price: new.sell_price(),
            quantity: new.quantity(),
            expiry_date: new.expiry_date(),
            supplier: new.supplier().map(str::to_string),
        })
    }

    /// Updates an existing product by row id.
    ///
    /// Renaming onto an existing name fails with `UniqueViolation`;
    /// history keyed by the old name is not relinked.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = product.id, name = %product.name, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                cost_price = ?3,
                sell_price = ?4,
                quantity = ?5,
                expiry_date = ?6,
                supplier = ?7
            WHERE id = ?1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.cost_price)
        .bind(product.sell_price)
        .bind(product.quantity)
        .bind(product.expiry_date)
        .bind(&product.supplier)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id.to_string()));
        }

        Ok(())
    }

    /// Deletes a product by name. Sale history referencing the name stays
    /// in the ledger untouched.
    pub async fn delete(&self, name: &str) -> DbResult<()> {
        debug!(name = %name, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", name));
        }

        Ok(())
    }

    /// Atomically decrements stock, failing without mutation if fewer
    /// than `qty` units are on hand.
    ///
    /// ## Returns
    /// * `Ok(new_quantity)` - the stock level after the decrement
    /// * `Err(DbError::NotFound)` - no such product
    /// * `Err(DbError::InsufficientStock)` - carries the available amount
    pub async fn try_decrement(&self, name: &str, qty: i64) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        try_decrement_in(&mut conn, name, qty).await
    }

    /// Counts products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// The guarded decrement, usable inside a caller-owned transaction (the
/// sale path runs it in the same transaction as the sale-line append).
pub(crate) async fn try_decrement_in(
    conn: &mut SqliteConnection,
    name: &str,
    qty: i64,
) -> DbResult<i64> {
    if qty <= 0 {
        return Err(DbError::Internal(format!(
            "decrement quantity must be positive, got {qty}"
        )));
    }

    let new_qty: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE products
        SET quantity = quantity - ?2
        WHERE name = ?1 AND quantity >= ?2
        RETURNING quantity
        "#,
    )
    .bind(name)
    .bind(qty)
    .fetch_optional(&mut *conn)
    .await?;

    match new_qty {
        Some(remaining) => {
            debug!(name = %name, qty, remaining, "Stock decremented");
            Ok(remaining)
        }
        None => {
            // Guard rejected: distinguish unknown product from thin stock.
            let available: Option<i64> =
                sqlx::query_scalar("SELECT quantity FROM products WHERE name = ?1")
                    .bind(name)
                    .fetch_optional(&mut *conn)
                    .await?;

            match available {
                Some(available) => Err(DbError::InsufficientStock {
                    product: name.to_string(),
                    available,
                    requested: qty,
                }),
                None => Err(DbError::not_found("Product", name)),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use dukkan_core::Money;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_product(name: &str, qty: i64) -> NewProduct {
        NewProduct::new(
            name,
            Money::from_cents(600),
            Money::from_cents(1000),
            qty,
            None,
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_and_get() {
        let repo = db().await.products();

        let inserted = repo.insert(&new_product("Milk", 10)).await.unwrap();
        assert!(inserted.id > 0);

        let fetched = repo.get("Milk").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Milk");
        assert_eq!(fetched.quantity, 10);
        assert_eq!(fetched.sell_price.cents(), 1000);

        assert!(repo.get("Bread").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_name_rejected() {
        let repo = db().await.products();
        repo.insert(&new_product("Milk", 10)).await.unwrap();

        let err = repo.insert(&new_product("Milk", 5)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn try_decrement_success() {
        let repo = db().await.products();
        repo.insert(&new_product("Milk", 10)).await.unwrap();

        let remaining = repo.try_decrement("Milk", 3).await.unwrap();
        assert_eq!(remaining, 7);
        assert_eq!(repo.get("Milk").await.unwrap().unwrap().quantity, 7);
    }

    #[tokio::test]
    async fn try_decrement_insufficient_does_not_mutate() {
        let repo = db().await.products();
        repo.insert(&new_product("Milk", 4)).await.unwrap();

        let err = repo.try_decrement("Milk", 6).await.unwrap_err();
        match err {
            DbError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 4);
                assert_eq!(requested, 6);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Failed decrement left the stock untouched.
        assert_eq!(repo.get("Milk").await.unwrap().unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn try_decrement_unknown_product() {
        let repo = db().await.products();
        let err = repo.try_decrement("Ghost", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn try_decrement_to_exactly_zero() {
        let repo = db().await.products();
        repo.insert(&new_product("Milk", 3)).await.unwrap();

        assert_eq!(repo.try_decrement("Milk", 3).await.unwrap(), 0);
        assert_eq!(repo.get("Milk").await.unwrap().unwrap().quantity, 0);

        // And the floor holds: the next unit is refused.
        let err = repo.try_decrement("Milk", 1).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::InsufficientStock { available: 0, .. }
        ));
    }

    #[tokio::test]
    async fn update_and_delete() {
        let repo = db().await.products();
        let mut product = repo.insert(&new_product("Milk", 10)).await.unwrap();

        product.sell_price = Money::from_cents(1200);
        product.quantity = 25;
        repo.update(&product).await.unwrap();

        let fetched = repo.get("Milk").await.unwrap().unwrap();
        assert_eq!(fetched.sell_price.cents(), 1200);
        assert_eq!(fetched.quantity, 25);

        repo.delete("Milk").await.unwrap();
        assert!(repo.get("Milk").await.unwrap().is_none());
        assert!(matches!(
            repo.delete("Milk").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn rename_onto_existing_name_rejected() {
        let repo = db().await.products();
        repo.insert(&new_product("Milk", 10)).await.unwrap();
        let mut bread = repo.insert(&new_product("Bread", 5)).await.unwrap();

        bread.name = "Milk".to_string();
        let err = repo.update(&bread).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn list_filters() {
        let repo = db().await.products();
        repo.insert(&new_product("Whole Milk", 10)).await.unwrap();
        repo.insert(&new_product("Skim Milk", 10)).await.unwrap();
        repo.insert(&new_product("Bread", 10)).await.unwrap();

        let expiring = NewProduct::new(
            "Yogurt",
            Money::from_cents(100),
            Money::from_cents(200),
            3,
            NaiveDate::from_ymd_opt(2024, 2, 1),
            None,
        )
        .unwrap();
        repo.insert(&expiring).await.unwrap();

        let all = repo.list(&ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 4);

        let milk = repo
            .list(&ProductFilter {
                name_contains: Some("Milk".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(milk.len(), 2);

        let expiring_soon = repo
            .list(&ProductFilter {
                expires_on_or_before: NaiveDate::from_ymd_opt(2024, 2, 1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(expiring_soon.len(), 1);
        assert_eq!(expiring_soon[0].name, "Yogurt");
    }
}
