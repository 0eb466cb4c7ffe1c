//! Storage capabilities and their implementations.
//!
//! Services depend on the narrow traits below rather than on a concrete store,
//! so the Postgres stores can be swapped for [`memory::MemoryStore`] in tests.

use async_trait::async_trait;

use crate::{
    error::StoreResult,
    models::{Category, NewProduct, Product, User},
};

pub mod category_store;
pub mod memory;
pub mod product_store;
pub mod user_store;

pub use category_store::CategoryStore;
pub use memory::MemoryStore;
pub use product_store::ProductStore;
pub use user_store::UserStore;

#[async_trait]
pub trait CategoryWriter: Send + Sync {
    async fn add_category(&self, name: &str) -> StoreResult<i64>;

    /// Removes the category and every association row pointing at it.
    async fn delete_category(&self, id: i64) -> StoreResult<()>;

    async fn update_category_name(&self, id: i64, name: &str) -> StoreResult<i64>;
}

#[async_trait]
pub trait CategoryReader: Send + Sync {
    async fn get_all_categories(&self) -> StoreResult<Vec<Category>>;
}

#[async_trait]
pub trait ProductWriter: Send + Sync {
    /// Inserts the product and links it to the named categories, all or nothing.
    async fn add_product(&self, name: &str, categories: &[String]) -> StoreResult<i64>;

    /// Inserts every product in one transaction; one bad item discards the batch.
    async fn add_products(&self, products: &[NewProduct]) -> StoreResult<()>;

    async fn delete_product(&self, id: i64) -> StoreResult<()>;

    async fn update_product_name(&self, id: i64, name: &str) -> StoreResult<i64>;

    /// Replaces the product's category links with `categories`.
    async fn update_product_categories(&self, id: i64, categories: &[Category])
    -> StoreResult<i64>;
}

#[async_trait]
pub trait ProductReader: Send + Sync {
    async fn get_all_products(&self) -> StoreResult<Vec<Product>>;

    async fn get_category_products(&self, category: &str) -> StoreResult<Vec<Product>>;
}

#[async_trait]
pub trait UserWriter: Send + Sync {
    async fn save_user(&self, email: &str, password_hash: &str) -> StoreResult<i64>;
}

#[async_trait]
pub trait UserReader: Send + Sync {
    /// Returns [`crate::error::StoreError::UserNotFound`] when no row matches.
    async fn user_by_email(&self, email: &str) -> StoreResult<User>;
}

/// Drops repeated entries while keeping the first occurrence's position.
pub(crate) fn dedup_preserving_order<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}
