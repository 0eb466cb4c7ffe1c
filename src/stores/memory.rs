//! In-memory implementation of every store trait.
//!
//! Mirrors the Postgres stores' transactional behaviour by applying each write
//! to a scratch copy of the state and swapping it in only on success.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::{StoreError, StoreResult},
    models::{Category, NewProduct, Product, User},
    stores::{
        CategoryReader, CategoryWriter, ProductReader, ProductWriter, UserReader, UserWriter,
        dedup_preserving_order,
    },
};

#[derive(Debug, Clone, Default)]
struct State {
    next_user_id: i64,
    next_category_id: i64,
    next_product_id: i64,
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, String>,
    products: BTreeMap<i64, String>,
    links: BTreeSet<(i64, i64)>,
}

impl State {
    fn category_id(&self, name: &str) -> Option<i64> {
        self.categories
            .iter()
            .find(|(_, existing)| existing.as_str() == name)
            .map(|(id, _)| *id)
    }

    fn insert_product(&mut self, name: &str, categories: &[String]) -> StoreResult<i64> {
        let mut category_ids = Vec::with_capacity(categories.len());
        for category in dedup_preserving_order(categories) {
            match self.category_id(&category) {
                Some(id) => category_ids.push(id),
                None => return Err(StoreError::CategoryNotFound(category)),
            }
        }

        self.next_product_id += 1;
        let id = self.next_product_id;
        self.products.insert(id, name.to_owned());
        for category_id in category_ids {
            self.links.insert((id, category_id));
        }
        Ok(id)
    }

    fn product(&self, id: i64, name: &str) -> Product {
        let categories = self
            .links
            .iter()
            .filter(|(product_id, _)| *product_id == id)
            .filter_map(|(_, category_id)| {
                self.categories.get(category_id).map(|name| Category {
                    id: *category_id,
                    name: name.clone(),
                })
            })
            .collect();
        Product {
            id,
            name: name.to_owned(),
            categories,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of association rows currently stored.
    pub fn link_count(&self) -> usize {
        self.lock().links.len()
    }

    /// Association rows pointing at `category_id`.
    pub fn links_for_category(&self, category_id: i64) -> Vec<(i64, i64)> {
        self.lock()
            .links
            .iter()
            .filter(|(_, category)| *category == category_id)
            .copied()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave a half-applied write
        // behind, since writes go through `transaction`.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn transaction<T>(&self, apply: impl FnOnce(&mut State) -> StoreResult<T>) -> StoreResult<T> {
        let mut guard = self.lock();
        let mut scratch = guard.clone();
        let value = apply(&mut scratch)?;
        *guard = scratch;
        Ok(value)
    }
}

#[async_trait]
impl CategoryWriter for MemoryStore {
    async fn add_category(&self, name: &str) -> StoreResult<i64> {
        self.transaction(|state| {
            if state.category_id(name).is_some() {
                return Err(StoreError::CategoryExists);
            }
            state.next_category_id += 1;
            let id = state.next_category_id;
            state.categories.insert(id, name.to_owned());
            Ok(id)
        })
    }

    async fn delete_category(&self, id: i64) -> StoreResult<()> {
        self.transaction(|state| {
            if state.categories.remove(&id).is_none() {
                return Err(StoreError::CategoryNotFound(id.to_string()));
            }
            state.links.retain(|(_, category_id)| *category_id != id);
            Ok(())
        })
    }

    async fn update_category_name(&self, id: i64, name: &str) -> StoreResult<i64> {
        self.transaction(|state| {
            if state.category_id(name).is_some_and(|existing| existing != id) {
                return Err(StoreError::CategoryExists);
            }
            match state.categories.get_mut(&id) {
                Some(current) => {
                    *current = name.to_owned();
                    Ok(id)
                }
                None => Err(StoreError::CategoryNotFound(id.to_string())),
            }
        })
    }
}

#[async_trait]
impl CategoryReader for MemoryStore {
    async fn get_all_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self
            .lock()
            .categories
            .iter()
            .map(|(id, name)| Category {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl ProductWriter for MemoryStore {
    async fn add_product(&self, name: &str, categories: &[String]) -> StoreResult<i64> {
        self.transaction(|state| state.insert_product(name, categories))
    }

    async fn add_products(&self, products: &[NewProduct]) -> StoreResult<()> {
        self.transaction(|state| {
            for product in products {
                state.insert_product(&product.name, &product.categories)?;
            }
            Ok(())
        })
    }

    async fn delete_product(&self, id: i64) -> StoreResult<()> {
        self.transaction(|state| {
            if state.products.remove(&id).is_none() {
                return Err(StoreError::ProductNotFound);
            }
            state.links.retain(|(product_id, _)| *product_id != id);
            Ok(())
        })
    }

    async fn update_product_name(&self, id: i64, name: &str) -> StoreResult<i64> {
        self.transaction(|state| match state.products.get_mut(&id) {
            Some(current) => {
                *current = name.to_owned();
                Ok(id)
            }
            None => Err(StoreError::ProductNotFound),
        })
    }

    async fn update_product_categories(&self, id: i64, wanted: &[Category]) -> StoreResult<i64> {
        self.transaction(|state| {
            if !state.products.contains_key(&id) {
                return Err(StoreError::ProductNotFound);
            }

            let mut category_ids = Vec::with_capacity(wanted.len());
            for category in wanted {
                let found = if category.id > 0 {
                    state
                        .categories
                        .contains_key(&category.id)
                        .then_some(category.id)
                } else {
                    state.category_id(&category.name)
                };
                match found {
                    Some(category_id) => category_ids.push(category_id),
                    None if category.id > 0 => {
                        return Err(StoreError::CategoryNotFound(category.id.to_string()));
                    }
                    None => return Err(StoreError::CategoryNotFound(category.name.clone())),
                }
            }

            state.links.retain(|(product_id, _)| *product_id != id);
            for category_id in category_ids {
                state.links.insert((id, category_id));
            }
            Ok(id)
        })
    }
}

#[async_trait]
impl ProductReader for MemoryStore {
    async fn get_all_products(&self) -> StoreResult<Vec<Product>> {
        let state = self.lock();
        Ok(state
            .products
            .iter()
            .map(|(id, name)| state.product(*id, name))
            .collect())
    }

    async fn get_category_products(&self, category: &str) -> StoreResult<Vec<Product>> {
        let state = self.lock();
        let Some(category_id) = state.category_id(category) else {
            return Ok(Vec::new());
        };
        Ok(state
            .products
            .iter()
            .filter(|(id, _)| state.links.contains(&(**id, category_id)))
            .map(|(id, name)| state.product(*id, name))
            .collect())
    }
}

#[async_trait]
impl UserWriter for MemoryStore {
    async fn save_user(&self, email: &str, password_hash: &str) -> StoreResult<i64> {
        self.transaction(|state| {
            if state.users.values().any(|user| user.email == email) {
                return Err(StoreError::UserExists);
            }
            state.next_user_id += 1;
            let id = state.next_user_id;
            state.users.insert(
                id,
                User {
                    id,
                    email: email.to_owned(),
                    password_hash: password_hash.to_owned(),
                    created_at: Utc::now(),
                },
            );
            Ok(id)
        })
    }
}

#[async_trait]
impl UserReader for MemoryStore {
    async fn user_by_email(&self, email: &str) -> StoreResult<User> {
        self.lock()
            .users
            .values()
            .find(|user| user.email == email)
            .cloned()
            .ok_or(StoreError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_write_leaves_state_untouched() {
        let store = MemoryStore::new();
        store.add_category("Toys").await.unwrap();

        let err = store
            .add_product("Robot", &["Toys".into(), "Missing".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::CategoryNotFound(name) if name == "Missing"));
        assert!(store.get_all_products().await.unwrap().is_empty());
        assert_eq!(store.link_count(), 0);
    }

    #[tokio::test]
    async fn repeated_category_names_link_once() {
        let store = MemoryStore::new();
        store.add_category("Toys").await.unwrap();

        let id = store
            .add_product("Robot", &["Toys".into(), "Toys".into()])
            .await
            .unwrap();
        let products = store.get_all_products().await.unwrap();
        assert_eq!(products[0].id, id);
        assert_eq!(products[0].categories.len(), 1);
    }
}
