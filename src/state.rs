use std::sync::Arc;

use crate::{
    auth::TokenKeys,
    db::{DbPool, orm_from_pool},
    services::{AuthService, CategoryService, ProductService},
    stores::{
        CategoryReader, CategoryStore, CategoryWriter, ProductReader, ProductStore, ProductWriter,
        UserReader, UserStore, UserWriter,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub products: ProductService,
    pub categories: CategoryService,
}

impl AppState {
    /// Wires the Postgres stores; all of them share `pool`.
    pub fn from_pool(pool: &DbPool, tokens: TokenKeys) -> Self {
        let orm = orm_from_pool(pool);
        let users = Arc::new(UserStore::new(pool.clone()));
        let products = Arc::new(ProductStore::new(orm.clone()));
        let categories = Arc::new(CategoryStore::new(orm));

        Self {
            auth: AuthService::new(users.clone(), users, tokens),
            products: ProductService::new(products.clone(), products),
            categories: CategoryService::new(categories.clone(), categories),
        }
    }

    /// Wires every service to one store implementing all capabilities.
    pub fn with_store<S>(store: S, tokens: TokenKeys) -> Self
    where
        S: ProductWriter
            + ProductReader
            + CategoryWriter
            + CategoryReader
            + UserWriter
            + UserReader
            + 'static,
    {
        let store = Arc::new(store);
        Self {
            auth: AuthService::new(store.clone(), store.clone(), tokens),
            products: ProductService::new(store.clone(), store.clone()),
            categories: CategoryService::new(store.clone(), store),
        }
    }

    pub fn tokens(&self) -> &TokenKeys {
        self.auth.tokens()
    }
}
