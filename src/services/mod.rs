use crate::error::{ServiceError, StoreError};

pub mod auth_service;
pub mod category_service;
pub mod product_service;

pub use auth_service::AuthService;
pub use category_service::{CategoryService, TAG_GET_ALL_CATEGORIES};
pub use product_service::{ProductService, TAG_GET_ALL_PRODUCTS};

fn reject(err: ServiceError) -> ServiceError {
    tracing::warn!(error = %err, "data is invalid");
    err
}

fn store_failure(err: StoreError) -> ServiceError {
    let err = ServiceError::from(err);
    match &err {
        ServiceError::Store(inner) => tracing::error!(error = %inner, "store call failed"),
        domain => tracing::warn!(error = %domain, "store rejected request"),
    }
    err
}
