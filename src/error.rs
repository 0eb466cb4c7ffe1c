use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

use crate::response::ApiResponse;

/// Failures raised by the stores. Each write step has its own variant so the
/// service layer can tell which statement of a transaction failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("error starting transaction")]
    StartTransaction(#[source] DbErr),

    #[error("error committing transaction")]
    EndTransaction(#[source] DbErr),

    #[error("category already exists")]
    CategoryExists,

    #[error("category {0} does not exist")]
    CategoryNotFound(String),

    #[error("error saving category")]
    CategorySaveFailed(#[source] DbErr),

    #[error("error deleting category")]
    CategoryDeleteFailed(#[source] DbErr),

    #[error("error updating category name")]
    CategoryUpdateFailed(#[source] DbErr),

    #[error("error getting categories")]
    CategoryListFailed(#[source] DbErr),

    #[error("error resolving category")]
    CategoryLookupFailed(#[source] DbErr),

    #[error("product is not saved")]
    ProductSaveFailed(#[source] DbErr),

    #[error("error deleting product")]
    ProductDeleteFailed(#[source] DbErr),

    #[error("error updating product name")]
    ProductUpdateFailed(#[source] DbErr),

    #[error("product not found")]
    ProductNotFound,

    #[error("error querying products")]
    ProductQueryFailed(#[source] DbErr),

    #[error("error saving product category")]
    ProductCategorySaveFailed(#[source] DbErr),

    #[error("error deleting product category")]
    ProductCategoryDeleteFailed(#[source] DbErr),

    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,

    #[error("error querying users")]
    UserQueryFailed(#[source] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the service layer to its callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("product name is empty")]
    ProductNameEmpty,

    #[error("product id must be positive")]
    ProductIdInvalid,

    #[error("product categoryies is empty")]
    CategoriesEmpty,

    #[error("products is empty")]
    ProductsEmpty,

    #[error("category name is empty")]
    CategoryNameEmpty,

    #[error("category id must be positive")]
    CategoryIdInvalid,

    #[error("unknown tag {0:?}")]
    UnknownTag(String),

    #[error("email is empty")]
    EmailEmpty,

    #[error("password is empty")]
    PasswordEmpty,

    #[error("category already exists")]
    CategoryExists,

    #[error("category {0} not found")]
    CategoryNotFound(String),

    #[error("product not found")]
    ProductNotFound,

    #[error("user already exists")]
    UserExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("failed to hash password")]
    PasswordHash,

    #[error("token error")]
    Token(#[source] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    /// Validation failures are raised before any storage call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ServiceError::ProductNameEmpty
                | ServiceError::ProductIdInvalid
                | ServiceError::CategoriesEmpty
                | ServiceError::ProductsEmpty
                | ServiceError::CategoryNameEmpty
                | ServiceError::CategoryIdInvalid
                | ServiceError::UnknownTag(_)
                | ServiceError::EmailEmpty
                | ServiceError::PasswordEmpty
        )
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CategoryExists => ServiceError::CategoryExists,
            StoreError::CategoryNotFound(name) => ServiceError::CategoryNotFound(name),
            StoreError::ProductNotFound => ServiceError::ProductNotFound,
            StoreError::UserExists => ServiceError::UserExists,
            other => ServiceError::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub const INVALID_INPUT_BODY: &str = "invalid input body";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", INVALID_INPUT_BODY)]
    InvalidInputBody,

    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("Not Found")]
    NotFound,

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "rejected request body");
        AppError::InvalidInputBody
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInputBody => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Service(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let message = self.to_string();
        let body = ApiResponse {
            message: message.clone(),
            data: Some(ErrorData { error: message }),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_conflicts_become_distinct_domain_errors() {
        assert!(matches!(
            ServiceError::from(StoreError::CategoryExists),
            ServiceError::CategoryExists
        ));
        assert!(matches!(
            ServiceError::from(StoreError::CategoryNotFound("Toys".into())),
            ServiceError::CategoryNotFound(name) if name == "Toys"
        ));
        assert!(matches!(
            ServiceError::from(StoreError::ProductNotFound),
            ServiceError::ProductNotFound
        ));
    }

    #[test]
    fn unrecognised_store_errors_pass_through() {
        let err = ServiceError::from(StoreError::CategoryDeleteFailed(DbErr::Custom(
            "boom".into(),
        )));
        assert!(matches!(
            err,
            ServiceError::Store(StoreError::CategoryDeleteFailed(_))
        ));
        assert_eq!(err.to_string(), "error deleting category");
    }

    #[test]
    fn http_status_follows_error_kind() {
        let resp = AppError::InvalidInputBody.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::Service(ServiceError::ProductNameEmpty).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = AppError::Unauthorized("empty auth header").into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
