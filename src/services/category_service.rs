use std::sync::Arc;

use crate::{
    error::{ServiceError, ServiceResult},
    models::Category,
    services::{reject, store_failure},
    stores::{CategoryReader, CategoryWriter},
};

/// The category listing shares the product listing's tag value.
pub const TAG_GET_ALL_CATEGORIES: &str = "get all products";

#[derive(Clone)]
pub struct CategoryService {
    writer: Arc<dyn CategoryWriter>,
    reader: Arc<dyn CategoryReader>,
}

impl CategoryService {
    pub fn new(writer: Arc<dyn CategoryWriter>, reader: Arc<dyn CategoryReader>) -> Self {
        Self { writer, reader }
    }

    #[tracing::instrument(skip(self), fields(op = "category.add_category"))]
    pub async fn add_category(&self, name: &str) -> ServiceResult<i64> {
        if name.trim().is_empty() {
            return Err(reject(ServiceError::CategoryNameEmpty));
        }

        let id = self.writer.add_category(name).await.map_err(store_failure)?;

        tracing::info!(id, "category added");
        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(op = "category.delete_category"))]
    pub async fn delete_category(&self, id: i64) -> ServiceResult<()> {
        if id <= 0 {
            return Err(reject(ServiceError::CategoryIdInvalid));
        }

        self.writer.delete_category(id).await.map_err(store_failure)?;

        tracing::info!("category deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(op = "category.edit_category"))]
    pub async fn edit_category(&self, id: i64, name: &str) -> ServiceResult<i64> {
        if id <= 0 {
            return Err(reject(ServiceError::CategoryIdInvalid));
        }
        if name.trim().is_empty() {
            return Err(reject(ServiceError::CategoryNameEmpty));
        }

        let id = self
            .writer
            .update_category_name(id, name)
            .await
            .map_err(store_failure)?;

        tracing::info!("category renamed");
        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(op = "category.get_all_categories"))]
    pub async fn get_all_categories(&self, tag: &str) -> ServiceResult<Vec<Category>> {
        if tag != TAG_GET_ALL_CATEGORIES {
            return Err(reject(ServiceError::UnknownTag(tag.to_owned())));
        }

        let categories = self
            .reader
            .get_all_categories()
            .await
            .map_err(store_failure)?;
        tracing::info!(count = categories.len(), "categories listed");
        Ok(categories)
    }
}
