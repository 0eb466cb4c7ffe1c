use std::sync::Arc;

use crate::{
    error::{ServiceError, ServiceResult},
    models::{Category, NewProduct, Product},
    services::{reject, store_failure},
    stores::{ProductReader, ProductWriter},
};

/// Literal the listing endpoint must be called with.
pub const TAG_GET_ALL_PRODUCTS: &str = "get all products";

#[derive(Clone)]
pub struct ProductService {
    writer: Arc<dyn ProductWriter>,
    reader: Arc<dyn ProductReader>,
}

impl ProductService {
    pub fn new(writer: Arc<dyn ProductWriter>, reader: Arc<dyn ProductReader>) -> Self {
        Self { writer, reader }
    }

    #[tracing::instrument(skip(self, categories), fields(op = "product.add_product"))]
    pub async fn add_product(&self, name: &str, categories: &[String]) -> ServiceResult<i64> {
        if name.trim().is_empty() {
            return Err(reject(ServiceError::ProductNameEmpty));
        }
        if categories.is_empty() {
            return Err(reject(ServiceError::CategoriesEmpty));
        }

        let id = self
            .writer
            .add_product(name, categories)
            .await
            .map_err(store_failure)?;

        tracing::info!(id, "product added");
        Ok(id)
    }

    /// Batch path used by the catalog sync. Products may carry no categories.
    #[tracing::instrument(skip_all, fields(op = "product.add_products", count = products.len()))]
    pub async fn add_products(&self, products: &[NewProduct]) -> ServiceResult<()> {
        if products.is_empty() {
            return Err(reject(ServiceError::ProductsEmpty));
        }

        self.writer
            .add_products(products)
            .await
            .map_err(store_failure)?;

        tracing::info!("products added");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(op = "product.delete_product"))]
    pub async fn delete_product(&self, id: i64) -> ServiceResult<()> {
        if id <= 0 {
            return Err(reject(ServiceError::ProductIdInvalid));
        }

        self.writer.delete_product(id).await.map_err(store_failure)?;

        tracing::info!("product deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(op = "product.edit_product_name"))]
    pub async fn edit_product_name(&self, id: i64, name: &str) -> ServiceResult<i64> {
        if id <= 0 {
            return Err(reject(ServiceError::ProductIdInvalid));
        }
        if name.trim().is_empty() {
            return Err(reject(ServiceError::ProductNameEmpty));
        }

        let id = self
            .writer
            .update_product_name(id, name)
            .await
            .map_err(store_failure)?;

        tracing::info!("product renamed");
        Ok(id)
    }

    #[tracing::instrument(skip(self, categories), fields(op = "product.edit_product_categories"))]
    pub async fn edit_product_categories(
        &self,
        id: i64,
        categories: &[Category],
    ) -> ServiceResult<i64> {
        if id <= 0 {
            return Err(reject(ServiceError::ProductIdInvalid));
        }
        if categories.is_empty() {
            return Err(reject(ServiceError::CategoriesEmpty));
        }

        let id = self
            .writer
            .update_product_categories(id, categories)
            .await
            .map_err(store_failure)?;

        tracing::info!("product categories replaced");
        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(op = "product.get_all_products"))]
    pub async fn get_all_products(&self, tag: &str) -> ServiceResult<Vec<Product>> {
        if tag != TAG_GET_ALL_PRODUCTS {
            return Err(reject(ServiceError::UnknownTag(tag.to_owned())));
        }

        let products = self.reader.get_all_products().await.map_err(store_failure)?;
        tracing::info!(count = products.len(), "products listed");
        Ok(products)
    }

    #[tracing::instrument(skip(self), fields(op = "product.get_category_products"))]
    pub async fn get_category_products(&self, category: &str) -> ServiceResult<Vec<Product>> {
        if category.trim().is_empty() {
            return Err(reject(ServiceError::CategoryNameEmpty));
        }

        let products = self
            .reader
            .get_category_products(category)
            .await
            .map_err(store_failure)?;
        tracing::info!(count = products.len(), "category products listed");
        Ok(products)
    }
}
