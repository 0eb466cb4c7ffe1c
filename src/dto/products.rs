use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, Product};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddProductRequest {
    pub name: String,
    #[serde(rename = "categoryies", alias = "categories")]
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteProductRequest {
    pub id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EditProductNameRequest {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EditProductCategoriesRequest {
    pub id: i64,
    #[serde(rename = "categoryies", alias = "categories")]
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryProductsRequest {
    pub category: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductIdResponse {
    pub product_id: i64,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
