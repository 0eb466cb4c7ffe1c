use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};

use crate::{
    dto::{
        products::{
            AddProductRequest, CategoryProductsRequest, DeleteProductRequest,
            EditProductCategoriesRequest, EditProductNameRequest, ProductIdResponse, ProductList,
        },
        tag::TagRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, EmptyData},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_product))
        .route("/delete", post(delete_product))
        .route("/edit-name", post(edit_product_name))
        .route("/edit-categoryies", post(edit_product_categories))
        .route("/get-all", post(get_all_products))
        .route("/get", post(get_category_products))
}

#[utoipa::path(
    post,
    path = "/api/product/add",
    request_body = AddProductRequest,
    responses(
        (status = 200, description = "Product added", body = ApiResponse<ProductIdResponse>),
        (status = 400, description = "Invalid input body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Validation or storage failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn add_product(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<AddProductRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<ProductIdResponse>>> {
    let Json(payload) = payload?;
    let product_id = state
        .products
        .add_product(&payload.name, &payload.categories)
        .await?;
    Ok(Json(ApiResponse::success(
        "Product added",
        ProductIdResponse { product_id },
    )))
}

#[utoipa::path(
    post,
    path = "/api/product/delete",
    request_body = DeleteProductRequest,
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<EmptyData>),
        (status = 400, description = "Invalid input body"),
        (status = 500, description = "Validation or storage failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<DeleteProductRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<EmptyData>>> {
    let Json(payload) = payload?;
    state.products.delete_product(payload.id).await?;
    Ok(Json(ApiResponse::success("Product deleted", EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/product/edit-name",
    request_body = EditProductNameRequest,
    responses(
        (status = 200, description = "Product renamed", body = ApiResponse<ProductIdResponse>),
        (status = 400, description = "Invalid input body"),
        (status = 500, description = "Validation or storage failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn edit_product_name(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<EditProductNameRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<ProductIdResponse>>> {
    let Json(payload) = payload?;
    let product_id = state
        .products
        .edit_product_name(payload.id, &payload.name)
        .await?;
    Ok(Json(ApiResponse::success(
        "Product renamed",
        ProductIdResponse { product_id },
    )))
}

#[utoipa::path(
    post,
    path = "/api/product/edit-categoryies",
    request_body = EditProductCategoriesRequest,
    responses(
        (status = 200, description = "Product categories replaced", body = ApiResponse<ProductIdResponse>),
        (status = 400, description = "Invalid input body"),
        (status = 500, description = "Validation or storage failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn edit_product_categories(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<EditProductCategoriesRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<ProductIdResponse>>> {
    let Json(payload) = payload?;
    let product_id = state
        .products
        .edit_product_categories(payload.id, &payload.categories)
        .await?;
    Ok(Json(ApiResponse::success(
        "Product categories updated",
        ProductIdResponse { product_id },
    )))
}

#[utoipa::path(
    post,
    path = "/api/product/get-all",
    request_body = TagRequest,
    responses(
        (status = 200, description = "All products", body = ApiResponse<ProductList>),
        (status = 500, description = "Unknown tag or storage failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn get_all_products(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<TagRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let Json(payload) = payload?;
    let items = state.products.get_all_products(&payload.tag).await?;
    Ok(Json(ApiResponse::success("Products", ProductList { items })))
}

#[utoipa::path(
    post,
    path = "/api/product/get",
    request_body = CategoryProductsRequest,
    responses(
        (status = 200, description = "Products in the category", body = ApiResponse<ProductList>),
        (status = 500, description = "Validation or storage failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn get_category_products(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<CategoryProductsRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let Json(payload) = payload?;
    let items = state
        .products
        .get_category_products(&payload.category)
        .await?;
    Ok(Json(ApiResponse::success("Products", ProductList { items })))
}
