use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};

use crate::{
    dto::{
        categories::{
            AddCategoryRequest, CategoryIdResponse, CategoryList, DeleteCategoryRequest,
            EditCategoryRequest,
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
        .route("/add", post(add_category))
        .route("/delete", post(delete_category))
        .route("/edit", post(edit_category))
        .route("/get-all", post(get_all_categories))
}

#[utoipa::path(
    post,
    path = "/api/category/add",
    request_body = AddCategoryRequest,
    responses(
        (status = 200, description = "Category added", body = ApiResponse<CategoryIdResponse>),
        (status = 400, description = "Invalid input body"),
        (status = 500, description = "Validation or storage failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn add_category(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<AddCategoryRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<CategoryIdResponse>>> {
    let Json(payload) = payload?;
    let category_id = state.categories.add_category(&payload.name).await?;
    Ok(Json(ApiResponse::success(
        "Category added",
        CategoryIdResponse { category_id },
    )))
}

#[utoipa::path(
    post,
    path = "/api/category/delete",
    request_body = DeleteCategoryRequest,
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<EmptyData>),
        (status = 400, description = "Invalid input body"),
        (status = 500, description = "Validation or storage failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<DeleteCategoryRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<EmptyData>>> {
    let Json(payload) = payload?;
    state.categories.delete_category(payload.id).await?;
    Ok(Json(ApiResponse::success("Category deleted", EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/category/edit",
    request_body = EditCategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = ApiResponse<CategoryIdResponse>),
        (status = 400, description = "Invalid input body"),
        (status = 500, description = "Validation or storage failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn edit_category(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<EditCategoryRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<CategoryIdResponse>>> {
    let Json(payload) = payload?;
    let category_id = state
        .categories
        .edit_category(payload.id, &payload.name)
        .await?;
    Ok(Json(ApiResponse::success(
        "Category renamed",
        CategoryIdResponse { category_id },
    )))
}

#[utoipa::path(
    post,
    path = "/api/category/get-all",
    request_body = TagRequest,
    responses(
        (status = 200, description = "All categories", body = ApiResponse<CategoryList>),
        (status = 500, description = "Unknown tag or storage failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn get_all_categories(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<TagRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let Json(payload) = payload?;
    let items = state.categories.get_all_categories(&payload.tag).await?;
    Ok(Json(ApiResponse::success("Categories", CategoryList { items })))
}
