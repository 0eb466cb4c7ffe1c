use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};

use crate::{
    dto::auth::{SignInRequest, SignInResponse, SignUpRequest, SignUpResponse},
    error::AppResult,
    response::ApiResponse,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
}

#[utoipa::path(
    post,
    path = "/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "User registered", body = ApiResponse<SignUpResponse>),
        (status = 400, description = "Invalid input body"),
        (status = 500, description = "Validation failure or email taken"),
    ),
    tag = "Auth"
)]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<SignUpResponse>>> {
    let Json(payload) = payload?;
    let id = state
        .auth
        .register(&payload.email, &payload.password)
        .await?;
    Ok(Json(ApiResponse::success("User created", SignUpResponse { id })))
}

#[utoipa::path(
    post,
    path = "/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<SignInResponse>),
        (status = 400, description = "Invalid input body"),
        (status = 500, description = "Invalid credentials"),
    ),
    tag = "Auth"
)]
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<SignInResponse>>> {
    let Json(payload) = payload?;
    let token = state.auth.login(&payload.email, &payload.password).await?;
    Ok(Json(ApiResponse::success("Logged in", SignInResponse { token })))
}
