use serde::Deserialize;
use utoipa::ToSchema;

/// Body of the `get-all` listing endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TagRequest {
    pub tag: String,
}
