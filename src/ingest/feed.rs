use serde::Deserialize;

use crate::models::NewProduct;

/// One record of the external feed. Only `name` (and optional category names)
/// are imported; the feed's own id is kept for logging. Fields may be missing
/// or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedProduct {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "categoryies")]
    pub categories: Option<Vec<FeedCategory>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedCategory {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

impl FeedProduct {
    fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.trim().is_empty())
    }
}

impl From<FeedProduct> for NewProduct {
    fn from(record: FeedProduct) -> Self {
        NewProduct::new(
            record.name.unwrap_or_default(),
            record
                .categories
                .unwrap_or_default()
                .into_iter()
                .filter_map(|category| category.name)
                .filter(|name| !name.trim().is_empty())
                .collect(),
        )
    }
}

/// Decodes a feed body into products ready for the batch write.
///
/// Records without a name cannot become products and are dropped; anything
/// that is not a JSON array of records is an error.
pub fn decode_feed(body: &[u8]) -> Result<Vec<NewProduct>, serde_json::Error> {
    let records: Vec<FeedProduct> = serde_json::from_slice(body)?;
    Ok(records
        .into_iter()
        .filter(|record| {
            let keep = record.has_name();
            if !keep {
                tracing::warn!(feed_id = ?record.id, "skipping feed record without a name");
            }
            keep
        })
        .map(NewProduct::from)
        .collect())
}
