use serde::{Deserialize, Serialize};

/// Idempotency mode for the attach path, selected by the `ifexists` query
/// parameter. Unrecognized values fall back to `Skip`. The `-recrawl`
/// variants are accepted but behave exactly like their base mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfExists {
    Skip,
    Overwrite,
    OverwriteRecrawl,
    Append,
    AppendRecrawl,
}

impl IfExists {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("overwrite") => IfExists::Overwrite,
            Some("overwrite-recrawl") => IfExists::OverwriteRecrawl,
            Some("append") => IfExists::Append,
            Some("append-recrawl") => IfExists::AppendRecrawl,
            _ => IfExists::Skip,
        }
    }

    /// Append modes leave any prior full-page archive attached.
    pub fn keeps_existing_archive(&self) -> bool {
        matches!(self, IfExists::Append | IfExists::AppendRecrawl)
    }
}

#[derive(Debug, Deserialize)]
pub struct SingleFileQuery {
    pub ifexists: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub max_asset_size_mb: u64,
    pub max_request_size_mb: u64,
}

/// Attach-mode success body. Field presence follows the outcome: a skipped
/// duplicate has no asset id, a fresh bookmark has no removed-task count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachResponse {
    pub status: &'static str,
    pub url: String,
    pub bookmark_id: String,
    pub already_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_crawler_tasks: Option<u64>,
}
