use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub original_name: String,
    pub filename: String,
    pub path: String,
    pub size: u64,
    pub mimetype: String,
    #[serde(rename = "type")]
    pub document_type: String,
    pub upload_date: DateTime<Utc>,
}
