use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const DEFAULT_INTERVIEW_STATUS: &str = "scheduled";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: i32,
    pub application_id: i32,
    pub scheduled_for: DateTime<Utc>,
    pub interviewer_id: Option<i32>,
    pub status: String,
    pub feedback: Option<String>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
