use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewPayload {
    pub application_id: i32,
    pub scheduled_for: DateTime<Utc>,
    pub interviewer_id: Option<i32>,
    #[validate(length(min = 1))]
    pub status: Option<String>,
    pub feedback: Option<String>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInterviewPayload {
    pub application_id: Option<i32>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub interviewer_id: Option<i32>,
    #[validate(length(min = 1))]
    pub status: Option<String>,
    pub feedback: Option<String>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}
