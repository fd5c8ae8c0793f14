use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::application::ApplicationStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationPayload {
    pub job_id: i32,
    pub candidate_id: i32,
    pub user_id: i32,
    pub status: Option<ApplicationStatus>,
    pub cover_letter: Option<String>,
    pub notes: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_feedback: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationPayload {
    pub job_id: Option<i32>,
    pub candidate_id: Option<i32>,
    pub user_id: Option<i32>,
    pub status: Option<ApplicationStatus>,
    pub cover_letter: Option<String>,
    pub notes: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_feedback: Option<String>,
}
