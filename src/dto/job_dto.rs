use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::job::{Department, JobType};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub short_description: Option<String>,
    pub department: Department,
    pub job_type: Option<JobType>,
    #[validate(length(min = 1))]
    pub location: String,
    pub salary: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub responsibilities: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub posted_by: Option<i32>,
    pub is_active: Option<bool>,
    pub deadline: Option<DateTime<Utc>>,
    #[validate(range(min = 1))]
    pub vacancies: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub department: Option<Department>,
    pub job_type: Option<JobType>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    pub salary: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub responsibilities: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub posted_by: Option<i32>,
    pub is_active: Option<bool>,
    pub deadline: Option<DateTime<Utc>>,
    #[validate(range(min = 1))]
    pub vacancies: Option<i32>,
}

/// Raw query string; enum filters are parsed by the handler so that an unknown
/// value produces the envelope error instead of a plain-text rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
pub struct JobListQuery {
    pub query: Option<String>,
    pub department: Option<String>,
    pub job_type: Option<String>,
    pub active: Option<String>,
}

/// Parsed search criteria passed to storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobSearch {
    pub query: String,
    pub department: Option<Department>,
    pub job_type: Option<JobType>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl JobListQuery {
    /// `Some` when any search filter is present; empty values count as absent.
    pub fn search(&self) -> Result<Option<JobSearch>> {
        let query = non_empty(&self.query);
        let department = non_empty(&self.department);
        let job_type = non_empty(&self.job_type);
        if query.is_none() && department.is_none() && job_type.is_none() {
            return Ok(None);
        }
        Ok(Some(JobSearch {
            query: query.unwrap_or_default().to_string(),
            department: department
                .map(str::parse::<Department>)
                .transpose()
                .map_err(Error::BadRequest)?,
            job_type: job_type
                .map(str::parse::<JobType>)
                .transpose()
                .map_err(Error::BadRequest)?,
        }))
    }

    pub fn active_only(&self) -> bool {
        self.active.as_deref() == Some("true")
    }
}
