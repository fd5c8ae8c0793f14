use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "department", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Engineering,
    Operations,
    Management,
    CustomerService,
    Maintenance,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Engineering => "engineering",
            Department::Operations => "operations",
            Department::Management => "management",
            Department::CustomerService => "customer_service",
            Department::Maintenance => "maintenance",
        }
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "engineering" => Ok(Department::Engineering),
            "operations" => Ok(Department::Operations),
            "management" => Ok(Department::Management),
            "customer_service" => Ok(Department::CustomerService),
            "maintenance" => Ok(Department::Maintenance),
            other => Err(format!("Unknown department: {}", other)),
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Temporary,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Contract => "contract",
            JobType::Temporary => "temporary",
            JobType::Internship => "internship",
        }
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_time" => Ok(JobType::FullTime),
            "part_time" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "temporary" => Ok(JobType::Temporary),
            "internship" => Ok(JobType::Internship),
            other => Err(format!("Unknown job type: {}", other)),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub short_description: Option<String>,
    pub department: Department,
    pub job_type: JobType,
    pub location: String,
    pub salary: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub responsibilities: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub posted_by: Option<i32>,
    pub is_active: bool,
    pub deadline: Option<DateTime<Utc>>,
    pub vacancies: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Case-sensitive substring match over the searchable text columns.
    pub fn matches_text(&self, query: &str) -> bool {
        query.is_empty()
            || self.title.contains(query)
            || self.description.contains(query)
            || self
                .short_description
                .as_deref()
                .is_some_and(|s| s.contains(query))
            || self.location.contains(query)
    }
}
