//! Typed HTTP client for the recruitment API with a query cache.
//!
//! Reads are served from [`QueryCache`] when present. Every mutation drops
//! the cached queries it can have made stale, keyed the same way the reads
//! store them.

pub mod cache;

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::dto::{
    application_dto::{CreateApplicationPayload, UpdateApplicationPayload},
    candidate_dto::UpdateCandidatePayload,
    interview_dto::{CreateInterviewPayload, UpdateInterviewPayload},
    job_dto::{CreateJobPayload, UpdateJobPayload},
    response_dto::ApiResponse,
};
use crate::models::{
    application::Application, candidate::Candidate, interview::Interview, job::Job,
};
use crate::query_key;

pub use cache::{QueryCache, QueryKey};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Query parameters of `GET /api/jobs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

pub struct RecruitmentClient {
    http: Client,
    base_url: String,
    cache: QueryCache,
}

impl RecruitmentClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: QueryCache::new(),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let envelope: ApiResponse<T> = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(err) if status.is_success() => return Err(ClientError::Decode(err)),
            Err(_) => {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message: String::from_utf8_lossy(&bytes).into_owned(),
                })
            }
        };

        match envelope {
            ApiResponse {
                success: true,
                data: Some(data),
                ..
            } if status.is_success() => Ok(data),
            envelope => Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "Unexpected response".to_string()),
            }),
        }
    }

    /// Cached GET.
    async fn query<T>(&self, key: QueryKey, path: &str) -> ClientResult<T>
    where
        T: DeserializeOwned + Serialize,
    {
        if let Some(hit) = self.cache.get(&key) {
            return Ok(serde_json::from_value(hit)?);
        }
        let fresh: T = self.send(self.request(Method::GET, path)).await?;
        self.cache.insert(key, serde_json::to_value(&fresh)?);
        Ok(fresh)
    }

    /// Cached copy of a single record, if one decodes.
    fn cached<T: DeserializeOwned>(&self, key: &[String]) -> Option<T> {
        self.cache
            .get(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    async fn mutate<B, T>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(method, path).json(body)).await
    }

    pub async fn jobs(&self, filter: &JobFilter) -> ClientResult<Vec<Job>> {
        let key = query_key!["jobs", serde_json::to_string(filter)?];
        if let Some(hit) = self.cache.get(&key) {
            return Ok(serde_json::from_value(hit)?);
        }
        let jobs: Vec<Job> = self
            .send(self.request(Method::GET, "/api/jobs").query(filter))
            .await?;
        self.cache.insert(key, serde_json::to_value(&jobs)?);
        Ok(jobs)
    }

    pub async fn job(&self, id: i32) -> ClientResult<Job> {
        self.query(query_key!["jobs", id], &format!("/api/jobs/{}", id))
            .await
    }

    pub async fn create_job(&self, payload: &CreateJobPayload) -> ClientResult<Job> {
        let job: Job = self.mutate(Method::POST, "/api/jobs", payload).await?;
        self.cache.invalidate(&query_key!["jobs"]);
        Ok(job)
    }

    pub async fn update_job(&self, id: i32, payload: &UpdateJobPayload) -> ClientResult<Job> {
        let job: Job = self
            .mutate(Method::PATCH, &format!("/api/jobs/{}", id), payload)
            .await?;
        self.cache.invalidate(&query_key!["jobs", id]);
        self.cache.invalidate(&query_key!["jobs"]);
        Ok(job)
    }

    pub async fn application(&self, id: i32) -> ClientResult<Application> {
        self.query(
            query_key!["applications", id],
            &format!("/api/applications/{}", id),
        )
        .await
    }

    pub async fn user_applications(&self, user_id: i32) -> ClientResult<Vec<Application>> {
        self.query(
            query_key!["applications", "user", user_id],
            &format!("/api/applications/user/{}", user_id),
        )
        .await
    }

    pub async fn job_applications(&self, job_id: i32) -> ClientResult<Vec<Application>> {
        self.query(
            query_key!["applications", "job", job_id],
            &format!("/api/applications/job/{}", job_id),
        )
        .await
    }

    fn invalidate_application_lists(&self, application: &Application) {
        self.cache
            .invalidate(&query_key!["applications", "user", application.user_id]);
        self.cache
            .invalidate(&query_key!["applications", "job", application.job_id]);
    }

    pub async fn create_application(
        &self,
        payload: &CreateApplicationPayload,
    ) -> ClientResult<Application> {
        let application: Application = self
            .mutate(Method::POST, "/api/applications", payload)
            .await?;
        self.invalidate_application_lists(&application);
        Ok(application)
    }

    /// A patch that moves the application to another user or job also clears
    /// the lists under the previous owner. Without a cached copy of the row
    /// every per-user and per-job list goes.
    pub async fn update_application(
        &self,
        id: i32,
        payload: &UpdateApplicationPayload,
    ) -> ClientResult<Application> {
        let key = query_key!["applications", id];
        let previous: Option<Application> = self.cached(&key);
        let application: Application = self
            .mutate(Method::PATCH, &format!("/api/applications/{}", id), payload)
            .await?;
        self.cache.invalidate(&key);
        self.invalidate_application_lists(&application);
        if payload.user_id.is_some() || payload.job_id.is_some() {
            match previous {
                Some(previous) => self.invalidate_application_lists(&previous),
                None => {
                    self.cache.invalidate(&query_key!["applications", "user"]);
                    self.cache.invalidate(&query_key!["applications", "job"]);
                }
            }
        }
        Ok(application)
    }

    pub async fn candidate(&self, id: i32) -> ClientResult<Candidate> {
        self.query(
            query_key!["candidates", id],
            &format!("/api/candidates/{}", id),
        )
        .await
    }

    pub async fn candidate_for_user(&self, user_id: i32) -> ClientResult<Candidate> {
        self.query(
            query_key!["candidates", "user", user_id],
            &format!("/api/users/{}/candidate", user_id),
        )
        .await
    }

    pub async fn update_candidate(
        &self,
        id: i32,
        payload: &UpdateCandidatePayload,
    ) -> ClientResult<Candidate> {
        let key = query_key!["candidates", id];
        let previous: Option<Candidate> = self.cached(&key);
        let candidate: Candidate = self
            .mutate(Method::PATCH, &format!("/api/candidates/{}", id), payload)
            .await?;
        self.cache.invalidate(&key);
        self.cache
            .invalidate(&query_key!["candidates", "user", candidate.user_id]);
        if payload.user_id.is_some() {
            match previous {
                Some(previous) => {
                    self.cache
                        .invalidate(&query_key!["candidates", "user", previous.user_id]);
                }
                None => {
                    self.cache.invalidate(&query_key!["candidates", "user"]);
                }
            }
        }
        Ok(candidate)
    }

    pub async fn interview(&self, id: i32) -> ClientResult<Interview> {
        self.query(
            query_key!["interviews", id],
            &format!("/api/interviews/{}", id),
        )
        .await
    }

    pub async fn application_interviews(
        &self,
        application_id: i32,
    ) -> ClientResult<Vec<Interview>> {
        self.query(
            query_key!["interviews", "application", application_id],
            &format!("/api/interviews/application/{}", application_id),
        )
        .await
    }

    pub async fn create_interview(
        &self,
        payload: &CreateInterviewPayload,
    ) -> ClientResult<Interview> {
        let interview: Interview = self
            .mutate(Method::POST, "/api/interviews", payload)
            .await?;
        self.cache.invalidate(&query_key![
            "interviews",
            "application",
            interview.application_id
        ]);
        self.cache.invalidate(&query_key!["interviews", interview.id]);
        Ok(interview)
    }

    pub async fn update_interview(
        &self,
        id: i32,
        payload: &UpdateInterviewPayload,
    ) -> ClientResult<Interview> {
        let key = query_key!["interviews", id];
        let previous: Option<Interview> = self.cached(&key);
        let interview: Interview = self
            .mutate(Method::PATCH, &format!("/api/interviews/{}", id), payload)
            .await?;
        self.cache.invalidate(&key);
        self.cache.invalidate(&query_key![
            "interviews",
            "application",
            interview.application_id
        ]);
        if payload.application_id.is_some() {
            match previous {
                Some(previous) => {
                    self.cache.invalidate(&query_key![
                        "interviews",
                        "application",
                        previous.application_id
                    ]);
                }
                None => {
                    self.cache
                        .invalidate(&query_key!["interviews", "application"]);
                }
            }
        }
        Ok(interview)
    }
}
