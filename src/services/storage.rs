//! Storage access layer: one async operation per entity and verb.
//!
//! Lookups return `Ok(None)` when the row is absent. Updates merge only the
//! fields present in the patch and always stamp a newer `updated_at`. Lists
//! are newest-created first unless stated otherwise.

use async_trait::async_trait;

use crate::dto::{
    application_dto::{CreateApplicationPayload, UpdateApplicationPayload},
    candidate_dto::{CreateCandidatePayload, UpdateCandidatePayload},
    interview_dto::{CreateInterviewPayload, UpdateInterviewPayload},
    job_dto::{CreateJobPayload, JobSearch, UpdateJobPayload},
};
use crate::error::Result;
use crate::models::{
    application::Application,
    candidate::Candidate,
    interview::Interview,
    job::Job,
    user::{NewUser, User, UserChanges},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user(&self, id: i32) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get_all_users(&self) -> Result<Vec<User>>;
    async fn create_user(&self, user: NewUser) -> Result<User>;
    /// Inserts the user and, when `with_candidate` is set, an empty candidate
    /// profile in the same transaction.
    async fn register_user(&self, user: NewUser, with_candidate: bool) -> Result<User>;
    async fn update_user(&self, id: i32, changes: UserChanges) -> Result<Option<User>>;
    /// Cascades to the user's candidate profile and applications. Returns
    /// `false` when no row matched.
    async fn delete_user(&self, id: i32) -> Result<bool>;

    async fn get_candidate(&self, id: i32) -> Result<Option<Candidate>>;
    async fn get_candidate_by_user_id(&self, user_id: i32) -> Result<Option<Candidate>>;
    async fn create_candidate(&self, payload: CreateCandidatePayload) -> Result<Candidate>;
    async fn update_candidate(
        &self,
        id: i32,
        payload: UpdateCandidatePayload,
    ) -> Result<Option<Candidate>>;

    async fn get_job(&self, id: i32) -> Result<Option<Job>>;
    async fn get_all_jobs(&self) -> Result<Vec<Job>>;
    async fn get_active_jobs(&self) -> Result<Vec<Job>>;
    /// Active jobs only, filtered by case-sensitive substring and exact enums.
    async fn search_jobs(&self, search: JobSearch) -> Result<Vec<Job>>;
    async fn create_job(&self, payload: CreateJobPayload) -> Result<Job>;
    async fn update_job(&self, id: i32, payload: UpdateJobPayload) -> Result<Option<Job>>;

    async fn get_application(&self, id: i32) -> Result<Option<Application>>;
    async fn get_all_applications(&self) -> Result<Vec<Application>>;
    async fn get_user_applications(&self, user_id: i32) -> Result<Vec<Application>>;
    async fn get_job_applications(&self, job_id: i32) -> Result<Vec<Application>>;
    async fn find_application(
        &self,
        candidate_id: i32,
        job_id: i32,
    ) -> Result<Option<Application>>;
    async fn create_application(&self, payload: CreateApplicationPayload) -> Result<Application>;
    async fn update_application(
        &self,
        id: i32,
        payload: UpdateApplicationPayload,
    ) -> Result<Option<Application>>;

    async fn get_interview(&self, id: i32) -> Result<Option<Interview>>;
    /// Ordered by `scheduled_for` ascending.
    async fn get_application_interviews(&self, application_id: i32) -> Result<Vec<Interview>>;
    async fn create_interview(&self, payload: CreateInterviewPayload) -> Result<Interview>;
    async fn update_interview(
        &self,
        id: i32,
        payload: UpdateInterviewPayload,
    ) -> Result<Option<Interview>>;
}
