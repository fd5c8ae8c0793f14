use std::sync::Arc;

use crate::dto::application_dto::CreateApplicationPayload;
use crate::error::{Error, Result};
use crate::models::application::Application;
use crate::services::storage::Storage;

#[derive(Clone)]
pub struct ApplicationService {
    storage: Arc<dyn Storage>,
    allow_duplicates: bool,
}

impl ApplicationService {
    pub fn new(storage: Arc<dyn Storage>, allow_duplicates: bool) -> Self {
        Self {
            storage,
            allow_duplicates,
        }
    }

    /// Submits an application. When resubmission is disabled, a candidate
    /// may hold at most one application per job.
    pub async fn submit(&self, payload: CreateApplicationPayload) -> Result<Application> {
        if !self.allow_duplicates
            && self
                .storage
                .find_application(payload.candidate_id, payload.job_id)
                .await?
                .is_some()
        {
            return Err(Error::BadRequest(
                "Candidate has already applied for this job".to_string(),
            ));
        }
        let application = self.storage.create_application(payload).await?;
        tracing::info!(
            application_id = application.id,
            job_id = application.job_id,
            candidate_id = application.candidate_id,
            "application submitted"
        );
        Ok(application)
    }
}
