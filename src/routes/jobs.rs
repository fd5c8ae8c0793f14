use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    dto::{
        job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload},
        response_dto::{created, ok},
    },
    error::{Error, Result},
    utils::validation::{parse_id, ValidatedJson},
    AppState,
};

fn job_not_found() -> Error {
    Error::NotFound("Job not found".to_string())
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(JobListQuery),
    responses(
        (status = 200, description = "Jobs, newest first", body = [crate::models::job::Job]),
        (status = 400, description = "Unknown department or job type")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let jobs = if let Some(search) = query.search()? {
        state.storage.search_jobs(search).await?
    } else if query.active_only() {
        state.storage.get_active_jobs().await?
    } else {
        state.storage.get_all_jobs().await?
    };
    Ok(ok(jobs))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = crate::models::job::Job),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    let job = state.storage.create_job(payload).await?;
    tracing::info!(job_id = job.id, department = %job.department, "job posted");
    Ok(created(job))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = i32, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job found", body = crate::models::job::Job),
        (status = 400, description = "Invalid job ID"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "job")?;
    let job = state.storage.get_job(id).await?.ok_or_else(job_not_found)?;
    Ok(ok(job))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    params(("id" = i32, Path, description = "Job ID")),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = crate::models::job::Job),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "job")?;
    if state.storage.get_job(id).await?.is_none() {
        return Err(job_not_found());
    }
    let job = state
        .storage
        .update_job(id, payload)
        .await?
        .ok_or_else(job_not_found)?;
    Ok(ok(job))
}
