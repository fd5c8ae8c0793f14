use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    dto::{
        application_dto::{CreateApplicationPayload, UpdateApplicationPayload},
        response_dto::{created, ok},
    },
    error::{Error, Result},
    utils::validation::{parse_id, ValidatedJson},
    AppState,
};

fn application_not_found() -> Error {
    Error::NotFound("Application not found".to_string())
}

#[utoipa::path(
    get,
    path = "/api/applications",
    responses((
        status = 200,
        description = "All applications, newest first",
        body = [crate::models::application::Application]
    ))
)]
#[axum::debug_handler]
pub async fn list_applications(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(ok(state.storage.get_all_applications().await?))
}

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = CreateApplicationPayload,
    responses(
        (
            status = 201,
            description = "Application submitted",
            body = crate::models::application::Application
        ),
        (status = 400, description = "Invalid payload, unknown reference or duplicate application")
    )
)]
#[axum::debug_handler]
pub async fn create_application(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.submit(payload).await?;
    Ok(created(application))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (
            status = 200,
            description = "Application found",
            body = crate::models::application::Application
        ),
        (status = 400, description = "Invalid application ID"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "application")?;
    let application = state
        .storage
        .get_application(id)
        .await?
        .ok_or_else(application_not_found)?;
    Ok(ok(application))
}

#[utoipa::path(
    patch,
    path = "/api/applications/{id}",
    params(("id" = i32, Path, description = "Application ID")),
    request_body = UpdateApplicationPayload,
    responses(
        (
            status = 200,
            description = "Application updated",
            body = crate::models::application::Application
        ),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "application")?;
    if state.storage.get_application(id).await?.is_none() {
        return Err(application_not_found());
    }
    let application = state
        .storage
        .update_application(id, payload)
        .await?
        .ok_or_else(application_not_found)?;
    tracing::info!(application_id = id, status = ?application.status, "application updated");
    Ok(ok(application))
}

#[utoipa::path(
    get,
    path = "/api/applications/user/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (
            status = 200,
            description = "Applications filed by the user",
            body = [crate::models::application::Application]
        ),
        (status = 400, description = "Invalid user ID")
    )
)]
#[axum::debug_handler]
pub async fn list_user_applications(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let user_id = parse_id(&id, "user")?;
    Ok(ok(state.storage.get_user_applications(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/applications/job/{id}",
    params(("id" = i32, Path, description = "Job ID")),
    responses(
        (
            status = 200,
            description = "Applications for the job",
            body = [crate::models::application::Application]
        ),
        (status = 400, description = "Invalid job ID")
    )
)]
#[axum::debug_handler]
pub async fn list_job_applications(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let job_id = parse_id(&id, "job")?;
    Ok(ok(state.storage.get_job_applications(job_id).await?))
}
