use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    dto::{
        interview_dto::{CreateInterviewPayload, UpdateInterviewPayload},
        response_dto::{created, ok},
    },
    error::{Error, Result},
    utils::validation::{parse_id, ValidatedJson},
    AppState,
};

fn interview_not_found() -> Error {
    Error::NotFound("Interview not found".to_string())
}

#[utoipa::path(
    post,
    path = "/api/interviews",
    request_body = CreateInterviewPayload,
    responses(
        (
            status = 201,
            description = "Interview scheduled",
            body = crate::models::interview::Interview
        ),
        (status = 400, description = "Invalid payload or unknown application")
    )
)]
#[axum::debug_handler]
pub async fn create_interview(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateInterviewPayload>,
) -> Result<impl IntoResponse> {
    let interview = state.storage.create_interview(payload).await?;
    tracing::info!(
        interview_id = interview.id,
        application_id = interview.application_id,
        "interview scheduled"
    );
    Ok(created(interview))
}

#[utoipa::path(
    get,
    path = "/api/interviews/{id}",
    params(("id" = i32, Path, description = "Interview ID")),
    responses(
        (status = 200, description = "Interview found", body = crate::models::interview::Interview),
        (status = 400, description = "Invalid interview ID"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "interview")?;
    let interview = state
        .storage
        .get_interview(id)
        .await?
        .ok_or_else(interview_not_found)?;
    Ok(ok(interview))
}

#[utoipa::path(
    patch,
    path = "/api/interviews/{id}",
    params(("id" = i32, Path, description = "Interview ID")),
    request_body = UpdateInterviewPayload,
    responses(
        (
            status = 200,
            description = "Interview updated",
            body = crate::models::interview::Interview
        ),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn update_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateInterviewPayload>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "interview")?;
    if state.storage.get_interview(id).await?.is_none() {
        return Err(interview_not_found());
    }
    let interview = state
        .storage
        .update_interview(id, payload)
        .await?
        .ok_or_else(interview_not_found)?;
    Ok(ok(interview))
}

#[utoipa::path(
    get,
    path = "/api/interviews/application/{id}",
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (
            status = 200,
            description = "Interviews ordered by schedule",
            body = [crate::models::interview::Interview]
        ),
        (status = 400, description = "Invalid application ID")
    )
)]
#[axum::debug_handler]
pub async fn list_application_interviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let application_id = parse_id(&id, "application")?;
    Ok(ok(state
        .storage
        .get_application_interviews(application_id)
        .await?))
}
