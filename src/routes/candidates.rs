use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    dto::{
        candidate_dto::{CreateCandidatePayload, UpdateCandidatePayload},
        response_dto::{created, ok},
    },
    error::{Error, Result},
    utils::validation::{parse_id, ValidatedJson},
    AppState,
};

fn candidate_not_found() -> Error {
    Error::NotFound("Candidate not found".to_string())
}

#[utoipa::path(
    post,
    path = "/api/candidates",
    request_body = CreateCandidatePayload,
    responses(
        (
            status = 201,
            description = "Candidate profile created",
            body = crate::models::candidate::Candidate
        ),
        (status = 400, description = "Invalid payload or unknown user")
    )
)]
#[axum::debug_handler]
pub async fn create_candidate(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCandidatePayload>,
) -> Result<impl IntoResponse> {
    let candidate = state.storage.create_candidate(payload).await?;
    Ok(created(candidate))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    params(("id" = i32, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "Candidate found", body = crate::models::candidate::Candidate),
        (status = 400, description = "Invalid candidate ID"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "candidate")?;
    let candidate = state
        .storage
        .get_candidate(id)
        .await?
        .ok_or_else(candidate_not_found)?;
    Ok(ok(candidate))
}

#[utoipa::path(
    patch,
    path = "/api/candidates/{id}",
    params(("id" = i32, Path, description = "Candidate ID")),
    request_body = UpdateCandidatePayload,
    responses(
        (
            status = 200,
            description = "Candidate updated",
            body = crate::models::candidate::Candidate
        ),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCandidatePayload>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "candidate")?;
    if state.storage.get_candidate(id).await?.is_none() {
        return Err(candidate_not_found());
    }
    let candidate = state
        .storage
        .update_candidate(id, payload)
        .await?
        .ok_or_else(candidate_not_found)?;
    Ok(ok(candidate))
}
