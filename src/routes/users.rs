use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        response_dto::{ok, ApiResponse},
        user_dto::{UpdateUserPayload, UserResponse},
    },
    error::{Error, Result},
    utils::validation::{parse_id, ValidatedJson},
    AppState,
};

fn user_not_found() -> Error {
    Error::NotFound("User not found".to_string())
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users, newest first", body = [UserResponse]))
)]
#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = state.storage.get_all_users().await?;
    Ok(ok(users
        .into_iter()
        .map(UserResponse::from)
        .collect::<Vec<_>>()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "user")?;
    let user = state.storage.get_user(id).await?.ok_or_else(user_not_found)?;
    Ok(ok(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/email/{email}",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse> {
    let user = state
        .storage
        .get_user_by_email(&email)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(ok(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserPayload>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "user")?;
    let user = state.user_service.update(id, payload).await?;
    Ok(ok(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User and dependent records deleted"),
        (status = 400, description = "User is still referenced by jobs or interviews"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "user")?;
    state.user_service.delete(id).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/candidate",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (
            status = 200,
            description = "Candidate profile of the user",
            body = crate::models::candidate::Candidate
        ),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_user_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "user")?;
    let candidate = state
        .storage
        .get_candidate_by_user_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;
    Ok(ok(candidate))
}
