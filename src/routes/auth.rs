use axum::{extract::State, response::IntoResponse};

use crate::{
    dto::{
        response_dto::{created, ok},
        user_dto::{LoginPayload, RegisterPayload, UserResponse},
    },
    error::Result,
    utils::validation::ValidatedJson,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid payload or duplicate username/email")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.register(payload).await?;
    Ok(created(UserResponse::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Credentials accepted", body = UserResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid username or password")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginPayload>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.login(payload).await?;
    Ok(ok(UserResponse::from(user)))
}
