pub mod applications;
pub mod auth;
pub mod candidates;
pub mod chat;
pub mod health;
pub mod interviews;
pub mod jobs;
pub mod upload;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{
    dto::{
        application_dto::{CreateApplicationPayload, UpdateApplicationPayload},
        candidate_dto::{CreateCandidatePayload, UpdateCandidatePayload},
        interview_dto::{CreateInterviewPayload, UpdateInterviewPayload},
        job_dto::{CreateJobPayload, UpdateJobPayload},
        response_dto::FieldError,
        upload_dto::FileMetadata,
        user_dto::{LoginPayload, RegisterPayload, UpdateUserPayload, UserResponse},
    },
    middleware::{
        cors::api_cors,
        rate_limit::{rps_middleware, RateLimiter},
    },
    models::{
        application::{Application, ApplicationStatus},
        candidate::Candidate,
        interview::Interview,
        job::{Department, Job, JobType},
        user::UserRole,
    },
    services::upload_service::MAX_DOCUMENTS,
    AppState,
};

/// Headroom for multipart boundaries and part headers.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Recruitment portal API",
        description = "Users, candidates, jobs, applications, interviews and document uploads."
    ),
    paths(
        health::health,
        auth::register,
        auth::login,
        users::list_users,
        users::get_user,
        users::get_user_by_email,
        users::update_user,
        users::delete_user,
        users::get_user_candidate,
        candidates::create_candidate,
        candidates::get_candidate,
        candidates::update_candidate,
        jobs::list_jobs,
        jobs::create_job,
        jobs::get_job,
        jobs::update_job,
        applications::list_applications,
        applications::create_application,
        applications::get_application,
        applications::update_application,
        applications::list_user_applications,
        applications::list_job_applications,
        interviews::create_interview,
        interviews::get_interview,
        interviews::update_interview,
        interviews::list_application_interviews,
        upload::upload_resume,
        upload::upload_application_documents,
        upload::delete_file,
    ),
    components(schemas(
        UserRole,
        UserResponse,
        RegisterPayload,
        LoginPayload,
        UpdateUserPayload,
        Candidate,
        CreateCandidatePayload,
        UpdateCandidatePayload,
        Department,
        JobType,
        Job,
        CreateJobPayload,
        UpdateJobPayload,
        ApplicationStatus,
        Application,
        CreateApplicationPayload,
        UpdateApplicationPayload,
        Interview,
        CreateInterviewPayload,
        UpdateInterviewPayload,
        FileMetadata,
        FieldError,
    )),
    tags(
        (name = "recruitment", description = "Recruitment portal endpoints")
    )
)]
pub struct ApiDoc;

#[axum::debug_handler]
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

fn api_routes(state: &AppState) -> Router<AppState> {
    let upload_limit = state.config.max_upload_bytes * MAX_DOCUMENTS + MULTIPART_OVERHEAD;

    let uploads = Router::new()
        .route("/api/upload/resume", post(upload::upload_resume))
        .route(
            "/api/upload/application-documents",
            post(upload::upload_application_documents),
        )
        .route("/api/upload/file/:filename", delete(upload::delete_file))
        .layer(DefaultBodyLimit::max(upload_limit));

    Router::new()
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/users/email/:email", get(users::get_user_by_email))
        .route("/api/users/:id/candidate", get(users::get_user_candidate))
        .route("/api/candidates", post(candidates::create_candidate))
        .route(
            "/api/candidates/:id",
            get(candidates::get_candidate).patch(candidates::update_candidate),
        )
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/api/jobs/:id", get(jobs::get_job).patch(jobs::update_job))
        .route(
            "/api/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route(
            "/api/applications/:id",
            get(applications::get_application).patch(applications::update_application),
        )
        .route(
            "/api/applications/user/:id",
            get(applications::list_user_applications),
        )
        .route(
            "/api/applications/job/:id",
            get(applications::list_job_applications),
        )
        .route("/api/interviews", post(interviews::create_interview))
        .route(
            "/api/interviews/:id",
            get(interviews::get_interview).patch(interviews::update_interview),
        )
        .route(
            "/api/interviews/application/:id",
            get(interviews::list_application_interviews),
        )
        .merge(uploads)
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(state.config.api_rps),
            rps_middleware,
        ))
}

/// Full application: `/api`, `/health`, `/ws` and static `/uploads`.
pub fn router(state: AppState) -> Router {
    let uploads_dir = state.config.uploads_dir.clone();
    tracing::info!(dir = %uploads_dir.display(), "serving uploads");

    Router::new()
        .route("/health", get(health::health))
        .route("/ws", get(chat::chat_socket))
        .merge(api_routes(&state))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .with_state(state)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
}
