use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::dto::response_dto::{ApiResponse, FieldError};

pub type Result<T> = std::result::Result<T, Error>;

pub const FOREIGN_KEY_MESSAGE: &str = "Referenced record does not exist or is still in use";
pub const DUPLICATE_MESSAGE: &str = "Record already exists";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_)
            | Error::InvalidBody(_)
            | Error::Conflict(_)
            | Error::Validation(_)
            | Error::Json(_)
            | Error::Multipart(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn validation_items(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut items: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| FieldError {
                field: field.clone(),
                code: err.code.to_string(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, err.code)),
            })
        })
        .collect();
    items.sort_by(|a, b| a.field.cmp(&b.field));
    items
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = match self {
            Error::BadRequest(msg)
            | Error::Conflict(msg)
            | Error::Unauthorized(msg)
            | Error::NotFound(msg) => ApiResponse::failure(msg, None),
            Error::Validation(errors) => {
                ApiResponse::failure("Validation error", Some(validation_items(&errors)))
            }
            Error::InvalidBody(detail) => ApiResponse::failure(
                "Validation error",
                Some(vec![FieldError {
                    field: "body".to_string(),
                    code: "invalid_body".to_string(),
                    message: detail,
                }]),
            ),
            Error::Json(err) => ApiResponse::failure(format!("Invalid JSON: {}", err), None),
            Error::Multipart(err) => {
                ApiResponse::failure(format!("File upload error: {}", err), None)
            }
            other => {
                tracing::error!(error = %other, "request failed");
                ApiResponse::failure("An unexpected error occurred", None)
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        let code = err
            .as_database_error()
            .and_then(|db| db.code().map(|c| c.into_owned()));
        match (err, code.as_deref()) {
            (sqlx::Error::RowNotFound, _) => Error::NotFound("Resource not found".to_string()),
            (_, Some("23505")) => Error::Conflict(DUPLICATE_MESSAGE.to_string()),
            (_, Some("23503")) => Error::BadRequest(FOREIGN_KEY_MESSAGE.to_string()),
            (other, _) => Error::Database(other),
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        Error::Internal(format!("Password hashing failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1))]
        title: String,
    }

    async fn body_of(err: Error) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_are_itemized() {
        let errors = Sample {
            title: String::new(),
        }
        .validate()
        .unwrap_err();
        let (status, body) = body_of(Error::from(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"][0]["field"], "title");
        assert_eq!(body["errors"][0]["code"], "length");
    }

    #[tokio::test]
    async fn internal_errors_are_opaque() {
        let (status, body) = body_of(Error::Internal("db password leaked".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn conflicts_surface_as_bad_request() {
        let (status, body) = body_of(Error::Conflict("Email already exists".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email already exists");
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            Error::from(sqlx::Error::RowNotFound),
            Error::NotFound(_)
        ));
    }
}
