use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::response_dto::{ok, ApiResponse},
    error::{Error, Result},
    services::upload_service::{IncomingFile, DOCUMENTS_FIELD, RESUME_FIELD},
    AppState,
};

/// Reads every file part of the body. Text parts are skipped; a file under
/// any field other than `expected` is rejected.
async fn collect_files(
    multipart: std::result::Result<Multipart, MultipartRejection>,
    expected: &str,
) -> Result<Vec<IncomingFile>> {
    let mut multipart = multipart.map_err(|rejection| {
        Error::BadRequest(format!("File upload error: {}", rejection.body_text()))
    })?;

    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if field.name() != Some(expected) {
            return Err(Error::BadRequest(
                "File upload error: Unexpected field".to_string(),
            ));
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await?;
        files.push(IncomingFile {
            original_name,
            content_type,
            data,
        });
    }
    Ok(files)
}

#[utoipa::path(
    post,
    path = "/api/upload/resume",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "A single file in field `resume`"
    ),
    responses(
        (status = 200, description = "Resume stored", body = crate::dto::upload_dto::FileMetadata),
        (status = 400, description = "Missing, oversized or disallowed file")
    )
)]
#[axum::debug_handler]
pub async fn upload_resume(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse> {
    let mut files = collect_files(multipart, RESUME_FIELD).await?;
    if files.len() > 1 {
        return Err(Error::BadRequest(
            "File upload error: Unexpected field".to_string(),
        ));
    }
    let metadata = state.upload_service.save_resume(files.pop()).await?;
    Ok(ok(metadata))
}

#[utoipa::path(
    post,
    path = "/api/upload/application-documents",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Up to five files in field `documents`"
    ),
    responses(
        (
            status = 200,
            description = "Documents stored",
            body = [crate::dto::upload_dto::FileMetadata]
        ),
        (status = 400, description = "Missing, oversized, disallowed or too many files")
    )
)]
#[axum::debug_handler]
pub async fn upload_application_documents(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse> {
    let files = collect_files(multipart, DOCUMENTS_FIELD).await?;
    let metadata = state.upload_service.save_documents(files).await?;
    Ok(ok(metadata))
}

#[utoipa::path(
    delete,
    path = "/api/upload/file/{filename}",
    params(("filename" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "File deleted"),
        (status = 400, description = "Invalid filename"),
        (status = 404, description = "File not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse> {
    state.upload_service.delete(&filename).await?;
    Ok(Json(ApiResponse::message("File deleted successfully")))
}
