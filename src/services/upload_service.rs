use std::path::{Path, PathBuf};

use bytes::Bytes;
use uuid::Uuid;

use crate::dto::upload_dto::FileMetadata;
use crate::error::{Error, Result};
use crate::utils::time::now;

pub const RESUME_FIELD: &str = "resume";
pub const DOCUMENTS_FIELD: &str = "documents";
pub const MAX_DOCUMENTS: usize = 5;

const ALLOWED_MIME_TYPES: [&str; 8] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/png",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
];

const INVALID_TYPE_MESSAGE: &str =
    "Invalid file type. Only PDF, DOC, DOCX, JPG, PNG, XLS, XLSX, and TXT files are allowed.";

/// One file part read out of a multipart body.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub original_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Writes accepted uploads into a single flat directory.
#[derive(Clone)]
pub struct UploadService {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    fn check(&self, file: &IncomingFile) -> Result<()> {
        if !ALLOWED_MIME_TYPES.contains(&file.content_type.as_str()) {
            return Err(Error::BadRequest(INVALID_TYPE_MESSAGE.to_string()));
        }
        if file.data.len() > self.max_bytes {
            return Err(Error::BadRequest(
                "File upload error: File too large".to_string(),
            ));
        }
        Ok(())
    }

    async fn store(&self, file: IncomingFile, document_type: String) -> Result<FileMetadata> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let filename = format!("{}{}", Uuid::new_v4(), extension_of(&file.original_name));
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, &file.data).await?;
        tracing::info!(%filename, size = file.data.len(), "file stored");

        Ok(FileMetadata {
            original_name: file.original_name,
            filename,
            path: path.to_string_lossy().into_owned(),
            size: file.data.len() as u64,
            mimetype: file.content_type,
            document_type,
            upload_date: now(),
        })
    }

    pub async fn save_resume(&self, file: Option<IncomingFile>) -> Result<FileMetadata> {
        let file = file.ok_or_else(|| Error::BadRequest("No resume file uploaded".to_string()))?;
        self.check(&file)?;
        self.store(file, "resume".to_string()).await
    }

    /// Every file is checked before any is written, so a rejected batch
    /// leaves nothing behind.
    pub async fn save_documents(&self, files: Vec<IncomingFile>) -> Result<Vec<FileMetadata>> {
        if files.is_empty() {
            return Err(Error::BadRequest("No documents uploaded".to_string()));
        }
        if files.len() > MAX_DOCUMENTS {
            return Err(Error::BadRequest(
                "File upload error: Too many files".to_string(),
            ));
        }
        for file in &files {
            self.check(file)?;
        }

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            let kind = document_type(&file.original_name).to_string();
            stored.push(self.store(file, kind).await?);
        }
        Ok(stored)
    }

    pub async fn delete(&self, filename: &str) -> Result<()> {
        if !is_plain_filename(filename) {
            return Err(Error::BadRequest("Invalid filename".to_string()));
        }
        let path = self.dir.join(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(%filename, "file deleted");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound("File not found".to_string()))
            }
            Err(err) => Err(Error::Io(err)),
        }
    }
}

fn is_plain_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains('/') && !name.contains('\\')
}

/// Extension including the dot, or empty.
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

pub fn document_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "pdf",
        "doc" | "docx" => "word",
        "jpg" | "jpeg" | "png" => "image",
        "xls" | "xlsx" => "spreadsheet",
        "txt" => "text",
        _ => "other",
    }
}
