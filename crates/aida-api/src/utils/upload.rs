//! Common utilities for the upload handler

use aida_core::AppError;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const FILE_FIELD: &str = "file";
pub const ANALYSIS_TYPE_FIELD: &str = "analysis_type";
const DEFAULT_ANALYSIS_TYPE: &str = "general";

/// One uploaded file, spooled to a temp file for the duration of the request.
///
/// The spool file is removed when this value is dropped, so cleanup runs on
/// every exit path out of the handler.
pub struct SpooledUpload {
    temp: NamedTempFile,
    pub filename: String,
    pub content_type: String,
    pub analysis_type: String,
    pub size: usize,
}

impl SpooledUpload {
    pub fn path(&self) -> &Path {
        self.temp.path()
    }
}

/// Extract the upload from a multipart form and spool it to `spool_dir`
/// (system temp dir when `None`).
///
/// Only one field named "file" is accepted; multiple file fields are rejected.
/// An optional "analysis_type" text field tags the submission; it defaults to
/// "general". Unknown fields are ignored.
pub async fn extract_upload(
    mut multipart: Multipart,
    spool_dir: Option<&Path>,
) -> Result<SpooledUpload, AppError> {
    let mut file: Option<(Vec<u8>, String, String)> = None;
    let mut analysis_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart", e))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            FILE_FIELD => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let filename = field
                    .file_name()
                    .map(|s: &str| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let content_type = field
                    .content_type()
                    .map(|s: &str| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Failed to read file data", e))?;

                file = Some((data.to_vec(), filename, content_type));
            }
            ANALYSIS_TYPE_FIELD => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Failed to read analysis_type", e))?;
                let value = value.trim();
                if !value.is_empty() {
                    analysis_type = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    let (data, filename, content_type) =
        file.ok_or_else(|| AppError::InvalidInput("No file uploaded".to_string()))?;

    let size = data.len();
    let temp = spool(&data, spool_dir)?;

    Ok(SpooledUpload {
        temp,
        filename,
        content_type,
        analysis_type: analysis_type.unwrap_or_else(|| DEFAULT_ANALYSIS_TYPE.to_string()),
        size,
    })
}

/// Classify a multipart read failure. A body that blew the configured size
/// limit surfaces here as a length-limit error (413 per `MultipartError`);
/// everything else is a malformed request.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("upload exceeds the configured size limit".to_string())
    } else {
        AppError::InvalidInput(format!("{}: {}", context, err))
    }
}

fn spool(data: &[u8], dir: Option<&Path>) -> Result<NamedTempFile, AppError> {
    let mut temp = match dir {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(|e| AppError::Internal(format!("Failed to create spool file: {}", e)))?;

    temp.write_all(data)
        .map_err(|e| AppError::Internal(format!("Failed to write spool file: {}", e)))?;

    Ok(temp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spool_file_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let temp = spool(b"a,b,c\n1,2,3\n", Some(dir.path())).unwrap();
            let path = temp.path().to_path_buf();
            assert!(path.exists());
            path
        };
        assert!(!path.exists());
    }

    #[test]
    fn spool_writes_payload_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let temp = spool(b"payload bytes", Some(dir.path())).unwrap();
        let written = std::fs::read(temp.path()).unwrap();
        assert_eq!(written, b"payload bytes");
    }
}
