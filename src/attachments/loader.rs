use crate::attachments::AttachmentError;
use crate::attachments::mime;
use crate::mcp::contracts::MAX_ATTACHMENT_BYTES;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub base64_content: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes_len: u64,
}

pub async fn load(file_path: &str) -> Result<LoadedFile, AttachmentError> {
    let path = resolve(file_path)?;

    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|err| map_io_error(err, file_path))?;
    if !metadata.is_file() {
        return Err(AttachmentError::NotAFile {
            path: file_path.to_string(),
        });
    }
    let len = metadata.len();
    if len > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge {
            path: file_path.to_string(),
            size: len,
            max: MAX_ATTACHMENT_BYTES,
        });
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|err| map_io_error(err, file_path))?;
    // The file may have grown between the metadata call and the read.
    let bytes_len = bytes.len() as u64;
    if bytes_len > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge {
            path: file_path.to_string(),
            size: bytes_len,
            max: MAX_ATTACHMENT_BYTES,
        });
    }

    let file_name = path
        .file_name()
        .and_then(|value| value.to_str())
        .map(str::to_string)
        .ok_or_else(|| AttachmentError::NotAFile {
            path: file_path.to_string(),
        })?;
    let mime_type = mime::detect(&file_name);

    Ok(LoadedFile {
        base64_content: STANDARD.encode(&bytes),
        file_name,
        mime_type,
        bytes_len,
    })
}

fn resolve(file_path: &str) -> Result<PathBuf, AttachmentError> {
    if file_path.trim().is_empty() {
        return Err(AttachmentError::MissingSource);
    }
    std::path::absolute(Path::new(file_path)).map_err(|err| map_io_error(err, file_path))
}

fn map_io_error(err: io::Error, path: &str) -> AttachmentError {
    let path = path.to_string();
    match err.kind() {
        io::ErrorKind::NotFound => AttachmentError::NotFound { path },
        io::ErrorKind::PermissionDenied => AttachmentError::PermissionDenied { path },
        io::ErrorKind::IsADirectory => AttachmentError::NotAFile { path },
        _ => AttachmentError::ReadFailed {
            path,
            reason: err.kind().to_string(),
        },
    }
}
