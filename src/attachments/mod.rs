//! Attachment ingestion and upload.
//!
//! Inputs arrive either as a local path or as inline base64 content. They are
//! normalized into [`ProcessedAttachment`]s (fail-fast for the whole batch) and
//! then uploaded one at a time, each upload isolated from its siblings.

use crate::mcp::errors;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod loader;
pub mod mime;
pub mod normalize;
pub mod upload;

pub use normalize::normalize;
pub use upload::{AttachmentTarget, process_and_upload, upload_raw};

/// Caller-supplied attachment, by path or by inline content.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInput {
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_path: Option<String>,
    pub base64_content: Option<String>,
}

impl AttachmentInput {
    #[cfg(test)]
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            file_path: Some(path.into()),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn from_base64(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            base64_content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Boundary check for the wire shape, run before any remote call.
    pub fn validate(&self) -> Result<(), AttachmentError> {
        match (
            non_empty(self.file_path.as_deref()),
            non_empty(self.base64_content.as_deref()),
        ) {
            (None, None) => Err(AttachmentError::MissingSource),
            (Some(_), Some(_)) => Err(AttachmentError::AmbiguousSource),
            (None, Some(_)) if non_empty(self.file_name.as_deref()).is_none() => {
                Err(AttachmentError::MissingFileName)
            }
            _ => Ok(()),
        }
    }
}

/// Already-normalized attachment accepted as-is by the raw upload path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttachment {
    pub file_name: String,
    pub base64_content: String,
    pub mime_type: Option<String>,
}

impl RawAttachment {
    pub fn validate(&self) -> Result<(), AttachmentError> {
        if non_empty(Some(self.base64_content.as_str())).is_none() {
            return Err(AttachmentError::MissingSource);
        }
        if non_empty(Some(self.file_name.as_str())).is_none() {
            return Err(AttachmentError::MissingFileName);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub base64_content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Success,
    Failed,
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Success => f.write_str("success"),
            UploadStatus::Failed => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentUploadResult {
    pub file_name: String,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AttachmentUploadResult {
    pub fn success(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            status: UploadStatus::Success,
            error: None,
        }
    }

    pub fn failed(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            status: UploadStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == UploadStatus::Success
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("File not found: {path}")]
    NotFound { path: String },
    #[error("Path is not a file: {path}")]
    NotAFile { path: String },
    #[error("File too large: {path} is {size} bytes (max {max} bytes)")]
    TooLarge { path: String, size: u64, max: u64 },
    #[error("Permission denied reading file: {path}")]
    PermissionDenied { path: String },
    #[error("Failed to read file {path}: {reason}")]
    ReadFailed { path: String, reason: String },
    #[error("fileName is required when base64Content is provided")]
    MissingFileName,
    #[error("either filePath or base64Content is required")]
    MissingSource,
    #[error("filePath and base64Content cannot both be set")]
    AmbiguousSource,
    #[error("invalid base64 content for {file_name}: {reason}")]
    InvalidBase64 { file_name: String, reason: String },
    #[error("Failed to process attachment: {0}")]
    Batch(Box<AttachmentError>),
}

impl AttachmentError {
    pub fn kind(&self) -> &'static str {
        match self {
            AttachmentError::NotFound { .. } => errors::NOT_FOUND,
            AttachmentError::NotAFile { .. } => errors::NOT_A_FILE,
            AttachmentError::TooLarge { .. } => errors::TOO_LARGE,
            AttachmentError::PermissionDenied { .. } => errors::PERMISSION_DENIED,
            AttachmentError::ReadFailed { .. } => errors::READ_FAILED,
            AttachmentError::MissingFileName => errors::MISSING_FILE_NAME,
            AttachmentError::MissingSource => errors::MISSING_SOURCE,
            AttachmentError::AmbiguousSource | AttachmentError::InvalidBase64 { .. } => {
                errors::INVALID_INPUT
            }
            AttachmentError::Batch(inner) => inner.kind(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
