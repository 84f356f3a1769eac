use crate::attachments::{
    AttachmentInput, AttachmentUploadResult, ProcessedAttachment, RawAttachment, mime, normalize,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Remote side of an upload: one call per attachment.
#[async_trait]
pub trait AttachmentTarget: Send + Sync {
    async fn upload(
        &self,
        resource_id: &str,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<()>;
}

/// Uploads every attachment in order and reports one outcome per item.
///
/// A failing item is recorded and the loop moves on; nothing here aborts.
pub async fn upload_all<T>(
    target: &T,
    resource_id: &str,
    attachments: &[ProcessedAttachment],
) -> Vec<AttachmentUploadResult>
where
    T: AttachmentTarget + ?Sized,
{
    let mut results = Vec::with_capacity(attachments.len());
    for attachment in attachments {
        let outcome = match STANDARD.decode(attachment.base64_content.as_bytes()) {
            Ok(bytes) => target
                .upload(
                    resource_id,
                    &attachment.file_name,
                    &attachment.mime_type,
                    bytes,
                )
                .await
                .map_err(|err| err.to_string()),
            Err(err) => Err(format!("invalid base64 content: {err}")),
        };
        match outcome {
            Ok(()) => {
                tracing::debug!(resource_id, file_name = %attachment.file_name, "attachment uploaded");
                results.push(AttachmentUploadResult::success(&attachment.file_name));
            }
            Err(message) => {
                tracing::warn!(
                    resource_id,
                    file_name = %attachment.file_name,
                    error = %message,
                    "attachment upload failed"
                );
                results.push(AttachmentUploadResult::failed(
                    &attachment.file_name,
                    message,
                ));
            }
        }
    }
    results
}

/// Normalizes then uploads. A normalization failure becomes a single
/// `unknown` failed entry; the owning resource is left untouched.
pub async fn process_and_upload<T>(
    target: &T,
    resource_id: &str,
    inputs: &[AttachmentInput],
) -> Vec<AttachmentUploadResult>
where
    T: AttachmentTarget + ?Sized,
{
    if resource_id.is_empty() || inputs.is_empty() {
        return Vec::new();
    }
    match normalize(inputs).await {
        Ok(processed) => upload_all(target, resource_id, &processed).await,
        Err(err) => {
            tracing::warn!(resource_id, error = %err, "attachment batch rejected");
            vec![AttachmentUploadResult::failed("unknown", err.to_string())]
        }
    }
}

/// Uploads caller-normalized attachments without going through [`normalize`].
pub async fn upload_raw<T>(
    target: &T,
    resource_id: &str,
    raw: &[RawAttachment],
) -> Vec<AttachmentUploadResult>
where
    T: AttachmentTarget + ?Sized,
{
    if resource_id.is_empty() || raw.is_empty() {
        return Vec::new();
    }
    let mut results = Vec::with_capacity(raw.len());
    for item in raw {
        if let Err(err) = item.validate() {
            let file_name = Some(item.file_name.trim())
                .filter(|name| !name.is_empty())
                .unwrap_or("unknown");
            tracing::warn!(resource_id, error = %err, "raw attachment rejected");
            results.push(AttachmentUploadResult::failed(file_name, err.to_string()));
            continue;
        }
        let processed = ProcessedAttachment {
            file_name: item.file_name.clone(),
            mime_type: item
                .mime_type
                .clone()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| mime::detect(&item.file_name)),
            base64_content: item.base64_content.clone(),
        };
        results.extend(upload_all(target, resource_id, std::slice::from_ref(&processed)).await);
    }
    results
}
