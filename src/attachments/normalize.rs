use crate::attachments::{AttachmentError, AttachmentInput, ProcessedAttachment, loader, mime};

/// Turns caller inputs into upload-ready attachments, in input order.
///
/// The first failing item aborts the whole batch; the error is wrapped in
/// [`AttachmentError::Batch`]. Uploads have the opposite policy, see
/// [`crate::attachments::upload::upload_all`].
pub async fn normalize(
    inputs: &[AttachmentInput],
) -> Result<Vec<ProcessedAttachment>, AttachmentError> {
    let mut processed = Vec::with_capacity(inputs.len());
    for input in inputs {
        let attachment = normalize_one(input)
            .await
            .map_err(|err| AttachmentError::Batch(Box::new(err)))?;
        processed.push(attachment);
    }
    Ok(processed)
}

async fn normalize_one(input: &AttachmentInput) -> Result<ProcessedAttachment, AttachmentError> {
    let file_name = provided(&input.file_name);
    let mime_type = provided(&input.mime_type);

    if let Some(path) = provided(&input.file_path) {
        let loaded = loader::load(path).await?;
        tracing::debug!(path, bytes = loaded.bytes_len, "attachment loaded from disk");
        return Ok(ProcessedAttachment {
            file_name: file_name.map(str::to_string).unwrap_or(loaded.file_name),
            mime_type: mime_type.map(str::to_string).unwrap_or(loaded.mime_type),
            base64_content: loaded.base64_content,
        });
    }

    let Some(content) = provided(&input.base64_content) else {
        return Err(AttachmentError::MissingSource);
    };
    let Some(file_name) = file_name else {
        return Err(AttachmentError::MissingFileName);
    };
    Ok(ProcessedAttachment {
        file_name: file_name.to_string(),
        mime_type: mime_type
            .map(str::to_string)
            .unwrap_or_else(|| mime::detect(file_name)),
        base64_content: content.to_string(),
    })
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}
