use crate::attachments::AttachmentInput;
use crate::tools::{
    ToolContext, attachment_lines, check_attachments, error_result, join_lines, parse_args,
    text_result,
};
use crate::xero::AttachmentEndpoint;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddArgs {
    entity_type: String,
    entity_id: String,
    attachments: Vec<AttachmentInput>,
}

/// Attaches files to a record that already exists in Xero.
pub async fn add(ctx: &ToolContext, args: &Value) -> Value {
    let args: AddArgs = match parse_args(args) {
        Ok(args) => args,
        Err(result) => return result,
    };
    let Some(endpoint) = AttachmentEndpoint::parse(&args.entity_type) else {
        return error_result(
            "parsing arguments",
            format!("unsupported entityType: {}", args.entity_type),
        );
    };
    let entity_id = args.entity_id.trim();
    if entity_id.is_empty() {
        return error_result("parsing arguments", "entityId must not be empty");
    }
    if args.attachments.is_empty() {
        return error_result("parsing arguments", "at least one attachment is required");
    }
    if let Err(result) = check_attachments(&args.attachments) {
        return result;
    }

    let results = ctx.attach(endpoint, Some(entity_id), &args.attachments).await;
    let uploaded = results.iter().filter(|result| result.is_success()).count();
    let heading = format!(
        "Uploaded {uploaded} of {} attachments to {} {entity_id}.",
        results.len(),
        args.entity_type
    );
    text_result(join_lines([Some(heading), attachment_lines(&results)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::result_text;
    use crate::xero::fake::FakeXero;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn uploads_to_existing_record() {
        let fake = Arc::new(FakeXero::default().fail_attachment("two.txt"));
        let ctx = ToolContext::new(fake.clone());
        let result = add(
            &ctx,
            &json!({
                "entityType": "manual-journal",
                "entityId": "mj-5",
                "attachments": [
                    { "fileName": "one.txt", "base64Content": "b25l" },
                    { "fileName": "two.txt", "base64Content": "dHdv" }
                ]
            }),
        )
        .await;

        assert_eq!(
            result_text(&result),
            "Uploaded 1 of 2 attachments to manual-journal mj-5.\nAttachments:\n\
             - one.txt: uploaded\n- two.txt: failed (Attachment two.txt was rejected)"
        );
        assert_eq!(
            fake.uploads(),
            vec![(
                AttachmentEndpoint::ManualJournals,
                "mj-5".to_string(),
                "one.txt".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn unknown_entity_type_is_rejected() {
        let fake = Arc::new(FakeXero::default());
        let ctx = ToolContext::new(fake.clone());
        let result = add(
            &ctx,
            &json!({
                "entityType": "quote",
                "entityId": "q-1",
                "attachments": [{ "fileName": "a.txt", "base64Content": "YQ==" }]
            }),
        )
        .await;
        assert_eq!(
            result_text(&result),
            "Error parsing arguments: unsupported entityType: quote"
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_attachment_list_is_rejected() {
        let ctx = ToolContext::new(Arc::new(FakeXero::default()));
        let result = add(
            &ctx,
            &json!({ "entityType": "invoice", "entityId": "inv-1", "attachments": [] }),
        )
        .await;
        assert_eq!(
            result_text(&result),
            "Error parsing arguments: at least one attachment is required"
        );
    }

    #[tokio::test]
    async fn blank_entity_id_is_rejected() {
        let ctx = ToolContext::new(Arc::new(FakeXero::default()));
        let result = add(
            &ctx,
            &json!({
                "entityType": "contact",
                "entityId": " ",
                "attachments": [{ "fileName": "a.txt", "base64Content": "YQ==" }]
            }),
        )
        .await;
        assert_eq!(
            result_text(&result),
            "Error parsing arguments: entityId must not be empty"
        );
    }
}
