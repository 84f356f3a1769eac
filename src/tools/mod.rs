use crate::attachments::{
    AttachmentInput, AttachmentUploadResult, RawAttachment, process_and_upload, upload_raw,
};
use crate::handlers::AttachmentUploader;
use crate::mcp::contracts;
use crate::xero::models::LineItem;
use crate::xero::{AttachmentEndpoint, DeepLinkKind, XeroApi, deep_link};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt::Display;
use std::sync::Arc;

pub mod accounts;
pub mod attachments;
pub mod bank_transactions;
pub mod contacts;
pub mod credit_notes;
pub mod invoices;
pub mod manual_journals;

/// Everything a tool call needs; cloned cheaply per invocation.
#[derive(Clone)]
pub struct ToolContext {
    api: Arc<dyn XeroApi>,
}

impl ToolContext {
    pub fn new(api: Arc<dyn XeroApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &dyn XeroApi {
        self.api.as_ref()
    }

    /// Normalizes and uploads `inputs` onto an already-saved record.
    pub async fn attach(
        &self,
        endpoint: AttachmentEndpoint,
        resource_id: Option<&str>,
        inputs: &[AttachmentInput],
    ) -> Vec<AttachmentUploadResult> {
        let uploader = AttachmentUploader::new(self.api(), endpoint);
        process_and_upload(&uploader, resource_id.unwrap_or_default(), inputs).await
    }

    /// Uploads caller-normalized attachments onto an already-saved record.
    pub async fn attach_raw(
        &self,
        endpoint: AttachmentEndpoint,
        resource_id: Option<&str>,
        raw: &[RawAttachment],
    ) -> Vec<AttachmentUploadResult> {
        let uploader = AttachmentUploader::new(self.api(), endpoint);
        upload_raw(&uploader, resource_id.unwrap_or_default(), raw).await
    }

    pub async fn link(&self, kind: DeepLinkKind, resource_id: Option<&str>) -> Option<String> {
        let resource_id = resource_id.filter(|id| !id.is_empty())?;
        let short_code = self.api.short_code().await;
        Some(format!(
            "Link to view: {}",
            deep_link(kind, resource_id, short_code.as_deref())
        ))
    }
}

pub async fn call(ctx: &ToolContext, name: &str, args: &Value) -> Value {
    tracing::debug!(tool = name, "tool call");
    match name {
        contracts::TOOL_CREATE_INVOICE => invoices::create(ctx, args).await,
        contracts::TOOL_UPDATE_INVOICE => invoices::update(ctx, args).await,
        contracts::TOOL_LIST_INVOICES => invoices::list(ctx, args).await,
        contracts::TOOL_CREATE_CREDIT_NOTE => credit_notes::create(ctx, args).await,
        contracts::TOOL_UPDATE_CREDIT_NOTE => credit_notes::update(ctx, args).await,
        contracts::TOOL_LIST_CREDIT_NOTES => credit_notes::list(ctx, args).await,
        contracts::TOOL_CREATE_BANK_TRANSACTION => bank_transactions::create(ctx, args).await,
        contracts::TOOL_UPDATE_BANK_TRANSACTION => bank_transactions::update(ctx, args).await,
        contracts::TOOL_LIST_BANK_TRANSACTIONS => bank_transactions::list(ctx, args).await,
        contracts::TOOL_CREATE_MANUAL_JOURNAL => manual_journals::create(ctx, args).await,
        contracts::TOOL_UPDATE_MANUAL_JOURNAL => manual_journals::update(ctx, args).await,
        contracts::TOOL_LIST_MANUAL_JOURNALS => manual_journals::list(ctx, args).await,
        contracts::TOOL_LIST_ACCOUNTS => accounts::list(ctx, args).await,
        contracts::TOOL_CREATE_CONTACT => contacts::create(ctx, args).await,
        contracts::TOOL_UPDATE_CONTACT => contacts::update(ctx, args).await,
        contracts::TOOL_LIST_CONTACTS => contacts::list(ctx, args).await,
        contracts::TOOL_ADD_ATTACHMENT => attachments::add(ctx, args).await,
        _ => text_result(format!("Error: unknown tool: {name}")),
    }
}

pub fn text_result(text: impl Into<String>) -> Value {
    json!({
        "content": [{"type": "text", "text": text.into()}]
    })
}

pub fn error_result(action: &str, message: impl Display) -> Value {
    text_result(format!("Error {action}: {message}"))
}

/// Deserializes tool arguments, treating a missing/null payload as `{}`.
pub fn parse_args<T: DeserializeOwned>(args: &Value) -> Result<T, Value> {
    let args = if args.is_null() {
        json!({})
    } else {
        args.clone()
    };
    serde_json::from_value(args).map_err(|err| error_result("parsing arguments", err))
}

/// Rejects malformed attachment inputs before anything is written to Xero.
pub fn check_attachments(inputs: &[AttachmentInput]) -> Result<(), Value> {
    for (index, input) in inputs.iter().enumerate() {
        if let Err(err) = input.validate() {
            return Err(error_result(
                "parsing arguments",
                format!("attachments[{index}]: {err}"),
            ));
        }
    }
    Ok(())
}

pub fn check_raw_attachments(raw: &[RawAttachment]) -> Result<(), Value> {
    for (index, item) in raw.iter().enumerate() {
        if let Err(err) = item.validate() {
            return Err(error_result(
                "parsing arguments",
                format!("attachments[{index}]: {err}"),
            ));
        }
    }
    Ok(())
}

pub fn join_lines(lines: impl IntoIterator<Item = Option<String>>) -> String {
    lines.into_iter().flatten().collect::<Vec<_>>().join("\n")
}

pub fn field(label: &str, value: Option<impl Display>) -> Option<String> {
    value.map(|value| format!("{label}: {value}"))
}

pub fn attachment_lines(results: &[AttachmentUploadResult]) -> Option<String> {
    if results.is_empty() {
        return None;
    }
    let mut text = String::from("Attachments:");
    for result in results {
        match &result.error {
            None => text.push_str(&format!("\n- {}: uploaded", result.file_name)),
            Some(error) => text.push_str(&format!("\n- {}: failed ({error})", result.file_name)),
        }
    }
    Some(text)
}

pub fn line_item_lines(items: Option<&[LineItem]>) -> Option<String> {
    let items = items.filter(|items| !items.is_empty())?;
    let mut text = String::from("Line items:");
    for item in items {
        text.push_str(&format!(
            "\n- {} (account {}): {} x {}",
            item.description.as_deref().unwrap_or("(no description)"),
            item.account_code.as_deref().unwrap_or("-"),
            amount(item.quantity),
            amount(item.unit_amount),
        ));
        if let Some(line_amount) = item.line_amount {
            text.push_str(&format!(" = {}", amount(Some(line_amount))));
        }
    }
    Some(text)
}

pub fn amount(value: Option<Decimal>) -> String {
    value
        .map(|value| value.normalize().to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Prefers Xero's ISO `DateString` over the legacy `/Date(...)/` form.
pub fn display_date<'a>(date_string: Option<&'a str>, date: Option<&'a str>) -> Option<&'a str> {
    date_string.or(date)
}

#[cfg(test)]
pub(crate) fn result_text(result: &Value) -> &str {
    result
        .get("content")
        .and_then(|value| value.as_array())
        .and_then(|arr| arr.first())
        .and_then(|value| value.get("text"))
        .and_then(|value| value.as_str())
        .unwrap_or("")
}
