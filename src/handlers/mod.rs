//! One remote call per handler, wrapped in [`XeroResponse`].

use crate::attachments::AttachmentTarget;
use crate::xero::models::LineItem;
use crate::xero::{AttachmentEndpoint, XeroApi, XeroError, format_error};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::future::Future;

pub mod accounts;
pub mod bank_transactions;
pub mod contacts;
pub mod credit_notes;
pub mod invoices;
pub mod manual_journals;

/// Success carries the entity, error carries the user-facing message.
pub type XeroResponse<T> = Result<T, String>;

/// Authenticates, performs `call` once and formats any failure.
pub async fn with_client<'a, T, F, Fut>(
    api: &'a dyn XeroApi,
    action: &'static str,
    call: F,
) -> XeroResponse<T>
where
    F: FnOnce(&'a dyn XeroApi) -> Fut,
    Fut: Future<Output = Result<T, XeroError>>,
{
    let outcome = match api.authenticate().await {
        Ok(()) => call(api).await,
        Err(err) => Err(err),
    };
    outcome.map_err(|err| {
        tracing::warn!(action, error = %err, "xero call failed");
        format_error(&err)
    })
}

/// Uploads attachments onto one record type through the shared client.
pub struct AttachmentUploader<'a> {
    api: &'a dyn XeroApi,
    endpoint: AttachmentEndpoint,
}

impl<'a> AttachmentUploader<'a> {
    pub fn new(api: &'a dyn XeroApi, endpoint: AttachmentEndpoint) -> Self {
        Self { api, endpoint }
    }
}

#[async_trait]
impl AttachmentTarget for AttachmentUploader<'_> {
    async fn upload(
        &self,
        resource_id: &str,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<()> {
        let endpoint = self.endpoint;
        with_client(self.api, "upload attachment", |api| async move {
            api.upload_attachment(endpoint, resource_id, file_name, mime_type, bytes)
                .await
        })
        .await
        .map(|_| ())
        .map_err(anyhow::Error::msg)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub description: String,
    pub quantity: Decimal,
    pub unit_amount: Decimal,
    pub account_code: String,
    pub tax_type: String,
    pub item_code: Option<String>,
}

impl From<LineItemInput> for LineItem {
    fn from(input: LineItemInput) -> Self {
        LineItem {
            description: Some(input.description),
            quantity: Some(input.quantity),
            unit_amount: Some(input.unit_amount),
            account_code: Some(input.account_code),
            tax_type: Some(input.tax_type),
            item_code: input.item_code,
            line_amount: None,
        }
    }
}

pub(crate) fn line_items(items: Option<Vec<LineItemInput>>) -> Option<Vec<LineItem>> {
    items.map(|items| items.into_iter().map(LineItem::from).collect())
}
