use crate::handlers::{LineItemInput, XeroResponse, line_items, with_client};
use crate::xero::XeroApi;
use crate::xero::models::{Contact, Invoice, InvoiceQuery};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    pub contact_id: String,
    pub line_items: Vec<LineItemInput>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub reference: Option<String>,
    pub date: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceChanges {
    pub invoice_id: String,
    pub contact_id: Option<String>,
    pub line_items: Option<Vec<LineItemInput>>,
    pub reference: Option<String>,
    pub date: Option<String>,
    pub due_date: Option<String>,
}

pub async fn create_invoice(api: &dyn XeroApi, input: NewInvoice) -> XeroResponse<Invoice> {
    let invoice = Invoice {
        kind: Some(input.kind.unwrap_or_else(|| "ACCREC".to_string())),
        contact: Some(Contact::reference(input.contact_id)),
        line_items: line_items(Some(input.line_items)),
        reference: input.reference,
        date: input.date,
        due_date: input.due_date,
        status: Some(input.status.unwrap_or_else(|| "DRAFT".to_string())),
        ..Invoice::default()
    };
    with_client(api, "create invoice", |api| async move {
        api.create_invoice(&invoice).await
    })
    .await
}

pub async fn update_invoice(api: &dyn XeroApi, input: InvoiceChanges) -> XeroResponse<Invoice> {
    let invoice = Invoice {
        invoice_id: Some(input.invoice_id.clone()),
        contact: input.contact_id.map(Contact::reference),
        line_items: line_items(input.line_items),
        reference: input.reference,
        date: input.date,
        due_date: input.due_date,
        ..Invoice::default()
    };
    let invoice_id = input.invoice_id;
    with_client(api, "update invoice", |api| async move {
        api.update_invoice(&invoice_id, &invoice).await
    })
    .await
}

pub async fn list_invoices(api: &dyn XeroApi, query: InvoiceQuery) -> XeroResponse<Vec<Invoice>> {
    with_client(api, "list invoices", |api| async move {
        api.list_invoices(&query).await
    })
    .await
}
