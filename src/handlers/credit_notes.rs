use crate::handlers::{LineItemInput, XeroResponse, line_items, with_client};
use crate::xero::XeroApi;
use crate::xero::models::{Contact, CreditNote, CreditNoteQuery};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCreditNote {
    pub contact_id: String,
    pub line_items: Vec<LineItemInput>,
    pub reference: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditNoteChanges {
    pub credit_note_id: String,
    pub contact_id: Option<String>,
    pub line_items: Option<Vec<LineItemInput>>,
    pub reference: Option<String>,
    pub date: Option<String>,
}

pub async fn create_credit_note(
    api: &dyn XeroApi,
    input: NewCreditNote,
) -> XeroResponse<CreditNote> {
    let credit_note = CreditNote {
        kind: Some("ACCRECCREDIT".to_string()),
        contact: Some(Contact::reference(input.contact_id)),
        line_items: line_items(Some(input.line_items)),
        reference: input.reference,
        date: input.date,
        status: Some("DRAFT".to_string()),
        ..CreditNote::default()
    };
    with_client(api, "create credit note", |api| async move {
        api.create_credit_note(&credit_note).await
    })
    .await
}

pub async fn update_credit_note(
    api: &dyn XeroApi,
    input: CreditNoteChanges,
) -> XeroResponse<CreditNote> {
    let credit_note = CreditNote {
        credit_note_id: Some(input.credit_note_id.clone()),
        contact: input.contact_id.map(Contact::reference),
        line_items: line_items(input.line_items),
        reference: input.reference,
        date: input.date,
        ..CreditNote::default()
    };
    let credit_note_id = input.credit_note_id;
    with_client(api, "update credit note", |api| async move {
        api.update_credit_note(&credit_note_id, &credit_note).await
    })
    .await
}

pub async fn list_credit_notes(
    api: &dyn XeroApi,
    query: CreditNoteQuery,
) -> XeroResponse<Vec<CreditNote>> {
    with_client(api, "list credit notes", |api| async move {
        api.list_credit_notes(&query).await
    })
    .await
}
