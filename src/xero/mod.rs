use async_trait::async_trait;
use serde_json::Value;

pub mod client;
pub mod deep_link;
#[cfg(test)]
pub mod fake;
pub mod models;

pub use client::XeroClient;
pub use deep_link::{DeepLinkKind, deep_link};

use models::{
    Account, Attachment, BankTransaction, BankTransactionQuery, Contact, ContactQuery, CreditNote,
    CreditNoteQuery, Invoice, InvoiceQuery, ManualJournal, ManualJournalQuery,
};

#[derive(Debug, thiserror::Error)]
pub enum XeroError {
    #[error(
        "Xero credentials are not configured: set XERO_CLIENT_ID and XERO_CLIENT_SECRET, \
         or XERO_CLIENT_BEARER_TOKEN"
    )]
    NotConfigured,
    #[error("authentication with Xero failed: {0}")]
    Auth(String),
    #[error("no Xero organisation is connected to these credentials")]
    NoTenant,
    #[error("Xero API returned {status}")]
    Api { status: u16, body: String },
    #[error("request to Xero failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response from Xero: {0}")]
    Decode(String),
    #[error("Xero response did not contain any {0}")]
    MissingEntity(&'static str),
}

/// Record types that accept attachments, named by their API collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentEndpoint {
    Invoices,
    CreditNotes,
    BankTransactions,
    ManualJournals,
    Contacts,
    Accounts,
}

impl AttachmentEndpoint {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "invoice" => Some(AttachmentEndpoint::Invoices),
            "credit-note" => Some(AttachmentEndpoint::CreditNotes),
            "bank-transaction" => Some(AttachmentEndpoint::BankTransactions),
            "manual-journal" => Some(AttachmentEndpoint::ManualJournals),
            "contact" => Some(AttachmentEndpoint::Contacts),
            "account" => Some(AttachmentEndpoint::Accounts),
            _ => None,
        }
    }

    pub fn as_path(&self) -> &'static str {
        match self {
            AttachmentEndpoint::Invoices => "Invoices",
            AttachmentEndpoint::CreditNotes => "CreditNotes",
            AttachmentEndpoint::BankTransactions => "BankTransactions",
            AttachmentEndpoint::ManualJournals => "ManualJournals",
            AttachmentEndpoint::Contacts => "Contacts",
            AttachmentEndpoint::Accounts => "Accounts",
        }
    }

    /// Xero only shows attachments to customers on sales documents.
    pub fn include_online(&self) -> bool {
        matches!(
            self,
            AttachmentEndpoint::Invoices | AttachmentEndpoint::CreditNotes
        )
    }
}

/// Tenant-scoped Xero accounting operations.
#[async_trait]
pub trait XeroApi: Send + Sync {
    /// Ensures a usable access token and tenant. Cheap once a session exists.
    async fn authenticate(&self) -> Result<(), XeroError>;

    async fn create_invoice(&self, invoice: &Invoice) -> Result<Invoice, XeroError>;
    async fn update_invoice(&self, invoice_id: &str, invoice: &Invoice)
    -> Result<Invoice, XeroError>;
    async fn list_invoices(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>, XeroError>;

    async fn create_credit_note(&self, credit_note: &CreditNote) -> Result<CreditNote, XeroError>;
    async fn update_credit_note(
        &self,
        credit_note_id: &str,
        credit_note: &CreditNote,
    ) -> Result<CreditNote, XeroError>;
    async fn list_credit_notes(&self, query: &CreditNoteQuery)
    -> Result<Vec<CreditNote>, XeroError>;

    async fn create_bank_transaction(
        &self,
        transaction: &BankTransaction,
    ) -> Result<BankTransaction, XeroError>;
    async fn update_bank_transaction(
        &self,
        bank_transaction_id: &str,
        transaction: &BankTransaction,
    ) -> Result<BankTransaction, XeroError>;
    async fn list_bank_transactions(
        &self,
        query: &BankTransactionQuery,
    ) -> Result<Vec<BankTransaction>, XeroError>;

    async fn create_manual_journal(
        &self,
        journal: &ManualJournal,
    ) -> Result<ManualJournal, XeroError>;
    async fn update_manual_journal(
        &self,
        manual_journal_id: &str,
        journal: &ManualJournal,
    ) -> Result<ManualJournal, XeroError>;
    async fn list_manual_journals(
        &self,
        query: &ManualJournalQuery,
    ) -> Result<Vec<ManualJournal>, XeroError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, XeroError>;

    async fn create_contact(&self, contact: &Contact) -> Result<Contact, XeroError>;
    async fn update_contact(&self, contact_id: &str, contact: &Contact)
    -> Result<Contact, XeroError>;
    async fn list_contacts(&self, query: &ContactQuery) -> Result<Vec<Contact>, XeroError>;

    async fn upload_attachment(
        &self,
        endpoint: AttachmentEndpoint,
        resource_id: &str,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Attachment, XeroError>;

    /// Organisation short code used to route deep links; `None` when unknown.
    async fn short_code(&self) -> Option<String>;
}

/// Renders any client failure as the message shown to the user.
pub fn format_error(error: &XeroError) -> String {
    let XeroError::Api { status, body } = error else {
        return error.to_string();
    };
    match status {
        401 => "Authentication failed. Please check your Xero credentials.".to_string(),
        403 => "Insufficient permissions to perform this operation in Xero.".to_string(),
        404 => "The requested resource was not found in Xero.".to_string(),
        429 => "Rate limit exceeded. Please try again later.".to_string(),
        _ => match api_message(body) {
            Some(message) => message,
            None if body.trim().is_empty() => format!("Xero API returned {status}"),
            None => format!("Xero API returned {status}: {}", body.trim()),
        },
    }
}

fn api_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let validation: Vec<&str> = value
        .get("Elements")
        .and_then(|value| value.as_array())
        .into_iter()
        .flatten()
        .filter_map(|element| element.get("ValidationErrors"))
        .filter_map(|errors| errors.as_array())
        .flatten()
        .filter_map(|error| error.get("Message").and_then(|value| value.as_str()))
        .collect();
    if !validation.is_empty() {
        return Some(validation.join("; "));
    }

    ["Message", "Detail", "Title"]
        .iter()
        .find_map(|key| value.get(key).and_then(|value| value.as_str()))
        .map(str::to_string)
}
