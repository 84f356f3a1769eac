//! In-memory [`XeroApi`] for handler and tool tests.

use crate::xero::models::{
    Account, Attachment, BankTransaction, BankTransactionQuery, Contact, ContactQuery, CreditNote,
    CreditNoteQuery, Invoice, InvoiceQuery, LineItem, ManualJournal, ManualJournalQuery,
};
use crate::xero::{AttachmentEndpoint, XeroApi, XeroError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Mutex;

pub const CONTACT_NAME: &str = "Acme Ltd";

#[derive(Default)]
pub struct FakeXero {
    unauthenticated: bool,
    reject: Option<(u16, String)>,
    failing_attachment: Option<String>,
    short_code: Option<String>,
    calls: Mutex<Vec<String>>,
    uploads: Mutex<Vec<(AttachmentEndpoint, String, String)>>,
    last_manual_journal: Mutex<Option<ManualJournal>>,
}

impl FakeXero {
    pub fn unauthenticated() -> Self {
        Self {
            unauthenticated: true,
            ..Self::default()
        }
    }

    pub fn reject_with(mut self, status: u16, body: &str) -> Self {
        self.reject = Some((status, body.to_string()));
        self
    }

    pub fn fail_attachment(mut self, file_name: &str) -> Self {
        self.failing_attachment = Some(file_name.to_string());
        self
    }

    pub fn with_short_code(mut self, short_code: &str) -> Self {
        self.short_code = Some(short_code.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn uploads(&self) -> Vec<(AttachmentEndpoint, String, String)> {
        self.uploads.lock().expect("lock").clone()
    }

    pub fn last_manual_journal(&self) -> Option<ManualJournal> {
        self.last_manual_journal.lock().expect("lock").clone()
    }

    fn record(&self, call: &str) -> Result<(), XeroError> {
        self.calls.lock().expect("lock").push(call.to_string());
        match &self.reject {
            Some((status, body)) => Err(XeroError::Api {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn named(contact: Option<Contact>) -> Option<Contact> {
    contact.map(|contact| Contact {
        name: contact.name.or_else(|| Some(CONTACT_NAME.to_string())),
        ..contact
    })
}

fn priced(items: Option<Vec<LineItem>>) -> (Option<Vec<LineItem>>, Decimal) {
    let items: Option<Vec<LineItem>> = items.map(|items| {
        items
            .into_iter()
            .map(|item| LineItem {
                line_amount: Some(
                    item.quantity.unwrap_or_default() * item.unit_amount.unwrap_or_default(),
                ),
                ..item
            })
            .collect()
    });
    let total = items
        .iter()
        .flatten()
        .filter_map(|item| item.line_amount)
        .sum();
    (items, total)
}

#[async_trait]
impl XeroApi for FakeXero {
    async fn authenticate(&self) -> Result<(), XeroError> {
        if self.unauthenticated {
            return Err(XeroError::NotConfigured);
        }
        Ok(())
    }

    async fn create_invoice(&self, invoice: &Invoice) -> Result<Invoice, XeroError> {
        self.record("create_invoice")?;
        let (line_items, total) = priced(invoice.line_items.clone());
        Ok(Invoice {
            invoice_id: Some("inv-0001".to_string()),
            invoice_number: Some("INV-0001".to_string()),
            contact: named(invoice.contact.clone()),
            line_items,
            total: Some(total),
            ..invoice.clone()
        })
    }

    async fn update_invoice(
        &self,
        invoice_id: &str,
        invoice: &Invoice,
    ) -> Result<Invoice, XeroError> {
        self.record("update_invoice")?;
        let (line_items, total) = priced(invoice.line_items.clone());
        Ok(Invoice {
            invoice_id: Some(invoice_id.to_string()),
            contact: named(invoice.contact.clone().or_else(|| Some(Contact::default()))),
            status: Some("DRAFT".to_string()),
            line_items,
            total: Some(total),
            ..invoice.clone()
        })
    }

    async fn list_invoices(&self, _query: &InvoiceQuery) -> Result<Vec<Invoice>, XeroError> {
        self.record("list_invoices")?;
        Ok(vec![Invoice {
            invoice_id: Some("inv-0001".to_string()),
            invoice_number: Some("INV-0001".to_string()),
            kind: Some("ACCREC".to_string()),
            contact: named(Some(Contact::default())),
            status: Some("AUTHORISED".to_string()),
            total: Some(Decimal::new(11500, 2)),
            amount_due: Some(Decimal::new(11500, 2)),
            ..Invoice::default()
        }])
    }

    async fn create_credit_note(&self, credit_note: &CreditNote) -> Result<CreditNote, XeroError> {
        self.record("create_credit_note")?;
        let (line_items, total) = priced(credit_note.line_items.clone());
        Ok(CreditNote {
            credit_note_id: Some("cn-0001".to_string()),
            credit_note_number: Some("CN-0001".to_string()),
            contact: named(credit_note.contact.clone()),
            line_items,
            total: Some(total),
            ..credit_note.clone()
        })
    }

    async fn update_credit_note(
        &self,
        credit_note_id: &str,
        credit_note: &CreditNote,
    ) -> Result<CreditNote, XeroError> {
        self.record("update_credit_note")?;
        Ok(CreditNote {
            credit_note_id: Some(credit_note_id.to_string()),
            status: Some("DRAFT".to_string()),
            ..credit_note.clone()
        })
    }

    async fn list_credit_notes(
        &self,
        _query: &CreditNoteQuery,
    ) -> Result<Vec<CreditNote>, XeroError> {
        self.record("list_credit_notes")?;
        Ok(Vec::new())
    }

    async fn create_bank_transaction(
        &self,
        transaction: &BankTransaction,
    ) -> Result<BankTransaction, XeroError> {
        self.record("create_bank_transaction")?;
        let (line_items, total) = priced(transaction.line_items.clone());
        Ok(BankTransaction {
            bank_transaction_id: Some("bt-0001".to_string()),
            contact: named(transaction.contact.clone()),
            status: Some("AUTHORISED".to_string()),
            line_items,
            total: Some(total),
            ..transaction.clone()
        })
    }

    async fn update_bank_transaction(
        &self,
        bank_transaction_id: &str,
        transaction: &BankTransaction,
    ) -> Result<BankTransaction, XeroError> {
        self.record("update_bank_transaction")?;
        Ok(BankTransaction {
            bank_transaction_id: Some(bank_transaction_id.to_string()),
            ..transaction.clone()
        })
    }

    async fn list_bank_transactions(
        &self,
        _query: &BankTransactionQuery,
    ) -> Result<Vec<BankTransaction>, XeroError> {
        self.record("list_bank_transactions")?;
        Ok(Vec::new())
    }

    async fn create_manual_journal(
        &self,
        journal: &ManualJournal,
    ) -> Result<ManualJournal, XeroError> {
        self.record("create_manual_journal")?;
        *self.last_manual_journal.lock().expect("lock") = Some(journal.clone());
        Ok(ManualJournal {
            manual_journal_id: Some("mj-0001".to_string()),
            status: journal.status.clone().or_else(|| Some("DRAFT".to_string())),
            ..journal.clone()
        })
    }

    async fn update_manual_journal(
        &self,
        manual_journal_id: &str,
        journal: &ManualJournal,
    ) -> Result<ManualJournal, XeroError> {
        self.record("update_manual_journal")?;
        *self.last_manual_journal.lock().expect("lock") = Some(journal.clone());
        Ok(ManualJournal {
            manual_journal_id: Some(manual_journal_id.to_string()),
            status: journal.status.clone().or_else(|| Some("DRAFT".to_string())),
            ..journal.clone()
        })
    }

    async fn list_manual_journals(
        &self,
        _query: &ManualJournalQuery,
    ) -> Result<Vec<ManualJournal>, XeroError> {
        self.record("list_manual_journals")?;
        Ok(Vec::new())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, XeroError> {
        self.record("list_accounts")?;
        Ok(vec![
            Account {
                account_id: Some("acc-200".to_string()),
                code: Some("200".to_string()),
                name: Some("Sales".to_string()),
                kind: Some("REVENUE".to_string()),
                status: Some("ACTIVE".to_string()),
                ..Account::default()
            },
            Account {
                account_id: Some("acc-090".to_string()),
                code: Some("090".to_string()),
                name: Some("Business Bank Account".to_string()),
                kind: Some("BANK".to_string()),
                status: Some("ACTIVE".to_string()),
                bank_account_number: Some("12-3456-7890123-00".to_string()),
                ..Account::default()
            },
        ])
    }

    async fn create_contact(&self, contact: &Contact) -> Result<Contact, XeroError> {
        self.record("create_contact")?;
        Ok(Contact {
            contact_id: Some("c-0001".to_string()),
            contact_status: Some("ACTIVE".to_string()),
            ..contact.clone()
        })
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        contact: &Contact,
    ) -> Result<Contact, XeroError> {
        self.record("update_contact")?;
        Ok(Contact {
            contact_id: Some(contact_id.to_string()),
            ..contact.clone()
        })
    }

    async fn list_contacts(&self, _query: &ContactQuery) -> Result<Vec<Contact>, XeroError> {
        self.record("list_contacts")?;
        Ok(vec![Contact {
            contact_id: Some("c-0001".to_string()),
            name: Some(CONTACT_NAME.to_string()),
            email_address: Some("accounts@acme.test".to_string()),
            ..Contact::default()
        }])
    }

    async fn upload_attachment(
        &self,
        endpoint: AttachmentEndpoint,
        resource_id: &str,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Attachment, XeroError> {
        self.record("upload_attachment")?;
        if self.failing_attachment.as_deref() == Some(file_name) {
            return Err(XeroError::Api {
                status: 400,
                body: json!({ "Message": format!("Attachment {file_name} was rejected") })
                    .to_string(),
            });
        }
        self.uploads.lock().expect("lock").push((
            endpoint,
            resource_id.to_string(),
            file_name.to_string(),
        ));
        Ok(Attachment {
            attachment_id: Some(format!("att-{file_name}")),
            file_name: Some(file_name.to_string()),
            mime_type: Some(mime_type.to_string()),
            content_length: Some(bytes.len() as u64),
            url: None,
        })
    }

    async fn short_code(&self) -> Option<String> {
        self.short_code.clone()
    }
}
