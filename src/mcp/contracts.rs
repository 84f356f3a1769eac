use serde_json::{Value, json};

pub const TOOL_CREATE_INVOICE: &str = "create-invoice";
pub const TOOL_UPDATE_INVOICE: &str = "update-invoice";
pub const TOOL_LIST_INVOICES: &str = "list-invoices";
pub const TOOL_CREATE_CREDIT_NOTE: &str = "create-credit-note";
pub const TOOL_UPDATE_CREDIT_NOTE: &str = "update-credit-note";
pub const TOOL_LIST_CREDIT_NOTES: &str = "list-credit-notes";
pub const TOOL_CREATE_BANK_TRANSACTION: &str = "create-bank-transaction";
pub const TOOL_UPDATE_BANK_TRANSACTION: &str = "update-bank-transaction";
pub const TOOL_LIST_BANK_TRANSACTIONS: &str = "list-bank-transactions";
pub const TOOL_CREATE_MANUAL_JOURNAL: &str = "create-manual-journal";
pub const TOOL_UPDATE_MANUAL_JOURNAL: &str = "update-manual-journal";
pub const TOOL_LIST_MANUAL_JOURNALS: &str = "list-manual-journals";
pub const TOOL_LIST_ACCOUNTS: &str = "list-accounts";
pub const TOOL_CREATE_CONTACT: &str = "create-contact";
pub const TOOL_UPDATE_CONTACT: &str = "update-contact";
pub const TOOL_LIST_CONTACTS: &str = "list-contacts";
pub const TOOL_ADD_ATTACHMENT: &str = "add-attachment";

pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

fn attachment_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "filePath": {
                "type": "string",
                "description": "Local path of the file to attach"
            },
            "base64Content": {
                "type": "string",
                "description": "Base64-encoded file content"
            },
            "fileName": {
                "type": "string",
                "description": "File name; required with base64Content, overrides the path's name otherwise"
            },
            "mimeType": {
                "type": "string",
                "description": "Content type; inferred from the file name when omitted"
            }
        },
        "oneOf": [
            { "required": ["filePath"] },
            { "required": ["base64Content", "fileName"] }
        ],
        "additionalProperties": false
    })
}

fn attachments_schema() -> Value {
    json!({
        "type": "array",
        "items": attachment_schema(),
        "description": "Files to attach once the record has been saved"
    })
}

fn raw_attachments_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "fileName": { "type": "string" },
                "base64Content": { "type": "string" },
                "mimeType": { "type": "string" }
            },
            "required": ["fileName", "base64Content"],
            "additionalProperties": false
        },
        "description": "Base64-encoded files to attach once the credit note has been saved"
    })
}

fn line_items_schema() -> Value {
    json!({
        "type": "array",
        "minItems": 1,
        "items": {
            "type": "object",
            "properties": {
                "description": { "type": "string" },
                "quantity": { "type": "number" },
                "unitAmount": { "type": "number" },
                "accountCode": { "type": "string" },
                "taxType": { "type": "string" },
                "itemCode": { "type": "string" }
            },
            "required": ["description", "quantity", "unitAmount", "accountCode", "taxType"],
            "additionalProperties": false
        },
        "description": "All line items; lines omitted on update are deleted"
    })
}

fn journal_lines_schema() -> Value {
    json!({
        "type": "array",
        "minItems": 2,
        "items": {
            "type": "object",
            "properties": {
                "lineAmount": {
                    "type": "number",
                    "description": "Positive for debits, negative for credits"
                },
                "accountCode": { "type": "string" },
                "description": { "type": "string" },
                "taxType": { "type": "string" }
            },
            "required": ["lineAmount", "accountCode"],
            "additionalProperties": false
        }
    })
}

fn page_schema() -> Value {
    json!({ "type": "integer", "minimum": 1 })
}

pub fn create_invoice_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "contactId": { "type": "string" },
            "lineItems": line_items_schema(),
            "type": { "type": "string", "enum": ["ACCREC", "ACCPAY"] },
            "reference": { "type": "string" },
            "date": { "type": "string", "description": "YYYY-MM-DD" },
            "dueDate": { "type": "string", "description": "YYYY-MM-DD" },
            "status": { "type": "string", "enum": ["DRAFT", "SUBMITTED", "AUTHORISED"] },
            "attachments": attachments_schema()
        },
        "required": ["contactId", "lineItems"],
        "additionalProperties": false
    })
}

pub fn update_invoice_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "invoiceId": { "type": "string" },
            "contactId": { "type": "string" },
            "lineItems": line_items_schema(),
            "reference": { "type": "string" },
            "date": { "type": "string" },
            "dueDate": { "type": "string" },
            "attachments": attachments_schema()
        },
        "required": ["invoiceId"],
        "additionalProperties": false
    })
}

pub fn list_invoices_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "page": page_schema(),
            "contactIds": { "type": "array", "items": { "type": "string" } },
            "invoiceNumbers": { "type": "array", "items": { "type": "string" } }
        },
        "additionalProperties": false
    })
}

pub fn create_credit_note_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "contactId": { "type": "string" },
            "lineItems": line_items_schema(),
            "reference": { "type": "string" },
            "date": { "type": "string" },
            "attachments": raw_attachments_schema()
        },
        "required": ["contactId", "lineItems"],
        "additionalProperties": false
    })
}

pub fn update_credit_note_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "creditNoteId": { "type": "string" },
            "contactId": { "type": "string" },
            "lineItems": line_items_schema(),
            "reference": { "type": "string" },
            "date": { "type": "string" },
            "attachments": raw_attachments_schema()
        },
        "required": ["creditNoteId"],
        "additionalProperties": false
    })
}

pub fn list_credit_notes_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "page": page_schema(),
            "contactId": { "type": "string" }
        },
        "additionalProperties": false
    })
}

pub fn create_bank_transaction_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "type": { "type": "string", "enum": ["RECEIVE", "SPEND"] },
            "bankAccountId": { "type": "string" },
            "contactId": { "type": "string" },
            "lineItems": line_items_schema(),
            "reference": { "type": "string" },
            "date": { "type": "string" },
            "attachments": attachments_schema()
        },
        "required": ["type", "bankAccountId", "contactId", "lineItems"],
        "additionalProperties": false
    })
}

pub fn update_bank_transaction_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "bankTransactionId": { "type": "string" },
            "type": { "type": "string", "enum": ["RECEIVE", "SPEND"] },
            "contactId": { "type": "string" },
            "lineItems": line_items_schema(),
            "reference": { "type": "string" },
            "date": { "type": "string" },
            "attachments": attachments_schema()
        },
        "required": ["bankTransactionId"],
        "additionalProperties": false
    })
}

pub fn list_bank_transactions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "page": page_schema(),
            "bankAccountId": { "type": "string" }
        },
        "additionalProperties": false
    })
}

pub fn create_manual_journal_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "narration": { "type": "string" },
            "manualJournalLines": journal_lines_schema(),
            "date": { "type": "string" },
            "status": { "type": "string", "enum": ["DRAFT", "POSTED"] },
            "lineAmountTypes": { "type": "string", "enum": ["EXCLUSIVE", "INCLUSIVE", "NOTAX"] },
            "showOnCashBasisReports": { "type": "boolean" },
            "attachments": attachments_schema()
        },
        "required": ["narration", "manualJournalLines"],
        "additionalProperties": false
    })
}

pub fn update_manual_journal_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "manualJournalId": { "type": "string" },
            "narration": { "type": "string" },
            "manualJournalLines": journal_lines_schema(),
            "date": { "type": "string" },
            "status": { "type": "string", "enum": ["DRAFT", "POSTED"] },
            "lineAmountTypes": { "type": "string", "enum": ["EXCLUSIVE", "INCLUSIVE", "NOTAX"] },
            "showOnCashBasisReports": { "type": "boolean" },
            "attachments": attachments_schema()
        },
        "required": ["manualJournalId", "narration", "manualJournalLines"],
        "additionalProperties": false
    })
}

pub fn list_manual_journals_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "page": page_schema()
        },
        "additionalProperties": false
    })
}

pub fn list_accounts_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "additionalProperties": false
    })
}

pub fn create_contact_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "firstName": { "type": "string" },
            "lastName": { "type": "string" },
            "email": { "type": "string" },
            "phone": { "type": "string" }
        },
        "required": ["name"],
        "additionalProperties": false
    })
}

pub fn update_contact_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "contactId": { "type": "string" },
            "name": { "type": "string" },
            "firstName": { "type": "string" },
            "lastName": { "type": "string" },
            "email": { "type": "string" },
            "phone": { "type": "string" }
        },
        "required": ["contactId"],
        "additionalProperties": false
    })
}

pub fn list_contacts_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "page": page_schema(),
            "searchTerm": { "type": "string" }
        },
        "additionalProperties": false
    })
}

pub fn add_attachment_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "entityType": {
                "type": "string",
                "enum": ["invoice", "credit-note", "bank-transaction", "manual-journal", "contact", "account"]
            },
            "entityId": { "type": "string" },
            "attachments": attachments_schema()
        },
        "required": ["entityType", "entityId", "attachments"],
        "additionalProperties": false
    })
}
