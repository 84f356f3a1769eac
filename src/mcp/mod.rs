use serde_json::json;

pub mod contracts;
pub mod errors;

pub fn tool_definitions() -> Vec<serde_json::Value> {
    TOOLS
        .iter()
        .map(|(name, description, schema)| {
            json!({
                "name": name,
                "description": description,
                "inputSchema": schema()
            })
        })
        .collect()
}

type SchemaFn = fn() -> serde_json::Value;

pub const TOOLS: &[(&str, &str, SchemaFn)] = &[
    (
        contracts::TOOL_CREATE_INVOICE,
        "Create an invoice (ACCREC) or bill (ACCPAY) in Xero, optionally attaching files. \
         Returns the new invoice and a link to view it in Xero.",
        contracts::create_invoice_schema,
    ),
    (
        contracts::TOOL_UPDATE_INVOICE,
        "Update a draft invoice in Xero. Supply every line item that should remain; \
         lines left out are deleted.",
        contracts::update_invoice_schema,
    ),
    (
        contracts::TOOL_LIST_INVOICES,
        "List invoices in Xero, optionally filtered by contact ids or invoice numbers.",
        contracts::list_invoices_schema,
    ),
    (
        contracts::TOOL_CREATE_CREDIT_NOTE,
        "Create a customer credit note in Xero, optionally attaching base64-encoded files.",
        contracts::create_credit_note_schema,
    ),
    (
        contracts::TOOL_UPDATE_CREDIT_NOTE,
        "Update a draft credit note in Xero. Supply every line item that should remain.",
        contracts::update_credit_note_schema,
    ),
    (
        contracts::TOOL_LIST_CREDIT_NOTES,
        "List credit notes in Xero, optionally for one contact.",
        contracts::list_credit_notes_schema,
    ),
    (
        contracts::TOOL_CREATE_BANK_TRANSACTION,
        "Create a receive or spend money bank transaction in Xero, optionally attaching files.",
        contracts::create_bank_transaction_schema,
    ),
    (
        contracts::TOOL_UPDATE_BANK_TRANSACTION,
        "Update a bank transaction in Xero. Supply every line item that should remain.",
        contracts::update_bank_transaction_schema,
    ),
    (
        contracts::TOOL_LIST_BANK_TRANSACTIONS,
        "List bank transactions in Xero, optionally for one bank account.",
        contracts::list_bank_transactions_schema,
    ),
    (
        contracts::TOOL_CREATE_MANUAL_JOURNAL,
        "Create a manual journal in Xero. Positive line amounts are debits, negative are credits.",
        contracts::create_manual_journal_schema,
    ),
    (
        contracts::TOOL_UPDATE_MANUAL_JOURNAL,
        "Replace the narration and lines of a manual journal in Xero.",
        contracts::update_manual_journal_schema,
    ),
    (
        contracts::TOOL_LIST_MANUAL_JOURNALS,
        "List manual journals in Xero.",
        contracts::list_manual_journals_schema,
    ),
    (
        contracts::TOOL_LIST_ACCOUNTS,
        "List the chart of accounts in Xero.",
        contracts::list_accounts_schema,
    ),
    (
        contracts::TOOL_CREATE_CONTACT,
        "Create a contact in Xero.",
        contracts::create_contact_schema,
    ),
    (
        contracts::TOOL_UPDATE_CONTACT,
        "Update a contact in Xero.",
        contracts::update_contact_schema,
    ),
    (
        contracts::TOOL_LIST_CONTACTS,
        "List contacts in Xero, optionally matching a search term.",
        contracts::list_contacts_schema,
    ),
    (
        contracts::TOOL_ADD_ATTACHMENT,
        "Attach files to an existing Xero record by path or base64 content.",
        contracts::add_attachment_schema,
    ),
];
