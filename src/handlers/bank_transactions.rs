use crate::handlers::{LineItemInput, XeroResponse, line_items, with_client};
use crate::xero::XeroApi;
use crate::xero::models::{Account, BankTransaction, BankTransactionQuery, Contact};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBankTransaction {
    #[serde(rename = "type")]
    pub kind: String,
    pub bank_account_id: String,
    pub contact_id: String,
    pub line_items: Vec<LineItemInput>,
    pub reference: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTransactionChanges {
    pub bank_transaction_id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub contact_id: Option<String>,
    pub line_items: Option<Vec<LineItemInput>>,
    pub reference: Option<String>,
    pub date: Option<String>,
}

pub async fn create_bank_transaction(
    api: &dyn XeroApi,
    input: NewBankTransaction,
) -> XeroResponse<BankTransaction> {
    let transaction = BankTransaction {
        kind: Some(input.kind),
        bank_account: Some(Account::reference(input.bank_account_id)),
        contact: Some(Contact::reference(input.contact_id)),
        line_items: line_items(Some(input.line_items)),
        reference: input.reference,
        date: input.date,
        ..BankTransaction::default()
    };
    with_client(api, "create bank transaction", |api| async move {
        api.create_bank_transaction(&transaction).await
    })
    .await
}

pub async fn update_bank_transaction(
    api: &dyn XeroApi,
    input: BankTransactionChanges,
) -> XeroResponse<BankTransaction> {
    let transaction = BankTransaction {
        bank_transaction_id: Some(input.bank_transaction_id.clone()),
        kind: input.kind,
        contact: input.contact_id.map(Contact::reference),
        line_items: line_items(input.line_items),
        reference: input.reference,
        date: input.date,
        ..BankTransaction::default()
    };
    let bank_transaction_id = input.bank_transaction_id;
    with_client(api, "update bank transaction", |api| async move {
        api.update_bank_transaction(&bank_transaction_id, &transaction)
            .await
    })
    .await
}

pub async fn list_bank_transactions(
    api: &dyn XeroApi,
    query: BankTransactionQuery,
) -> XeroResponse<Vec<BankTransaction>> {
    with_client(api, "list bank transactions", |api| async move {
        api.list_bank_transactions(&query).await
    })
    .await
}
