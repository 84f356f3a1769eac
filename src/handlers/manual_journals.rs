use crate::handlers::{XeroResponse, with_client};
use crate::xero::XeroApi;
use crate::xero::models::{JournalLine, ManualJournal, ManualJournalQuery};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalLineInput {
    pub line_amount: Decimal,
    pub account_code: String,
    pub description: Option<String>,
    pub tax_type: Option<String>,
}

/// Full journal state; updates replace narration and every line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalInput {
    pub narration: String,
    pub manual_journal_lines: Vec<JournalLineInput>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub line_amount_types: Option<String>,
    pub show_on_cash_basis_reports: Option<bool>,
}

impl JournalInput {
    fn into_journal(self, manual_journal_id: Option<String>) -> ManualJournal {
        ManualJournal {
            manual_journal_id,
            narration: Some(self.narration),
            date: self.date,
            status: self.status,
            line_amount_types: self.line_amount_types,
            show_on_cash_basis_reports: self.show_on_cash_basis_reports,
            journal_lines: Some(
                self.manual_journal_lines
                    .into_iter()
                    .map(|line| JournalLine {
                        line_amount: Some(line.line_amount),
                        account_code: Some(line.account_code),
                        description: line.description,
                        tax_type: line.tax_type,
                    })
                    .collect(),
            ),
            ..ManualJournal::default()
        }
    }
}

pub async fn create_manual_journal(
    api: &dyn XeroApi,
    input: JournalInput,
) -> XeroResponse<ManualJournal> {
    let journal = input.into_journal(None);
    with_client(api, "create manual journal", |api| async move {
        api.create_manual_journal(&journal).await
    })
    .await
}

pub async fn update_manual_journal(
    api: &dyn XeroApi,
    manual_journal_id: String,
    input: JournalInput,
) -> XeroResponse<ManualJournal> {
    let journal = input.into_journal(Some(manual_journal_id.clone()));
    with_client(api, "update manual journal", |api| async move {
        api.update_manual_journal(&manual_journal_id, &journal).await
    })
    .await
}

pub async fn list_manual_journals(
    api: &dyn XeroApi,
    query: ManualJournalQuery,
) -> XeroResponse<Vec<ManualJournal>> {
    with_client(api, "list manual journals", |api| async move {
        api.list_manual_journals(&query).await
    })
    .await
}
