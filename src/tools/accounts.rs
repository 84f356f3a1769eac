use crate::handlers::accounts;
use crate::tools::{ToolContext, error_result, field, join_lines, text_result};
use crate::xero::models::Account;
use serde_json::Value;

pub async fn list(ctx: &ToolContext, _args: &Value) -> Value {
    let accounts = match accounts::list_accounts(ctx.api()).await {
        Ok(accounts) => accounts,
        Err(message) => return error_result("listing accounts", message),
    };
    if accounts.is_empty() {
        return text_result("No accounts found.");
    }

    let mut blocks = vec![format!("Found {} accounts:", accounts.len())];
    blocks.extend(accounts.iter().map(|account| join_lines(summary(account))));
    text_result(blocks.join("\n\n"))
}

fn summary(account: &Account) -> Vec<Option<String>> {
    let heading = match (account.code.as_deref(), account.name.as_deref()) {
        (Some(code), Some(name)) => Some(format!("{code} - {name}")),
        (None, Some(name)) => Some(name.to_string()),
        (Some(code), None) => Some(code.to_string()),
        (None, None) => None,
    };
    vec![
        heading,
        field("ID", account.account_id.as_deref()),
        field("Type", account.kind.as_deref()),
        field("Class", account.class.as_deref()),
        field("Tax type", account.tax_type.as_deref()),
        field("Bank account number", account.bank_account_number.as_deref()),
        field("Status", account.status.as_deref()),
        field("Description", account.description.as_deref()),
    ]
}
