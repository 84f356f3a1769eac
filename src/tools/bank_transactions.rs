use crate::attachments::AttachmentInput;
use crate::handlers::bank_transactions::{self, BankTransactionChanges, NewBankTransaction};
use crate::tools::{
    ToolContext, amount, attachment_lines, check_attachments, display_date, error_result, field,
    join_lines, line_item_lines, parse_args, text_result,
};
use crate::xero::models::{BankTransaction, BankTransactionQuery};
use crate::xero::{AttachmentEndpoint, DeepLinkKind};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct CreateArgs {
    #[serde(flatten)]
    transaction: NewBankTransaction,
    #[serde(default)]
    attachments: Vec<AttachmentInput>,
}

#[derive(Deserialize)]
struct UpdateArgs {
    #[serde(flatten)]
    changes: BankTransactionChanges,
    #[serde(default)]
    attachments: Vec<AttachmentInput>,
}

pub async fn create(ctx: &ToolContext, args: &Value) -> Value {
    let args: CreateArgs = match parse_args(args) {
        Ok(args) => args,
        Err(result) => return result,
    };
    if let Err(result) = check_attachments(&args.attachments) {
        return result;
    }

    let transaction =
        match bank_transactions::create_bank_transaction(ctx.api(), args.transaction).await {
            Ok(transaction) => transaction,
            Err(message) => return error_result("creating bank transaction", message),
        };
    saved(
        ctx,
        "Bank transaction created successfully:",
        transaction,
        &args.attachments,
    )
    .await
}

pub async fn update(ctx: &ToolContext, args: &Value) -> Value {
    let args: UpdateArgs = match parse_args(args) {
        Ok(args) => args,
        Err(result) => return result,
    };
    if let Err(result) = check_attachments(&args.attachments) {
        return result;
    }

    let transaction =
        match bank_transactions::update_bank_transaction(ctx.api(), args.changes).await {
            Ok(transaction) => transaction,
            Err(message) => return error_result("updating bank transaction", message),
        };
    saved(
        ctx,
        "Bank transaction updated successfully:",
        transaction,
        &args.attachments,
    )
    .await
}

pub async fn list(ctx: &ToolContext, args: &Value) -> Value {
    let query: BankTransactionQuery = match parse_args(args) {
        Ok(query) => query,
        Err(result) => return result,
    };
    let transactions = match bank_transactions::list_bank_transactions(ctx.api(), query).await {
        Ok(transactions) => transactions,
        Err(message) => return error_result("listing bank transactions", message),
    };
    if transactions.is_empty() {
        return text_result("No bank transactions found.");
    }

    let mut blocks = vec![format!("Found {} bank transactions:", transactions.len())];
    blocks.extend(
        transactions
            .iter()
            .map(|transaction| join_lines(summary(transaction))),
    );
    text_result(blocks.join("\n\n"))
}

async fn saved(
    ctx: &ToolContext,
    heading: &str,
    transaction: BankTransaction,
    attachments: &[AttachmentInput],
) -> Value {
    let id = transaction.bank_transaction_id.as_deref();
    let uploads = ctx
        .attach(AttachmentEndpoint::BankTransactions, id, attachments)
        .await;
    let link = ctx.link(DeepLinkKind::BankTransaction, id).await;

    let mut lines = vec![Some(heading.to_string())];
    lines.extend(summary(&transaction));
    lines.push(line_item_lines(transaction.line_items.as_deref()));
    lines.push(attachment_lines(&uploads));
    lines.push(link);
    text_result(join_lines(lines))
}

fn summary(transaction: &BankTransaction) -> Vec<Option<String>> {
    let bank_account = transaction.bank_account.as_ref().and_then(|account| {
        account
            .name
            .as_deref()
            .or(account.code.as_deref())
            .or(account.account_id.as_deref())
    });
    vec![
        field("ID", transaction.bank_transaction_id.as_deref()),
        field("Type", transaction.kind.as_deref()),
        field(
            "Contact",
            transaction
                .contact
                .as_ref()
                .and_then(|contact| contact.name.as_deref()),
        ),
        field("Bank account", bank_account),
        field(
            "Date",
            display_date(
                transaction.date_string.as_deref(),
                transaction.date.as_deref(),
            ),
        ),
        field("Reference", transaction.reference.as_deref()),
        field("Total", transaction.total.map(|total| amount(Some(total)))),
        field("Status", transaction.status.as_deref()),
        field(
            "Reconciled",
            transaction
                .is_reconciled
                .map(|reconciled| if reconciled { "yes" } else { "no" }),
        ),
    ]
}
