use crate::attachments::AttachmentInput;
use crate::handlers::manual_journals::{self, JournalInput};
use crate::tools::{
    ToolContext, amount, attachment_lines, check_attachments, display_date, error_result, field,
    join_lines, parse_args, text_result,
};
use crate::xero::models::{JournalLine, ManualJournal, ManualJournalQuery};
use crate::xero::{AttachmentEndpoint, DeepLinkKind};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct CreateArgs {
    #[serde(flatten)]
    journal: JournalInput,
    #[serde(default)]
    attachments: Vec<AttachmentInput>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateArgs {
    manual_journal_id: String,
    #[serde(flatten)]
    journal: JournalInput,
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

    let journal = match manual_journals::create_manual_journal(ctx.api(), args.journal).await {
        Ok(journal) => journal,
        Err(message) => return error_result("creating manual journal", message),
    };
    saved(
        ctx,
        "Manual journal created successfully:",
        journal,
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

    let journal = match manual_journals::update_manual_journal(
        ctx.api(),
        args.manual_journal_id,
        args.journal,
    )
    .await
    {
        Ok(journal) => journal,
        Err(message) => return error_result("updating manual journal", message),
    };
    saved(
        ctx,
        "Manual journal updated successfully:",
        journal,
        &args.attachments,
    )
    .await
}

pub async fn list(ctx: &ToolContext, args: &Value) -> Value {
    let query: ManualJournalQuery = match parse_args(args) {
        Ok(query) => query,
        Err(result) => return result,
    };
    let journals = match manual_journals::list_manual_journals(ctx.api(), query).await {
        Ok(journals) => journals,
        Err(message) => return error_result("listing manual journals", message),
    };
    if journals.is_empty() {
        return text_result("No manual journals found.");
    }

    let mut blocks = vec![format!("Found {} manual journals:", journals.len())];
    blocks.extend(journals.iter().map(|journal| {
        let mut lines = summary(journal);
        lines.push(journal_lines(journal.journal_lines.as_deref()));
        join_lines(lines)
    }));
    text_result(blocks.join("\n\n"))
}

async fn saved(
    ctx: &ToolContext,
    heading: &str,
    journal: ManualJournal,
    attachments: &[AttachmentInput],
) -> Value {
    let id = journal.manual_journal_id.as_deref();
    let uploads = ctx
        .attach(AttachmentEndpoint::ManualJournals, id, attachments)
        .await;
    let link = ctx.link(DeepLinkKind::ManualJournal, id).await;

    let mut lines = vec![Some(heading.to_string())];
    lines.extend(summary(&journal));
    lines.push(journal_lines(journal.journal_lines.as_deref()));
    lines.push(attachment_lines(&uploads));
    lines.push(link);
    text_result(join_lines(lines))
}

fn summary(journal: &ManualJournal) -> Vec<Option<String>> {
    vec![
        field("ID", journal.manual_journal_id.as_deref()),
        field("Narration", journal.narration.as_deref()),
        field(
            "Date",
            display_date(journal.date_string.as_deref(), journal.date.as_deref()),
        ),
        field("Status", journal.status.as_deref()),
        field("Line amount types", journal.line_amount_types.as_deref()),
    ]
}

fn journal_lines(lines: Option<&[JournalLine]>) -> Option<String> {
    let lines = lines.filter(|lines| !lines.is_empty())?;
    let mut text = String::from("Journal lines:");
    for line in lines {
        text.push_str(&format!(
            "\n- Account {}: {}",
            line.account_code.as_deref().unwrap_or("-"),
            amount(line.line_amount),
        ));
        if let Some(description) = &line.description {
            text.push_str(&format!(" ({description})"));
        }
    }
    Some(text)
}
