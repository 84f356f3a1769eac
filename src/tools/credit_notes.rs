use crate::attachments::RawAttachment;
use crate::handlers::credit_notes::{self, CreditNoteChanges, NewCreditNote};
use crate::tools::{
    ToolContext, amount, attachment_lines, check_raw_attachments, display_date, error_result,
    field, join_lines, line_item_lines, parse_args, text_result,
};
use crate::xero::models::{CreditNote, CreditNoteQuery};
use crate::xero::{AttachmentEndpoint, DeepLinkKind};
use serde::Deserialize;
use serde_json::Value;

// Credit notes take already-encoded attachments and skip normalization.
#[derive(Deserialize)]
struct CreateArgs {
    #[serde(flatten)]
    credit_note: NewCreditNote,
    #[serde(default)]
    attachments: Vec<RawAttachment>,
}

#[derive(Deserialize)]
struct UpdateArgs {
    #[serde(flatten)]
    changes: CreditNoteChanges,
    #[serde(default)]
    attachments: Vec<RawAttachment>,
}

pub async fn create(ctx: &ToolContext, args: &Value) -> Value {
    let args: CreateArgs = match parse_args(args) {
        Ok(args) => args,
        Err(result) => return result,
    };
    if let Err(result) = check_raw_attachments(&args.attachments) {
        return result;
    }
    let credit_note = match credit_notes::create_credit_note(ctx.api(), args.credit_note).await {
        Ok(credit_note) => credit_note,
        Err(message) => return error_result("creating credit note", message),
    };
    saved(
        ctx,
        "Credit note created successfully:",
        credit_note,
        &args.attachments,
    )
    .await
}

pub async fn update(ctx: &ToolContext, args: &Value) -> Value {
    let args: UpdateArgs = match parse_args(args) {
        Ok(args) => args,
        Err(result) => return result,
    };
    if let Err(result) = check_raw_attachments(&args.attachments) {
        return result;
    }
    let credit_note = match credit_notes::update_credit_note(ctx.api(), args.changes).await {
        Ok(credit_note) => credit_note,
        Err(message) => return error_result("updating credit note", message),
    };
    saved(
        ctx,
        "Credit note updated successfully:",
        credit_note,
        &args.attachments,
    )
    .await
}

pub async fn list(ctx: &ToolContext, args: &Value) -> Value {
    let query: CreditNoteQuery = match parse_args(args) {
        Ok(query) => query,
        Err(result) => return result,
    };
    let credit_notes = match credit_notes::list_credit_notes(ctx.api(), query).await {
        Ok(credit_notes) => credit_notes,
        Err(message) => return error_result("listing credit notes", message),
    };
    if credit_notes.is_empty() {
        return text_result("No credit notes found.");
    }

    let mut blocks = vec![format!("Found {} credit notes:", credit_notes.len())];
    blocks.extend(
        credit_notes
            .iter()
            .map(|credit_note| join_lines(summary(credit_note))),
    );
    text_result(blocks.join("\n\n"))
}

async fn saved(
    ctx: &ToolContext,
    heading: &str,
    credit_note: CreditNote,
    attachments: &[RawAttachment],
) -> Value {
    let id = credit_note.credit_note_id.as_deref();
    let uploads = ctx
        .attach_raw(AttachmentEndpoint::CreditNotes, id, attachments)
        .await;
    let link = ctx.link(DeepLinkKind::CreditNote, id).await;

    let mut lines = vec![Some(heading.to_string())];
    lines.extend(summary(&credit_note));
    lines.push(line_item_lines(credit_note.line_items.as_deref()));
    lines.push(attachment_lines(&uploads));
    lines.push(link);
    text_result(join_lines(lines))
}

fn summary(credit_note: &CreditNote) -> Vec<Option<String>> {
    vec![
        field("ID", credit_note.credit_note_id.as_deref()),
        field("Number", credit_note.credit_note_number.as_deref()),
        field(
            "Contact",
            credit_note
                .contact
                .as_ref()
                .and_then(|contact| contact.name.as_deref()),
        ),
        field(
            "Date",
            display_date(
                credit_note.date_string.as_deref(),
                credit_note.date.as_deref(),
            ),
        ),
        field("Reference", credit_note.reference.as_deref()),
        field("Total", credit_note.total.map(|total| amount(Some(total)))),
        field(
            "Remaining credit",
            credit_note
                .remaining_credit
                .map(|remaining| amount(Some(remaining))),
        ),
        field("Status", credit_note.status.as_deref()),
    ]
}
