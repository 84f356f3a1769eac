use crate::attachments::AttachmentInput;
use crate::handlers::invoices::{self, InvoiceChanges, NewInvoice};
use crate::tools::{
    ToolContext, amount, attachment_lines, check_attachments, display_date, error_result, field,
    join_lines, line_item_lines, parse_args, text_result,
};
use crate::xero::models::{Invoice, InvoiceQuery};
use crate::xero::{AttachmentEndpoint, DeepLinkKind};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct CreateArgs {
    #[serde(flatten)]
    invoice: NewInvoice,
    #[serde(default)]
    attachments: Vec<AttachmentInput>,
}

#[derive(Deserialize)]
struct UpdateArgs {
    #[serde(flatten)]
    changes: InvoiceChanges,
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

    let invoice = match invoices::create_invoice(ctx.api(), args.invoice).await {
        Ok(invoice) => invoice,
        Err(message) => return error_result("creating invoice", message),
    };
    saved(ctx, "Invoice created successfully:", invoice, &args.attachments).await
}

pub async fn update(ctx: &ToolContext, args: &Value) -> Value {
    let args: UpdateArgs = match parse_args(args) {
        Ok(args) => args,
        Err(result) => return result,
    };
    if let Err(result) = check_attachments(&args.attachments) {
        return result;
    }

    let invoice = match invoices::update_invoice(ctx.api(), args.changes).await {
        Ok(invoice) => invoice,
        Err(message) => return error_result("updating invoice", message),
    };
    saved(ctx, "Invoice updated successfully:", invoice, &args.attachments).await
}

pub async fn list(ctx: &ToolContext, args: &Value) -> Value {
    let query: InvoiceQuery = match parse_args(args) {
        Ok(query) => query,
        Err(result) => return result,
    };
    let invoices = match invoices::list_invoices(ctx.api(), query).await {
        Ok(invoices) => invoices,
        Err(message) => return error_result("listing invoices", message),
    };
    if invoices.is_empty() {
        return text_result("No invoices found.");
    }

    let mut blocks = vec![format!("Found {} invoices:", invoices.len())];
    blocks.extend(invoices.iter().map(|invoice| join_lines(summary(invoice))));
    text_result(blocks.join("\n\n"))
}

async fn saved(
    ctx: &ToolContext,
    heading: &str,
    invoice: Invoice,
    attachments: &[AttachmentInput],
) -> Value {
    let id = invoice.invoice_id.as_deref();
    let uploads = ctx.attach(AttachmentEndpoint::Invoices, id, attachments).await;
    let link = ctx
        .link(DeepLinkKind::for_invoice_type(invoice.kind.as_deref()), id)
        .await;

    let mut lines = vec![Some(heading.to_string())];
    lines.extend(summary(&invoice));
    lines.push(line_item_lines(invoice.line_items.as_deref()));
    lines.push(attachment_lines(&uploads));
    lines.push(link);
    text_result(join_lines(lines))
}

fn summary(invoice: &Invoice) -> Vec<Option<String>> {
    vec![
        field("ID", invoice.invoice_id.as_deref()),
        field("Number", invoice.invoice_number.as_deref()),
        field("Type", invoice.kind.as_deref()),
        field(
            "Contact",
            invoice
                .contact
                .as_ref()
                .and_then(|contact| contact.name.as_deref()),
        ),
        field(
            "Date",
            display_date(invoice.date_string.as_deref(), invoice.date.as_deref()),
        ),
        field("Reference", invoice.reference.as_deref()),
        field("Total", invoice.total.map(|total| amount(Some(total)))),
        field("Amount due", invoice.amount_due.map(|due| amount(Some(due)))),
        field("Status", invoice.status.as_deref()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::result_text;
    use crate::xero::fake::{CONTACT_NAME, FakeXero};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;
    use std::sync::Arc;

    fn line_items() -> Value {
        json!([{
            "description": "Consulting",
            "quantity": 2,
            "unitAmount": 50,
            "accountCode": "200",
            "taxType": "NONE"
        }])
    }

    #[tokio::test]
    async fn create_without_attachments_reports_entity() {
        let fake = Arc::new(FakeXero::default());
        let ctx = ToolContext::new(fake.clone());
        let result = create(
            &ctx,
            &json!({ "contactId": "c-1", "lineItems": line_items() }),
        )
        .await;

        let text = result_text(&result);
        assert!(text.starts_with("Invoice created successfully:"));
        assert!(text.contains("ID: inv-0001"));
        assert!(text.contains(&format!("Contact: {CONTACT_NAME}")));
        assert!(text.contains("Total: 100"));
        assert!(text.contains("Status: DRAFT"));
        assert!(!text.contains("Attachments:"));
        assert!(text.contains("Link to view: https://go.xero.com/AccountsReceivable/"));
        assert_eq!(fake.calls(), vec!["create_invoice"]);
    }

    #[tokio::test]
    async fn bill_links_to_payables() {
        let ctx = ToolContext::new(Arc::new(FakeXero::default()));
        let result = create(
            &ctx,
            &json!({ "contactId": "c-1", "type": "ACCPAY", "lineItems": line_items() }),
        )
        .await;
        assert!(result_text(&result).contains("/AccountsPayable/View.aspx?InvoiceID=inv-0001"));
    }

    #[tokio::test]
    async fn partial_attachment_failure_keeps_invoice() {
        let fake = Arc::new(FakeXero::default().fail_attachment("b.txt"));
        let ctx = ToolContext::new(fake.clone());
        let attachments: Vec<Value> = ["a.txt", "b.txt", "c.txt"]
            .iter()
            .map(|name| json!({ "fileName": name, "base64Content": STANDARD.encode(name) }))
            .collect();

        let result = create(
            &ctx,
            &json!({
                "contactId": "c-1",
                "lineItems": line_items(),
                "attachments": attachments
            }),
        )
        .await;

        let text = result_text(&result);
        assert!(text.contains("ID: inv-0001"));
        assert!(text.contains(
            "Attachments:\n- a.txt: uploaded\n- b.txt: failed (Attachment b.txt was rejected)\n- c.txt: uploaded"
        ));
        let uploaded: Vec<String> = fake.uploads().into_iter().map(|(_, _, name)| name).collect();
        assert_eq!(uploaded, vec!["a.txt", "c.txt"]);
    }

    #[tokio::test]
    async fn remote_error_skips_attachments_and_link() {
        let fake = Arc::new(FakeXero::default().reject_with(
            400,
            r#"{"Elements":[{"ValidationErrors":[{"Message":"Account code '999' is not valid"}]}]}"#,
        ));
        let ctx = ToolContext::new(fake.clone());
        let result = create(
            &ctx,
            &json!({
                "contactId": "c-1",
                "lineItems": line_items(),
                "attachments": [{ "fileName": "a.txt", "base64Content": "YQ==" }]
            }),
        )
        .await;

        assert_eq!(
            result_text(&result),
            "Error creating invoice: Account code '999' is not valid"
        );
        assert_eq!(fake.calls(), vec!["create_invoice"]);
    }

    #[tokio::test]
    async fn malformed_attachment_is_rejected_before_create() {
        let fake = Arc::new(FakeXero::default());
        let ctx = ToolContext::new(fake.clone());
        let result = create(
            &ctx,
            &json!({
                "contactId": "c-1",
                "lineItems": line_items(),
                "attachments": [{ "base64Content": "YQ==" }]
            }),
        )
        .await;

        assert!(result_text(&result).starts_with("Error parsing arguments: attachments[0]"));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_required_field_is_text() {
        let ctx = ToolContext::new(Arc::new(FakeXero::default()));
        let result = create(&ctx, &json!({ "lineItems": line_items() })).await;
        let text = result_text(&result);
        assert!(text.starts_with("Error parsing arguments:"));
        assert!(text.contains("contactId"));
    }

    #[tokio::test]
    async fn update_lists_replacement_lines() {
        let ctx = ToolContext::new(Arc::new(FakeXero::default()));
        let result = update(
            &ctx,
            &json!({ "invoiceId": "inv-9", "lineItems": line_items() }),
        )
        .await;
        let text = result_text(&result);
        assert!(text.starts_with("Invoice updated successfully:"));
        assert!(text.contains("ID: inv-9"));
        assert!(text.contains("- Consulting (account 200): 2 x 50 = 100"));
    }

    #[tokio::test]
    async fn list_formats_each_invoice() {
        let ctx = ToolContext::new(Arc::new(FakeXero::default()));
        let result = list(&ctx, &json!({ "contactIds": ["c-1"] })).await;
        let text = result_text(&result);
        assert!(text.starts_with("Found 1 invoices:"));
        assert!(text.contains("Number: INV-0001"));
        assert!(text.contains("Amount due: 115"));
    }
}
