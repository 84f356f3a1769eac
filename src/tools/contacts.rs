use crate::handlers::contacts::{self, ContactDetails};
use crate::tools::{ToolContext, error_result, field, join_lines, parse_args, text_result};
use crate::xero::DeepLinkKind;
use crate::xero::models::{Contact, ContactQuery};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateArgs {
    contact_id: String,
    #[serde(flatten)]
    details: ContactDetails,
}

pub async fn create(ctx: &ToolContext, args: &Value) -> Value {
    let details: ContactDetails = match parse_args(args) {
        Ok(details) => details,
        Err(result) => return result,
    };
    if details.name.as_deref().is_none_or(|name| name.trim().is_empty()) {
        return error_result("parsing arguments", "name is required");
    }

    let contact = match contacts::create_contact(ctx.api(), details).await {
        Ok(contact) => contact,
        Err(message) => return error_result("creating contact", message),
    };
    saved(ctx, "Contact created successfully:", contact).await
}

pub async fn update(ctx: &ToolContext, args: &Value) -> Value {
    let args: UpdateArgs = match parse_args(args) {
        Ok(args) => args,
        Err(result) => return result,
    };
    let contact = match contacts::update_contact(ctx.api(), args.contact_id, args.details).await {
        Ok(contact) => contact,
        Err(message) => return error_result("updating contact", message),
    };
    saved(ctx, "Contact updated successfully:", contact).await
}

pub async fn list(ctx: &ToolContext, args: &Value) -> Value {
    let query: ContactQuery = match parse_args(args) {
        Ok(query) => query,
        Err(result) => return result,
    };
    let contacts = match contacts::list_contacts(ctx.api(), query).await {
        Ok(contacts) => contacts,
        Err(message) => return error_result("listing contacts", message),
    };
    if contacts.is_empty() {
        return text_result("No contacts found.");
    }

    let mut blocks = vec![format!("Found {} contacts:", contacts.len())];
    blocks.extend(contacts.iter().map(|contact| join_lines(summary(contact))));
    text_result(blocks.join("\n\n"))
}

async fn saved(ctx: &ToolContext, heading: &str, contact: Contact) -> Value {
    let link = ctx
        .link(DeepLinkKind::Contact, contact.contact_id.as_deref())
        .await;
    let mut lines = vec![Some(heading.to_string())];
    lines.extend(summary(&contact));
    lines.push(link);
    text_result(join_lines(lines))
}

fn summary(contact: &Contact) -> Vec<Option<String>> {
    let phone = contact
        .phones
        .iter()
        .flatten()
        .find_map(|phone| phone.phone_number.as_deref())
        .filter(|number| !number.is_empty());
    let person = match (contact.first_name.as_deref(), contact.last_name.as_deref()) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    };
    vec![
        field("ID", contact.contact_id.as_deref()),
        field("Name", contact.name.as_deref()),
        field("Person", person),
        field("Email", contact.email_address.as_deref()),
        field("Phone", phone),
        field("Status", contact.contact_status.as_deref()),
    ]
}
