use crate::handlers::{XeroResponse, with_client};
use crate::xero::XeroApi;
use crate::xero::models::{Contact, ContactQuery, Phone};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactDetails {
    fn into_contact(self, contact_id: Option<String>) -> Contact {
        Contact {
            contact_id,
            name: self.name,
            first_name: self.first_name,
            last_name: self.last_name,
            email_address: self.email,
            phones: self.phone.map(|number| {
                vec![Phone {
                    phone_type: Some("MOBILE".to_string()),
                    phone_number: Some(number),
                }]
            }),
            ..Contact::default()
        }
    }
}

pub async fn create_contact(api: &dyn XeroApi, details: ContactDetails) -> XeroResponse<Contact> {
    let contact = details.into_contact(None);
    with_client(api, "create contact", |api| async move {
        api.create_contact(&contact).await
    })
    .await
}

pub async fn update_contact(
    api: &dyn XeroApi,
    contact_id: String,
    details: ContactDetails,
) -> XeroResponse<Contact> {
    let contact = details.into_contact(Some(contact_id.clone()));
    with_client(api, "update contact", |api| async move {
        api.update_contact(&contact_id, &contact).await
    })
    .await
}

pub async fn list_contacts(api: &dyn XeroApi, query: ContactQuery) -> XeroResponse<Vec<Contact>> {
    with_client(api, "list contacts", |api| async move {
        api.list_contacts(&query).await
    })
    .await
}
