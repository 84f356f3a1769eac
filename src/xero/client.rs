//! Reqwest-backed [`XeroApi`] implementation.

use crate::config::XeroConfig;
use crate::xero::models::{
    Account, Attachment, BankTransaction, BankTransactionQuery, Contact, ContactQuery, CreditNote,
    CreditNoteQuery, Invoice, InvoiceQuery, ManualJournal, ManualJournalQuery, Organisation,
};
use crate::xero::{AttachmentEndpoint, XeroApi, XeroError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OnceCell};

const TENANT_HEADER: &str = "xero-tenant-id";
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

pub struct XeroClient {
    http: Client,
    config: XeroConfig,
    session: Mutex<Option<Session>>,
    short_code: OnceCell<Option<String>>,
}

#[derive(Clone)]
struct Session {
    access_token: String,
    tenant_id: String,
    expires_at: Option<Instant>,
}

impl Session {
    fn is_fresh(&self) -> bool {
        self.expires_at
            .is_none_or(|expires_at| Instant::now() + TOKEN_REFRESH_MARGIN < expires_at)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection {
    tenant_id: String,
    tenant_type: Option<String>,
}

impl XeroClient {
    pub fn new(config: XeroConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            config,
            session: Mutex::new(None),
            short_code: OnceCell::new(),
        })
    }

    async fn session(&self) -> Result<Session, XeroError> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref().filter(|session| session.is_fresh()) {
            return Ok(session.clone());
        }

        let (access_token, expires_at) = match self.config.bearer_token() {
            Some(token) => (token.to_string(), None),
            None => self.request_token().await?,
        };
        let tenant_id = match self.config.tenant_id() {
            Some(tenant_id) => tenant_id.to_string(),
            None => self.resolve_tenant(&access_token).await?,
        };

        let session = Session {
            access_token,
            tenant_id,
            expires_at,
        };
        *guard = Some(session.clone());
        Ok(session)
    }

    async fn request_token(&self) -> Result<(String, Option<Instant>), XeroError> {
        let Some((client_id, client_secret)) = self.config.client_credentials() else {
            return Err(XeroError::NotConfigured);
        };
        tracing::debug!("requesting Xero access token");

        let response = self
            .http
            .post(&self.config.identity_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", self.config.scopes.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(XeroError::Auth(format!(
                "token request returned {status}: {}",
                body.trim()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| XeroError::Decode(err.to_string()))?;
        let expires_at = token
            .expires_in
            .map(|seconds| Instant::now() + Duration::from_secs(seconds));
        Ok((token.access_token, expires_at))
    }

    async fn resolve_tenant(&self, access_token: &str) -> Result<String, XeroError> {
        let response = self
            .http
            .get(&self.config.connections_url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let connections: Vec<Connection> = decode(read_json(response).await?)?;

        let organisation = connections
            .iter()
            .find(|connection| connection.tenant_type.as_deref() == Some("ORGANISATION"));
        organisation
            .or(connections.first())
            .map(|connection| connection.tenant_id.clone())
            .ok_or(XeroError::NoTenant)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, XeroError> {
        let session = self.session().await?;
        let mut builder = self
            .http
            .request(method, self.url(path))
            .bearer_auth(&session.access_token)
            .header(TENANT_HEADER, &session.tenant_id)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        read_json(builder.send().await?).await
    }

    async fn save<T>(
        &self,
        method: Method,
        path: &str,
        key: &'static str,
        entity: &T,
    ) -> Result<T, XeroError>
    where
        T: Serialize + DeserializeOwned,
    {
        let entity = serde_json::to_value(entity).map_err(|err| XeroError::Decode(err.to_string()))?;
        let mut body = Map::new();
        body.insert(key.to_string(), Value::Array(vec![entity]));

        let response = self
            .request(method, path, &[], Some(Value::Object(body)))
            .await?;
        entities::<T>(response, key)?
            .into_iter()
            .next()
            .ok_or(XeroError::MissingEntity(key))
    }

    async fn list<T>(
        &self,
        path: &str,
        key: &'static str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, XeroError>
    where
        T: DeserializeOwned,
    {
        let response = self.request(Method::GET, path, query, None).await?;
        entities(response, key)
    }

    /// `Ok(None)` when the organisation has no short code; only transport or
    /// API failures are errors, so an absent code is fetched once.
    async fn fetch_short_code(&self) -> Result<Option<String>, XeroError> {
        let organisations: Vec<Organisation> =
            self.list("Organisation", "Organisations", &[]).await?;
        Ok(organisations
            .into_iter()
            .find_map(|organisation| organisation.short_code)
            .filter(|code| !code.trim().is_empty()))
    }
}

#[async_trait]
impl XeroApi for XeroClient {
    async fn authenticate(&self) -> Result<(), XeroError> {
        self.session().await.map(|_| ())
    }

    async fn create_invoice(&self, invoice: &Invoice) -> Result<Invoice, XeroError> {
        self.save(Method::PUT, "Invoices", "Invoices", invoice).await
    }

    async fn update_invoice(
        &self,
        invoice_id: &str,
        invoice: &Invoice,
    ) -> Result<Invoice, XeroError> {
        let path = format!("Invoices/{}", urlencoding::encode(invoice_id));
        self.save(Method::POST, &path, "Invoices", invoice).await
    }

    async fn list_invoices(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>, XeroError> {
        let mut params = page_param(query.page);
        if !query.contact_ids.is_empty() {
            params.push(("ContactIDs", query.contact_ids.join(",")));
        }
        if !query.invoice_numbers.is_empty() {
            params.push(("InvoiceNumbers", query.invoice_numbers.join(",")));
        }
        self.list("Invoices", "Invoices", &params).await
    }

    async fn create_credit_note(&self, credit_note: &CreditNote) -> Result<CreditNote, XeroError> {
        self.save(Method::PUT, "CreditNotes", "CreditNotes", credit_note)
            .await
    }

    async fn update_credit_note(
        &self,
        credit_note_id: &str,
        credit_note: &CreditNote,
    ) -> Result<CreditNote, XeroError> {
        let path = format!("CreditNotes/{}", urlencoding::encode(credit_note_id));
        self.save(Method::POST, &path, "CreditNotes", credit_note)
            .await
    }

    async fn list_credit_notes(
        &self,
        query: &CreditNoteQuery,
    ) -> Result<Vec<CreditNote>, XeroError> {
        let mut params = page_param(query.page);
        if let Some(contact_id) = &query.contact_id {
            params.push(("where", format!("Contact.ContactID=guid(\"{contact_id}\")")));
        }
        self.list("CreditNotes", "CreditNotes", &params).await
    }

    async fn create_bank_transaction(
        &self,
        transaction: &BankTransaction,
    ) -> Result<BankTransaction, XeroError> {
        self.save(Method::PUT, "BankTransactions", "BankTransactions", transaction)
            .await
    }

    async fn update_bank_transaction(
        &self,
        bank_transaction_id: &str,
        transaction: &BankTransaction,
    ) -> Result<BankTransaction, XeroError> {
        let path = format!(
            "BankTransactions/{}",
            urlencoding::encode(bank_transaction_id)
        );
        self.save(Method::POST, &path, "BankTransactions", transaction)
            .await
    }

    async fn list_bank_transactions(
        &self,
        query: &BankTransactionQuery,
    ) -> Result<Vec<BankTransaction>, XeroError> {
        let mut params = page_param(query.page);
        if let Some(account_id) = &query.bank_account_id {
            params.push((
                "where",
                format!("BankAccount.AccountID=guid(\"{account_id}\")"),
            ));
        }
        self.list("BankTransactions", "BankTransactions", &params)
            .await
    }

    async fn create_manual_journal(
        &self,
        journal: &ManualJournal,
    ) -> Result<ManualJournal, XeroError> {
        self.save(Method::PUT, "ManualJournals", "ManualJournals", journal)
            .await
    }

    async fn update_manual_journal(
        &self,
        manual_journal_id: &str,
        journal: &ManualJournal,
    ) -> Result<ManualJournal, XeroError> {
        let path = format!("ManualJournals/{}", urlencoding::encode(manual_journal_id));
        self.save(Method::POST, &path, "ManualJournals", journal)
            .await
    }

    async fn list_manual_journals(
        &self,
        query: &ManualJournalQuery,
    ) -> Result<Vec<ManualJournal>, XeroError> {
        let params = page_param(query.page);
        self.list("ManualJournals", "ManualJournals", &params).await
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, XeroError> {
        self.list("Accounts", "Accounts", &[]).await
    }

    async fn create_contact(&self, contact: &Contact) -> Result<Contact, XeroError> {
        self.save(Method::PUT, "Contacts", "Contacts", contact).await
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        contact: &Contact,
    ) -> Result<Contact, XeroError> {
        let path = format!("Contacts/{}", urlencoding::encode(contact_id));
        self.save(Method::POST, &path, "Contacts", contact).await
    }

    async fn list_contacts(&self, query: &ContactQuery) -> Result<Vec<Contact>, XeroError> {
        let mut params = page_param(query.page);
        if let Some(term) = query.search_term.as_deref().filter(|term| !term.is_empty()) {
            params.push(("searchTerm", term.to_string()));
        }
        self.list("Contacts", "Contacts", &params).await
    }

    async fn upload_attachment(
        &self,
        endpoint: AttachmentEndpoint,
        resource_id: &str,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Attachment, XeroError> {
        let session = self.session().await?;
        let path = format!(
            "{}/{}/Attachments/{}",
            endpoint.as_path(),
            urlencoding::encode(resource_id),
            urlencoding::encode(file_name)
        );
        let mut builder = self
            .http
            .put(self.url(&path))
            .bearer_auth(&session.access_token)
            .header(TENANT_HEADER, &session.tenant_id)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, mime_type)
            .body(bytes);
        if endpoint.include_online() {
            builder = builder.query(&[("IncludeOnline", "true")]);
        }

        let response = read_json(builder.send().await?).await?;
        entities::<Attachment>(response, "Attachments")?
            .into_iter()
            .next()
            .ok_or(XeroError::MissingEntity("Attachments"))
    }

    async fn short_code(&self) -> Option<String> {
        match self
            .short_code
            .get_or_try_init(|| self.fetch_short_code())
            .await
        {
            Ok(code) => code.clone(),
            Err(err) => {
                tracing::debug!(error = %err, "organisation short code unavailable");
                None
            }
        }
    }
}

async fn read_json(response: Response) -> Result<Value, XeroError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(XeroError::Api {
            status: status.as_u16(),
            body,
        });
    }
    response
        .json()
        .await
        .map_err(|err| XeroError::Decode(err.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, XeroError> {
    serde_json::from_value(value).map_err(|err| XeroError::Decode(err.to_string()))
}

fn entities<T: DeserializeOwned>(mut response: Value, key: &'static str) -> Result<Vec<T>, XeroError> {
    let Some(items) = response.get_mut(key).map(Value::take) else {
        return Err(XeroError::MissingEntity(key));
    };
    decode(items)
}

fn page_param(page: Option<u32>) -> Vec<(&'static str, String)> {
    vec![("page", page.unwrap_or(1).to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SCOPES;
    use mockito::Matcher;
    use serde_json::json;

    fn config(server: &mockito::Server) -> XeroConfig {
        XeroConfig {
            client_id: Some("client".to_string()),
            client_secret: Some("secret".to_string()),
            bearer_token: None,
            tenant_id: None,
            scopes: DEFAULT_SCOPES.to_string(),
            api_url: format!("{}/api.xro/2.0", server.url()),
            identity_url: format!("{}/connect/token", server.url()),
            connections_url: format!("{}/connections", server.url()),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn client_credentials_then_tenant_lookup_once() {
        let mut server = mockito::Server::new_async().await;
        let token = server
            .mock("POST", "/connect/token")
            .match_body(Matcher::UrlEncoded(
                "grant_type".into(),
                "client_credentials".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"tok-1","expires_in":1800,"token_type":"Bearer"}"#)
            .expect(1)
            .create_async()
            .await;
        let connections = server
            .mock("GET", "/connections")
            .match_header("authorization", "Bearer tok-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"tenantId":"tenant-1","tenantType":"ORGANISATION"}]"#)
            .expect(1)
            .create_async()
            .await;
        let accounts = server
            .mock("GET", "/api.xro/2.0/Accounts")
            .match_header("authorization", "Bearer tok-1")
            .match_header("xero-tenant-id", "tenant-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"Accounts":[{"AccountID":"a-1","Code":"200","Name":"Sales","Type":"REVENUE"}]}"#)
            .expect(2)
            .create_async()
            .await;

        let client = XeroClient::new(config(&server)).expect("client");
        client.authenticate().await.expect("authenticated");
        let first = client.list_accounts().await.expect("accounts");
        let second = client.list_accounts().await.expect("accounts");

        assert_eq!(first, second);
        assert_eq!(first[0].code.as_deref(), Some("200"));
        token.assert_async().await;
        connections.assert_async().await;
        accounts.assert_async().await;
    }

    #[tokio::test]
    async fn missing_credentials_are_reported() {
        let server = mockito::Server::new_async().await;
        let mut config = config(&server);
        config.client_secret = None;

        let client = XeroClient::new(config).expect("client");
        let err = client.authenticate().await.expect_err("error");
        assert!(matches!(err, XeroError::NotConfigured));
    }

    #[tokio::test]
    async fn create_invoice_wraps_payload_in_collection() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api.xro/2.0/Invoices")
            .match_header("authorization", "Bearer static")
            .match_header("xero-tenant-id", "tenant-9")
            .match_body(Matcher::PartialJson(json!({
                "Invoices": [{ "Type": "ACCREC", "Contact": { "ContactID": "c-1" } }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "Invoices": [{
                        "InvoiceID": "inv-1",
                        "Type": "ACCREC",
                        "Contact": { "ContactID": "c-1", "Name": "Acme Ltd" },
                        "Status": "DRAFT",
                        "Total": 115.0
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let mut config = config(&server);
        config.bearer_token = Some("static".to_string());
        config.tenant_id = Some("tenant-9".to_string());
        let client = XeroClient::new(config).expect("client");

        let invoice = Invoice {
            kind: Some("ACCREC".to_string()),
            contact: Some(Contact::reference("c-1")),
            ..Invoice::default()
        };
        let created = client.create_invoice(&invoice).await.expect("created");
        assert_eq!(created.invoice_id.as_deref(), Some("inv-1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_errors_keep_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api.xro/2.0/Contacts/c-1")
            .with_status(400)
            .with_body(r#"{"Message":"Contact name already in use"}"#)
            .create_async()
            .await;

        let mut config = config(&server);
        config.bearer_token = Some("static".to_string());
        config.tenant_id = Some("tenant-9".to_string());
        let client = XeroClient::new(config).expect("client");

        let err = client
            .update_contact("c-1", &Contact::default())
            .await
            .expect_err("error");
        match err {
            XeroError::Api { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("already in use"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn attachment_upload_sends_raw_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api.xro/2.0/Invoices/inv-1/Attachments/my%20receipt.pdf")
            .match_query(Matcher::UrlEncoded("IncludeOnline".into(), "true".into()))
            .match_header("content-type", "application/pdf")
            .match_body(Matcher::Exact("%PDF".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"Attachments":[{"AttachmentID":"att-1","FileName":"my receipt.pdf","MimeType":"application/pdf","ContentLength":4}]}"#,
            )
            .create_async()
            .await;

        let mut config = config(&server);
        config.bearer_token = Some("static".to_string());
        config.tenant_id = Some("tenant-9".to_string());
        let client = XeroClient::new(config).expect("client");

        let attachment = client
            .upload_attachment(
                AttachmentEndpoint::Invoices,
                "inv-1",
                "my receipt.pdf",
                "application/pdf",
                b"%PDF".to_vec(),
            )
            .await
            .expect("uploaded");
        assert_eq!(attachment.attachment_id.as_deref(), Some("att-1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_short_code_is_fetched_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api.xro/2.0/Organisation")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"Organisations":[{"Name":"Demo Co"}]}"#)
            .expect(1)
            .create_async()
            .await;

        let mut config = config(&server);
        config.bearer_token = Some("static".to_string());
        config.tenant_id = Some("tenant-9".to_string());
        let client = XeroClient::new(config).expect("client");

        for _ in 0..3 {
            assert_eq!(client.short_code().await, None);
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn short_code_is_cached_and_optional() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api.xro/2.0/Organisation")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"Organisations":[{"Name":"Demo Co","ShortCode":"!ab12C"}]}"#)
            .expect(1)
            .create_async()
            .await;

        let mut config = config(&server);
        config.bearer_token = Some("static".to_string());
        config.tenant_id = Some("tenant-9".to_string());
        let client = XeroClient::new(config).expect("client");

        assert_eq!(client.short_code().await.as_deref(), Some("!ab12C"));
        assert_eq!(client.short_code().await.as_deref(), Some("!ab12C"));
        mock.assert_async().await;
    }
}
