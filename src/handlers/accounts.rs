use crate::handlers::{XeroResponse, with_client};
use crate::xero::XeroApi;
use crate::xero::models::Account;

pub async fn list_accounts(api: &dyn XeroApi) -> XeroResponse<Vec<Account>> {
    with_client(api, "list accounts", |api| async move { api.list_accounts().await }).await
}
