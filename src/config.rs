use clap::Args;

pub const DEFAULT_API_URL: &str = "https://api.xero.com/api.xro/2.0";
pub const DEFAULT_IDENTITY_URL: &str = "https://identity.xero.com/connect/token";
pub const DEFAULT_CONNECTIONS_URL: &str = "https://api.xero.com/connections";
pub const DEFAULT_SCOPES: &str = "accounting.transactions accounting.contacts \
                                  accounting.settings accounting.attachments";

/// Xero connection settings. Every flag falls back to its environment variable.
#[derive(Args, Clone, Default)]
pub struct XeroConfig {
    /// Custom connection client id
    #[arg(long, env = "XERO_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,
    /// Custom connection client secret
    #[arg(long, env = "XERO_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
    /// Pre-issued access token, used instead of the client credentials grant
    #[arg(long, env = "XERO_CLIENT_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,
    /// Tenant to address; looked up from the connections endpoint when unset
    #[arg(long, env = "XERO_TENANT_ID")]
    pub tenant_id: Option<String>,
    /// Space-separated scopes requested with client credentials
    #[arg(long, env = "XERO_SCOPES", default_value = DEFAULT_SCOPES)]
    pub scopes: String,
    #[arg(long, env = "XERO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
    #[arg(long, env = "XERO_IDENTITY_URL", default_value = DEFAULT_IDENTITY_URL)]
    pub identity_url: String,
    #[arg(long, env = "XERO_CONNECTIONS_URL", default_value = DEFAULT_CONNECTIONS_URL)]
    pub connections_url: String,
    /// HTTP request timeout in seconds
    #[arg(long, env = "XERO_HTTP_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,
}

impl XeroConfig {
    pub fn client_credentials(&self) -> Option<(&str, &str)> {
        match (present(&self.client_id), present(&self.client_secret)) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        present(&self.bearer_token)
    }

    pub fn tenant_id(&self) -> Option<&str> {
        present(&self.tenant_id)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_count_as_missing() {
        let config = XeroConfig {
            client_id: Some("id".to_string()),
            client_secret: Some("  ".to_string()),
            bearer_token: Some(String::new()),
            tenant_id: Some(" t-1 ".to_string()),
            ..XeroConfig::default()
        };
        assert_eq!(config.client_credentials(), None);
        assert_eq!(config.bearer_token(), None);
        assert_eq!(config.tenant_id(), Some("t-1"));
    }
}
