pub mod credentials;

pub use credentials::Credentials;

use crate::errors::RelayError;
use credentials::resolve_required;

pub const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";
pub const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "AZURE_CLIENT_SECRET";
pub const AUTHORITY_HOST_VAR: &str = "AZURE_AUTHORITY_HOST";
pub const MANAGEMENT_ENDPOINT_VAR: &str = "AZURE_MANAGEMENT_ENDPOINT";

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

/// Process configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub authority_host: String,
    pub management_endpoint: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup. All missing
    /// required variables are reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tenant_id = resolve_required(&lookup, TENANT_ID_VAR);
        let client_id = resolve_required(&lookup, CLIENT_ID_VAR);
        let client_secret = resolve_required(&lookup, CLIENT_SECRET_VAR);

        let (tenant_id, client_id, client_secret) = match (tenant_id, client_id, client_secret) {
            (Some(t), Some(c), Some(s)) => (t, c, s),
            (t, c, s) => {
                let missing: Vec<&str> = [
                    (t.is_none(), TENANT_ID_VAR),
                    (c.is_none(), CLIENT_ID_VAR),
                    (s.is_none(), CLIENT_SECRET_VAR),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();
                return Err(RelayError::Config(format!(
                    "missing required environment variables: {}",
                    missing.join(", ")
                )));
            }
        };

        let authority_host = lookup(AUTHORITY_HOST_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string());
        let management_endpoint = lookup(MANAGEMENT_ENDPOINT_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MANAGEMENT_ENDPOINT.to_string());

        Ok(Self {
            credentials: Credentials {
                tenant_id,
                client_id,
                client_secret,
            },
            authority_host: authority_host.trim().trim_end_matches('/').to_string(),
            management_endpoint: management_endpoint.trim().trim_end_matches('/').to_string(),
        })
    }

    /// OAuth2 scope requested for management-plane tokens.
    pub fn management_scope(&self) -> String {
        format!("{}/.default", self.management_endpoint)
    }
}
