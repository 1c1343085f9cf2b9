use std::fmt;

use async_trait::async_trait;

use crate::errors::RelayError;
use crate::models::{DateRange, Subscription};
use super::types::{Pricing, QueryResult};

/// Bearer token for the management plane. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken([REDACTED; {} bytes])", self.0.len())
    }
}

/// The management-plane operations the aggregator depends on.
///
/// Every call reports failure through `Err` so callers can apply their own
/// tolerance policy per path.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// Exchange the configured service credentials for a bearer token.
    async fn acquire_token(&self) -> Result<AccessToken, RelayError>;

    /// Subscriptions visible to the credential.
    async fn list_subscriptions(&self, token: &AccessToken) -> Result<Vec<Subscription>, RelayError>;

    /// Actual cost grouped by meter category, meter subcategory, service
    /// name and resource group.
    async fn query_costs(
        &self,
        token: &AccessToken,
        subscription_id: &str,
        range: &DateRange,
    ) -> Result<QueryResult, RelayError>;

    /// Actual cost grouped by resource id and meter subcategory.
    async fn query_resource_costs(
        &self,
        token: &AccessToken,
        subscription_id: &str,
        range: &DateRange,
    ) -> Result<QueryResult, RelayError>;

    /// Defender for Cloud pricing configuration.
    async fn list_pricings(
        &self,
        token: &AccessToken,
        subscription_id: &str,
    ) -> Result<Vec<Pricing>, RelayError>;

    /// Backend name for logging
    fn backend_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AccessToken::new("eyJ0eXAiOiJKV1QiLCJhbGciOi");
        let out = format!("{:?}", token);
        assert!(!out.contains("eyJ0"));
        assert!(out.contains("REDACTED"));
        assert_eq!(token.secret(), "eyJ0eXAiOiJKV1QiLCJhbGciOi");
    }
}
