use serde_json::json;
use tracing::info;

use crate::azure::{AzureClient, ManagementApi};
use crate::cli::commands::CheckArgs;
use crate::config::Config;
use crate::errors::RelayError;

pub async fn handle_check(args: CheckArgs, config: &Config) -> Result<(), RelayError> {
    let client = AzureClient::new(config);
    run_check(&client, args.json).await
}

pub(crate) async fn run_check(api: &dyn ManagementApi, as_json: bool) -> Result<(), RelayError> {
    let token = api.acquire_token().await?;
    info!(backend = api.backend_name(), "Credential exchange succeeded");

    let subscriptions = api.list_subscriptions(&token).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&json!({
            "backend": api.backend_name(),
            "subscriptions": subscriptions,
        }))?);
    } else {
        println!("Credentials OK ({} subscriptions visible)", subscriptions.len());
        for sub in &subscriptions {
            println!("  {}  {}", sub.id, sub.display_name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::MockManagementApi;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_check_lists_subscriptions() {
        let mock = MockManagementApi::new().with_subscription("a", "Alpha");
        run_check(&mock, true).await.unwrap();
        assert_eq!(mock.calls.token.load(Ordering::SeqCst), 1);
        assert_eq!(mock.calls.subscriptions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_check_reports_auth_failure() {
        let mock = MockManagementApi::new().with_token_error("invalid_client");
        let err = run_check(&mock, false).await.unwrap_err();
        assert!(matches!(err, RelayError::Authentication(_)));
        assert_eq!(mock.calls.subscriptions.load(Ordering::SeqCst), 0);
    }
}
