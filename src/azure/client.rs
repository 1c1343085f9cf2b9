use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::credentials::redact_credentials;
use crate::config::Config;
use crate::errors::RelayError;
use crate::models::{DateRange, Subscription};
use super::provider::{AccessToken, ManagementApi};
use super::types::{
    cost_query_body, Pricing, PricingList, QueryResult, SubscriptionPage, TokenErrorResponse,
    TokenResponse, COST_GROUPING, COST_MANAGEMENT_API_VERSION, RESOURCE_GROUPING,
    SECURITY_PRICINGS_API_VERSION, SUBSCRIPTIONS_API_VERSION,
};

const CLIENT_REQUEST_ID_HEADER: &str = "x-ms-client-request-id";

/// Upper bound on `nextLink` pages followed for a single listing or query.
pub const MAX_PAGES: usize = 1000;

/// Tracks `nextLink` pagination and refuses links that repeat or exceed
/// [`MAX_PAGES`].
struct Pager {
    operation: &'static str,
    seen: HashSet<String>,
}

impl Pager {
    fn new(operation: &'static str, first: &str) -> Self {
        let mut seen = HashSet::new();
        seen.insert(first.to_string());
        Self { operation, seen }
    }

    fn next(&mut self, link: Option<String>) -> Result<Option<String>, RelayError> {
        let Some(link) = link.filter(|l| !l.is_empty()) else {
            return Ok(None);
        };
        if self.seen.len() >= MAX_PAGES {
            return Err(RelayError::UpstreamQuery(format!(
                "{} exceeded {} pages",
                self.operation, MAX_PAGES
            )));
        }
        if !self.seen.insert(link.clone()) {
            return Err(RelayError::UpstreamQuery(format!(
                "{} returned a repeated nextLink",
                self.operation
            )));
        }
        Ok(Some(link))
    }
}

/// Azure Resource Manager client backed by reqwest.
pub struct AzureClient {
    client: Client,
    config: Config,
}

impl AzureClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.authority_host, self.config.credentials.tenant_id
        )
    }

    fn subscriptions_url(&self) -> String {
        format!(
            "{}/subscriptions?api-version={}",
            self.config.management_endpoint, SUBSCRIPTIONS_API_VERSION
        )
    }

    fn cost_query_url(&self, subscription_id: &str) -> String {
        format!(
            "{}/subscriptions/{}/providers/Microsoft.CostManagement/query?api-version={}",
            self.config.management_endpoint, subscription_id, COST_MANAGEMENT_API_VERSION
        )
    }

    fn pricings_url(&self, subscription_id: &str) -> String {
        format!(
            "{}/subscriptions/{}/providers/Microsoft.Security/pricings?api-version={}",
            self.config.management_endpoint, subscription_id, SECURITY_PRICINGS_API_VERSION
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        url: &str,
        operation: &str,
    ) -> Result<T, RelayError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!(operation, request_id = %request_id, "GET management API");

        let resp = self
            .client
            .get(url)
            .bearer_auth(token.secret())
            .header(CLIENT_REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(|e| RelayError::Network(format!("{} request failed: {}", operation, e)))?;

        parse_management_response(resp, operation).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        url: &str,
        body: &Value,
        operation: &str,
    ) -> Result<T, RelayError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!(operation, request_id = %request_id, "POST management API");

        let resp = self
            .client
            .post(url)
            .bearer_auth(token.secret())
            .header(CLIENT_REQUEST_ID_HEADER, &request_id)
            .json(body)
            .send()
            .await
            .map_err(|e| RelayError::Network(format!("{} request failed: {}", operation, e)))?;

        parse_management_response(resp, operation).await
    }

    async fn query(
        &self,
        token: &AccessToken,
        subscription_id: &str,
        range: &DateRange,
        grouping: &[&str],
        operation: &'static str,
    ) -> Result<QueryResult, RelayError> {
        let body = cost_query_body(range, grouping);
        let first_url = self.cost_query_url(subscription_id);
        let mut pager = Pager::new(operation, &first_url);

        let mut result: QueryResult = self.post_json(token, &first_url, &body, operation).await?;
        let mut next = pager.next(result.properties.next_link.take())?;
        let mut pages: usize = 1;

        while let Some(url) = next {
            let mut page: QueryResult = self.post_json(token, &url, &body, operation).await?;
            result.properties.rows.append(&mut page.properties.rows);
            if result.properties.columns.is_empty() {
                result.properties.columns = page.properties.columns;
            }
            next = pager.next(page.properties.next_link.take())?;
            pages += 1;
        }

        debug!(
            operation,
            subscription_id,
            pages,
            rows = result.properties.rows.len(),
            "Cost query complete"
        );
        Ok(result)
    }
}

/// The identity platform answers bad credentials or an unknown tenant with
/// 400, 401 or 403; anything else is an availability problem.
fn is_credential_rejection(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    )
}

/// Decode a management-plane response, turning non-2xx statuses into
/// `UpstreamQuery` errors carrying the upstream error message.
async fn parse_management_response<T: DeserializeOwned>(
    resp: Response,
    operation: &str,
) -> Result<T, RelayError> {
    let status = resp.status();
    if !status.is_success() {
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        let message = body["error"]["message"]
            .as_str()
            .or_else(|| body["error"]["code"].as_str())
            .unwrap_or("no error body");
        return Err(RelayError::UpstreamQuery(format!(
            "{} returned {}: {}",
            operation, status, message
        )));
    }

    resp.json::<T>()
        .await
        .map_err(|e| RelayError::UpstreamQuery(format!("Failed to parse {} response: {}", operation, e)))
}

#[async_trait]
impl ManagementApi for AzureClient {
    async fn acquire_token(&self) -> Result<AccessToken, RelayError> {
        let creds = &self.config.credentials;
        let scope = self.config.management_scope();
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("scope", scope.as_str()),
        ];

        let resp = self
            .client
            .post(self.token_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| RelayError::Network(format!("Token request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body: TokenErrorResponse = resp.json().await.unwrap_or_default();
            let detail = body
                .error_description
                .or(body.error)
                .unwrap_or_else(|| status.to_string());
            let detail = redact_credentials(&detail, &[creds.client_secret.as_str()]);
            let message = format!("token endpoint returned {}: {}", status, detail);
            return Err(if is_credential_rejection(status) {
                warn!(status = %status, "Credential exchange rejected");
                RelayError::Authentication(message)
            } else {
                warn!(status = %status, "Token endpoint unavailable");
                RelayError::UpstreamQuery(message)
            });
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| RelayError::Authentication(format!("Failed to parse token response: {}", e)))?;
        debug!(
            token_type = token.token_type.as_deref().unwrap_or("Bearer"),
            expires_in = token.expires_in,
            "Acquired management token"
        );

        Ok(AccessToken::new(token.access_token))
    }

    async fn list_subscriptions(&self, token: &AccessToken) -> Result<Vec<Subscription>, RelayError> {
        let mut subscriptions = Vec::new();
        let first_url = self.subscriptions_url();
        let mut pager = Pager::new("List subscriptions", &first_url);
        let mut next = Some(first_url);

        while let Some(url) = next {
            let page: SubscriptionPage = self.get_json(token, &url, "List subscriptions").await?;
            subscriptions.extend(page.value.into_iter().map(Subscription::from));
            next = pager.next(page.next_link)?;
        }

        debug!(count = subscriptions.len(), "Listed subscriptions");
        Ok(subscriptions)
    }

    async fn query_costs(
        &self,
        token: &AccessToken,
        subscription_id: &str,
        range: &DateRange,
    ) -> Result<QueryResult, RelayError> {
        self.query(token, subscription_id, range, &COST_GROUPING, "Cost query")
            .await
    }

    async fn query_resource_costs(
        &self,
        token: &AccessToken,
        subscription_id: &str,
        range: &DateRange,
    ) -> Result<QueryResult, RelayError> {
        self.query(token, subscription_id, range, &RESOURCE_GROUPING, "Resource cost query")
            .await
    }

    async fn list_pricings(
        &self,
        token: &AccessToken,
        subscription_id: &str,
    ) -> Result<Vec<Pricing>, RelayError> {
        let list: PricingList = self
            .get_json(token, &self.pricings_url(subscription_id), "List pricings")
            .await?;
        Ok(list.value)
    }

    fn backend_name(&self) -> &str {
        "azure"
    }
}
