//! In-memory [`ManagementApi`] with per-subscription canned outcomes and
//! call counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::RelayError;
use crate::models::{DateRange, Subscription};
use super::provider::{AccessToken, ManagementApi};
use super::types::{Pricing, QueryResult};

type Outcome<T> = Result<T, String>;

#[derive(Default)]
pub struct CallCounts {
    pub token: AtomicUsize,
    pub subscriptions: AtomicUsize,
    pub costs: AtomicUsize,
    pub resource_costs: AtomicUsize,
    pub pricings: AtomicUsize,
}

#[derive(Default)]
pub struct MockManagementApi {
    token_error: Option<String>,
    subscriptions: Vec<Subscription>,
    costs: HashMap<String, Outcome<Vec<Vec<Value>>>>,
    resource_costs: HashMap<String, Outcome<Vec<Vec<Value>>>>,
    pricings: HashMap<String, Outcome<Vec<Pricing>>>,
    pub calls: CallCounts,
}

impl MockManagementApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscription(mut self, id: &str, display_name: &str) -> Self {
        self.subscriptions.push(Subscription::new(id, display_name));
        self
    }

    pub fn with_token_error(mut self, message: &str) -> Self {
        self.token_error = Some(message.to_string());
        self
    }

    pub fn with_costs(mut self, subscription_id: &str, rows: Vec<Vec<Value>>) -> Self {
        self.costs.insert(subscription_id.to_string(), Ok(rows));
        self
    }

    pub fn with_cost_error(mut self, subscription_id: &str, message: &str) -> Self {
        self.costs.insert(subscription_id.to_string(), Err(message.to_string()));
        self
    }

    pub fn with_resource_costs(mut self, subscription_id: &str, rows: Vec<Vec<Value>>) -> Self {
        self.resource_costs.insert(subscription_id.to_string(), Ok(rows));
        self
    }

    pub fn with_resource_cost_error(mut self, subscription_id: &str, message: &str) -> Self {
        self.resource_costs.insert(subscription_id.to_string(), Err(message.to_string()));
        self
    }

    pub fn with_pricings(mut self, subscription_id: &str, pricings: Vec<Pricing>) -> Self {
        self.pricings.insert(subscription_id.to_string(), Ok(pricings));
        self
    }

    pub fn with_pricing_error(mut self, subscription_id: &str, message: &str) -> Self {
        self.pricings.insert(subscription_id.to_string(), Err(message.to_string()));
        self
    }

    /// Total number of upstream calls of any kind.
    pub fn total_calls(&self) -> usize {
        [
            &self.calls.token,
            &self.calls.subscriptions,
            &self.calls.costs,
            &self.calls.resource_costs,
            &self.calls.pricings,
        ]
        .iter()
        .map(|c| c.load(Ordering::SeqCst))
        .sum()
    }
}

fn settle<T: Clone>(outcome: Option<&Outcome<T>>, default: T) -> Result<T, RelayError> {
    match outcome {
        Some(Ok(value)) => Ok(value.clone()),
        Some(Err(message)) => Err(RelayError::UpstreamQuery(message.clone())),
        None => Ok(default),
    }
}

#[async_trait]
impl ManagementApi for MockManagementApi {
    async fn acquire_token(&self) -> Result<AccessToken, RelayError> {
        self.calls.token.fetch_add(1, Ordering::SeqCst);
        match &self.token_error {
            Some(message) => Err(RelayError::Authentication(message.clone())),
            None => Ok(AccessToken::new("mock-token")),
        }
    }

    async fn list_subscriptions(&self, _token: &AccessToken) -> Result<Vec<Subscription>, RelayError> {
        self.calls.subscriptions.fetch_add(1, Ordering::SeqCst);
        Ok(self.subscriptions.clone())
    }

    async fn query_costs(
        &self,
        _token: &AccessToken,
        subscription_id: &str,
        _range: &DateRange,
    ) -> Result<QueryResult, RelayError> {
        self.calls.costs.fetch_add(1, Ordering::SeqCst);
        settle(self.costs.get(subscription_id), Vec::new()).map(QueryResult::from_rows)
    }

    async fn query_resource_costs(
        &self,
        _token: &AccessToken,
        subscription_id: &str,
        _range: &DateRange,
    ) -> Result<QueryResult, RelayError> {
        self.calls.resource_costs.fetch_add(1, Ordering::SeqCst);
        settle(self.resource_costs.get(subscription_id), Vec::new()).map(QueryResult::from_rows)
    }

    async fn list_pricings(
        &self,
        _token: &AccessToken,
        subscription_id: &str,
    ) -> Result<Vec<Pricing>, RelayError> {
        self.calls.pricings.fetch_add(1, Ordering::SeqCst);
        settle(self.pricings.get(subscription_id), Vec::new())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}
