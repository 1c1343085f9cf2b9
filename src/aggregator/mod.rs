//! Fan-out of management-plane queries across every subscription visible to
//! the relay's credential, and reshaping of the merged results.

pub mod settle;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::azure::{AccessToken, AzureClient, ManagementApi};
use crate::config::Config;
use crate::errors::RelayError;
use crate::models::{
    CostReport, CostRow, CostTable, DateRange, DefenderPlan, Subscription, TopResource, COST_COLUMNS,
};
pub use settle::{apply_policy, settle_all, FailurePolicy, Settled};

/// Number of entries kept by the top-resources ranking.
pub const TOP_RESOURCES_LIMIT: usize = 10;

pub struct Aggregator {
    api: Arc<dyn ManagementApi>,
}

impl Aggregator {
    /// Failed cost queries are skipped.
    pub const COSTS_POLICY: FailurePolicy = FailurePolicy::SkipFailed;
    /// Any failed resource query fails the request.
    pub const TOP_RESOURCES_POLICY: FailurePolicy = FailurePolicy::FailFast;
    /// Failed pricing fetches are skipped.
    pub const PLANS_POLICY: FailurePolicy = FailurePolicy::SkipFailed;

    pub fn new(api: Arc<dyn ManagementApi>) -> Self {
        Self { api }
    }

    /// Build an aggregator talking to Azure with the given configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(AzureClient::new(config)))
    }

    pub fn backend_name(&self) -> &str {
        self.api.backend_name()
    }

    /// One token and one subscription listing per inbound request.
    async fn session(&self) -> Result<(AccessToken, Vec<Subscription>), RelayError> {
        let token = self.api.acquire_token().await?;
        let subscriptions = self.api.list_subscriptions(&token).await?;
        debug!(count = subscriptions.len(), "Resolved subscriptions");
        Ok((token, subscriptions))
    }

    /// Merged per-meter cost rows across all subscriptions.
    pub async fn costs(&self, range: &DateRange) -> Result<CostReport, RelayError> {
        let started = Instant::now();
        let (token, subscriptions) = self.session().await?;

        let api = self.api.as_ref();
        let token = &token;
        let settled = settle_all(&subscriptions, |sub| api.query_costs(token, &sub.id, range)).await;
        let succeeded = apply_policy(settled, Self::COSTS_POLICY, "cost query")?;

        let succeeded_count = succeeded.len();
        let rows: Vec<CostRow> = succeeded
            .into_iter()
            .flat_map(|(sub, result)| {
                result
                    .properties
                    .rows
                    .into_iter()
                    .map(move |raw| CostRow::from_raw(&raw, sub))
            })
            .collect();

        info!(
            subscriptions = subscriptions.len(),
            succeeded = succeeded_count,
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregated cost data"
        );

        Ok(CostReport {
            properties: CostTable {
                rows,
                columns: COST_COLUMNS.to_vec(),
            },
            subscriptions,
        })
    }

    /// The most expensive resources across all subscriptions, highest first.
    pub async fn top_resources(&self, range: &DateRange) -> Result<Vec<TopResource>, RelayError> {
        let started = Instant::now();
        let (token, subscriptions) = self.session().await?;

        let api = self.api.as_ref();
        let token = &token;
        let settled =
            settle_all(&subscriptions, |sub| api.query_resource_costs(token, &sub.id, range)).await;
        let succeeded = apply_policy(settled, Self::TOP_RESOURCES_POLICY, "resource cost query")?;

        let merged: Vec<TopResource> = succeeded
            .into_iter()
            .flat_map(|(sub, result)| {
                result
                    .properties
                    .rows
                    .into_iter()
                    .map(move |raw| TopResource::from_raw(&raw, sub))
            })
            .collect();
        let candidates = merged.len();
        let ranked = rank_top(merged, TOP_RESOURCES_LIMIT);

        info!(
            subscriptions = subscriptions.len(),
            candidates,
            returned = ranked.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ranked top resources"
        );
        Ok(ranked)
    }

    /// Defender plans that have a pricing tier configured.
    pub async fn plans(&self) -> Result<Vec<DefenderPlan>, RelayError> {
        let started = Instant::now();
        let (token, subscriptions) = self.session().await?;

        let api = self.api.as_ref();
        let token = &token;
        let settled = settle_all(&subscriptions, |sub| api.list_pricings(token, &sub.id)).await;
        let succeeded = apply_policy(settled, Self::PLANS_POLICY, "pricing list")?;

        let plans: Vec<DefenderPlan> = succeeded
            .into_iter()
            .flat_map(|(sub, pricings)| {
                pricings.into_iter().filter_map(move |p| {
                    DefenderPlan::from_pricing(sub, &p.name, p.properties.pricing_tier.as_deref())
                })
            })
            .collect();

        info!(
            subscriptions = subscriptions.len(),
            plans = plans.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Collected Defender plans"
        );
        Ok(plans)
    }
}

/// Stable sort by cost, descending, truncated to `limit`.
pub fn rank_top(mut resources: Vec<TopResource>, limit: usize) -> Vec<TopResource> {
    resources.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    resources.truncate(limit);
    resources
}
