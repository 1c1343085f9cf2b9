use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::{DateRange, Subscription};

pub const SUBSCRIPTIONS_API_VERSION: &str = "2022-12-01";
pub const COST_MANAGEMENT_API_VERSION: &str = "2023-03-01";
pub const SECURITY_PRICINGS_API_VERSION: &str = "2024-01-01";

/// Grouping used by the per-meter cost query. The third dimension is
/// requested only to keep resource group at a stable position and is
/// dropped during flattening.
pub const COST_GROUPING: [&str; 4] = ["MeterCategory", "MeterSubCategory", "ServiceName", "ResourceGroupName"];

/// Grouping used by the per-resource cost query.
pub const RESOURCE_GROUPING: [&str; 2] = ["ResourceId", "MeterSubCategory"];

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPage {
    #[serde(default)]
    pub value: Vec<SubscriptionRecord>,
    #[serde(default)]
    pub next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub subscription_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl From<SubscriptionRecord> for Subscription {
    fn from(record: SubscriptionRecord) -> Self {
        let display_name = record
            .display_name
            .unwrap_or_else(|| record.subscription_id.clone());
        Subscription {
            id: record.subscription_id,
            display_name,
        }
    }
}

/// Tabular payload returned by the Cost Management query API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub properties: QueryProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryProperties {
    #[serde(default)]
    pub columns: Vec<QueryColumn>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl QueryResult {
    pub fn from_rows(rows: Vec<Vec<Value>>) -> Self {
        Self {
            properties: QueryProperties {
                columns: Vec::new(),
                rows,
                next_link: None,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PricingList {
    #[serde(default)]
    pub value: Vec<Pricing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pricing {
    pub name: String,
    #[serde(default)]
    pub properties: PricingProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingProperties {
    #[serde(default)]
    pub pricing_tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_plan: Option<String>,
}

impl Pricing {
    pub fn new(name: &str, pricing_tier: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            properties: PricingProperties {
                pricing_tier: pricing_tier.map(str::to_string),
                sub_plan: None,
            },
        }
    }
}

/// Body of an ActualCost query over a custom period, summing cost and
/// grouping by the given dimensions.
pub fn cost_query_body(range: &DateRange, grouping: &[&str]) -> Value {
    let grouping: Vec<Value> = grouping
        .iter()
        .map(|name| json!({"type": "Dimension", "name": name}))
        .collect();

    json!({
        "type": "ActualCost",
        "timeframe": "Custom",
        "timePeriod": {
            "from": range.start,
            "to": range.end,
        },
        "dataset": {
            "granularity": "None",
            "aggregation": {
                "totalCost": {"name": "Cost", "function": "Sum"},
            },
            "grouping": grouping,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_query_body_shape() {
        let range = DateRange {
            start: "2024-03-01".into(),
            end: "2024-03-31".into(),
        };
        let body = cost_query_body(&range, &COST_GROUPING);
        assert_eq!(body["timeframe"], "Custom");
        assert_eq!(body["timePeriod"]["from"], "2024-03-01");
        assert_eq!(body["timePeriod"]["to"], "2024-03-31");
        assert_eq!(body["dataset"]["aggregation"]["totalCost"]["function"], "Sum");
        let grouping = body["dataset"]["grouping"].as_array().unwrap();
        assert_eq!(grouping.len(), 4);
        assert_eq!(grouping[3]["name"], "ResourceGroupName");
    }

    #[test]
    fn test_subscription_page_parses() {
        let page: SubscriptionPage = serde_json::from_value(json!({
            "value": [
                {"id": "/subscriptions/a", "subscriptionId": "a", "displayName": "Alpha", "state": "Enabled"},
                {"subscriptionId": "b"}
            ],
            "nextLink": "https://management.azure.com/subscriptions?$skiptoken=x"
        }))
        .unwrap();
        assert_eq!(page.value.len(), 2);
        assert!(page.next_link.is_some());

        let subs: Vec<Subscription> = page.value.into_iter().map(Subscription::from).collect();
        assert_eq!(subs[0], Subscription::new("a", "Alpha"));
        assert_eq!(subs[1].display_name, "b");
    }

    #[test]
    fn test_query_result_parses_rows() {
        let result: QueryResult = serde_json::from_value(json!({
            "id": "x",
            "properties": {
                "nextLink": null,
                "columns": [{"name": "Cost", "type": "Number"}, {"name": "Currency", "type": "String"}],
                "rows": [[1.5, "USD"], [2, "USD"]]
            }
        }))
        .unwrap();
        assert_eq!(result.properties.rows.len(), 2);
        assert_eq!(result.properties.columns[0].name, "Cost");
    }

    #[test]
    fn test_pricing_without_tier_parses() {
        let list: PricingList = serde_json::from_value(json!({
            "value": [
                {"name": "VirtualMachines", "properties": {"pricingTier": "Standard", "subPlan": "P2"}},
                {"name": "Dns", "properties": {}},
                {"name": "Legacy"}
            ]
        }))
        .unwrap();
        assert_eq!(list.value.len(), 3);
        assert_eq!(list.value[0].properties.pricing_tier.as_deref(), Some("Standard"));
        assert_eq!(list.value[1].properties.pricing_tier, None);
        assert_eq!(list.value[2].properties.pricing_tier, None);
    }
}
