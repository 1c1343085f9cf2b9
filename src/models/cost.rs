use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;

use super::subscription::Subscription;

pub const UNKNOWN: &str = "Unknown";

/// One cost line joined with its owning subscription.
///
/// Serialized as a positional array in the order of [`COST_COLUMNS`].
#[derive(Debug, Clone, PartialEq)]
pub struct CostRow {
    pub cost: f64,
    pub meter_category: Option<String>,
    pub meter_sub_category: Option<String>,
    pub subscription_id: String,
    pub resource_group: String,
    pub subscription_name: String,
}

/// Column schema describing a positional [`CostRow`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Column {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

pub const COST_COLUMNS: [Column; 6] = [
    Column { name: "Cost", kind: "Number" },
    Column { name: "MeterCategory", kind: "String" },
    Column { name: "MeterSubCategory", kind: "String" },
    Column { name: "SubscriptionId", kind: "String" },
    Column { name: "ResourceGroup", kind: "String" },
    Column { name: "SubscriptionName", kind: "String" },
];

impl Serialize for CostRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(COST_COLUMNS.len()))?;
        seq.serialize_element(&self.cost)?;
        seq.serialize_element(&self.meter_category)?;
        seq.serialize_element(&self.meter_sub_category)?;
        seq.serialize_element(&self.subscription_id)?;
        seq.serialize_element(&self.resource_group)?;
        seq.serialize_element(&self.subscription_name)?;
        seq.end()
    }
}

impl CostRow {
    /// Build a row from a raw cost-query row laid out as
    /// `[cost, meterCategory, meterSubCategory, <unused>, resourceGroup, ...]`.
    pub fn from_raw(raw: &[Value], subscription: &Subscription) -> Self {
        Self {
            cost: number_at(raw, 0),
            meter_category: text_at(raw, 1),
            meter_sub_category: text_at(raw, 2),
            subscription_id: subscription.id.clone(),
            resource_group: text_at(raw, 4)
                .filter(|rg| !rg.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            subscription_name: subscription.display_name.clone(),
        }
    }
}

/// Merged cost table returned by the cost endpoint.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CostReport {
    pub properties: CostTable,
    pub subscriptions: Vec<Subscription>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CostTable {
    pub rows: Vec<CostRow>,
    pub columns: Vec<Column>,
}

/// A single resource's spend, used for the top-resources ranking.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopResource {
    pub subscription_id: String,
    pub subscription_name: String,
    pub resource_name: String,
    pub resource_id: Option<String>,
    pub meter_sub_category: Option<String>,
    pub cost: f64,
}

impl TopResource {
    /// Build from a raw resource-query row laid out as
    /// `[cost, resourceId, meterSubCategory, ...]`.
    pub fn from_raw(raw: &[Value], subscription: &Subscription) -> Self {
        let resource_id = text_at(raw, 1);
        Self {
            subscription_id: subscription.id.clone(),
            subscription_name: subscription.display_name.clone(),
            resource_name: resource_name(resource_id.as_deref()),
            resource_id,
            meter_sub_category: text_at(raw, 2),
            cost: round_cents(number_at(raw, 0)),
        }
    }
}

/// Last path segment of an ARM resource id, or "Unknown".
pub fn resource_name(resource_id: Option<&str>) -> String {
    resource_id
        .filter(|id| !id.is_empty())
        .and_then(|id| id.split('/').last())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Round to two decimal places, halves away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn number_at(raw: &[Value], idx: usize) -> f64 {
    match raw.get(idx) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// String cell as received; `None` for null, missing or non-string cells.
fn text_at(raw: &[Value], idx: usize) -> Option<String> {
    raw.get(idx).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sub() -> Subscription {
        Subscription::new("sub-1", "Production")
    }

    #[test]
    fn test_resource_name_last_segment() {
        assert_eq!(
            resource_name(Some("/sub/rg/providers/Foo/bar/myResource")),
            "myResource"
        );
    }

    #[test]
    fn test_resource_name_missing() {
        assert_eq!(resource_name(None), "Unknown");
        assert_eq!(resource_name(Some("")), "Unknown");
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(12.345), 12.35);
        assert_eq!(round_cents(12.344), 12.34);
        assert_eq!(round_cents(0.0), 0.0);
        assert_eq!(round_cents(7.0), 7.0);
    }

    #[test]
    fn test_cost_row_skips_unused_column() {
        let raw = vec![
            json!(42.5),
            json!("Virtual Machines"),
            json!("D2s v3"),
            json!("Compute"),
            json!("rg-web"),
            json!("USD"),
        ];
        let row = CostRow::from_raw(&raw, &sub());
        assert_eq!(row.cost, 42.5);
        assert_eq!(row.meter_category.as_deref(), Some("Virtual Machines"));
        assert_eq!(row.meter_sub_category.as_deref(), Some("D2s v3"));
        assert_eq!(row.resource_group, "rg-web");
        assert_eq!(row.subscription_id, "sub-1");
        assert_eq!(row.subscription_name, "Production");
    }

    #[test]
    fn test_cost_row_defaults_resource_group() {
        let raw = vec![json!(1.0), json!("Storage"), json!("Hot LRS"), json!("Storage"), Value::Null];
        assert_eq!(CostRow::from_raw(&raw, &sub()).resource_group, "Unknown");

        let short = vec![json!(1.0), json!("Storage"), json!("Hot LRS")];
        assert_eq!(CostRow::from_raw(&short, &sub()).resource_group, "Unknown");
    }

    #[test]
    fn test_cost_row_serializes_positionally() {
        let raw = vec![json!(3.25), json!("Bandwidth"), json!("Egress"), json!("x"), json!("rg-net")];
        let value = serde_json::to_value(CostRow::from_raw(&raw, &sub())).unwrap();
        assert_eq!(
            value,
            json!([3.25, "Bandwidth", "Egress", "sub-1", "rg-net", "Production"])
        );
    }

    #[test]
    fn test_top_resource_from_raw() {
        let raw = vec![
            json!(12.345),
            json!("/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm-01"),
            json!("D4s v5"),
            json!("USD"),
        ];
        let resource = TopResource::from_raw(&raw, &sub());
        assert_eq!(resource.resource_name, "vm-01");
        assert_eq!(resource.cost, 12.35);
        assert_eq!(resource.meter_sub_category.as_deref(), Some("D4s v5"));

        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["subscriptionName"], "Production");
        assert_eq!(value["resourceName"], "vm-01");
    }

    #[test]
    fn test_cost_row_keeps_null_and_empty_cells() {
        let raw = vec![json!(2.0), Value::Null, json!(""), json!("x"), json!("")];
        let row = CostRow::from_raw(&raw, &sub());
        assert_eq!(row.meter_category, None);
        assert_eq!(row.meter_sub_category.as_deref(), Some(""));
        assert_eq!(row.resource_group, "Unknown");
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value, json!([2.0, null, "", "sub-1", "Unknown", "Production"]));
    }

    #[test]
    fn test_top_resource_empty_id_passes_through() {
        let raw = vec![json!(1.0), json!(""), json!("LRS")];
        let resource = TopResource::from_raw(&raw, &sub());
        assert_eq!(resource.resource_id.as_deref(), Some(""));
        assert_eq!(resource.resource_name, "Unknown");
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["resourceId"], "");
    }

    #[test]
    fn test_top_resource_null_id() {
        let raw = vec![json!(5), Value::Null, json!("LRS")];
        let resource = TopResource::from_raw(&raw, &sub());
        assert_eq!(resource.resource_name, "Unknown");
        assert_eq!(resource.resource_id, None);
        assert_eq!(resource.cost, 5.0);
    }
}
