use serde::Serialize;

use super::subscription::Subscription;

/// A Defender for Cloud plan with its configured pricing tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenderPlan {
    pub subscription_id: String,
    pub subscription_name: String,
    pub plan_name: String,
    pub pricing_tier: String,
}

impl DefenderPlan {
    /// Returns `None` when the upstream record has no pricing tier.
    pub fn from_pricing(
        subscription: &Subscription,
        plan_name: &str,
        pricing_tier: Option<&str>,
    ) -> Option<Self> {
        let tier = pricing_tier.filter(|t| !t.is_empty())?;
        Some(Self {
            subscription_id: subscription.id.clone(),
            subscription_name: subscription.display_name.clone(),
            plan_name: plan_name.to_string(),
            pricing_tier: tier.to_string(),
        })
    }
}
