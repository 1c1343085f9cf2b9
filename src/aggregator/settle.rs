use std::future::Future;

use futures::future::join_all;
use tracing::warn;

use crate::errors::RelayError;
use crate::models::Subscription;

/// How a fan-out treats subscriptions whose query failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and continue with the remaining subscriptions.
    SkipFailed,
    /// Fail the whole request with the first failure, in subscription order.
    FailFast,
}

/// Outcome of one subscription's branch of a fan-out.
#[derive(Debug)]
pub struct Settled<'a, T> {
    pub subscription: &'a Subscription,
    pub outcome: Result<T, RelayError>,
}

/// Run `query` for every subscription concurrently and wait until every
/// branch has settled, successful or not. Results keep subscription order.
pub async fn settle_all<'a, T, F, Fut>(subscriptions: &'a [Subscription], query: F) -> Vec<Settled<'a, T>>
where
    F: Fn(&'a Subscription) -> Fut,
    Fut: Future<Output = Result<T, RelayError>>,
{
    let branches = subscriptions.iter().map(|subscription| {
        let pending = query(subscription);
        async move {
            Settled {
                subscription,
                outcome: pending.await,
            }
        }
    });
    join_all(branches).await
}

/// Fold settled branches into the successful values according to `policy`.
pub fn apply_policy<'a, T>(
    settled: Vec<Settled<'a, T>>,
    policy: FailurePolicy,
    operation: &str,
) -> Result<Vec<(&'a Subscription, T)>, RelayError> {
    let mut succeeded = Vec::with_capacity(settled.len());
    for branch in settled {
        match branch.outcome {
            Ok(value) => succeeded.push((branch.subscription, value)),
            Err(e) => match policy {
                FailurePolicy::SkipFailed => {
                    warn!(
                        operation,
                        subscription_id = %branch.subscription.id,
                        error_type = e.classify().kind.as_str(),
                        error = %e,
                        "Subscription query failed, skipping"
                    );
                }
                FailurePolicy::FailFast => return Err(e),
            },
        }
    }
    Ok(succeeded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs() -> Vec<Subscription> {
        vec![
            Subscription::new("a", "Alpha"),
            Subscription::new("b", "Beta"),
            Subscription::new("c", "Gamma"),
        ]
    }

    async fn query(sub: &Subscription) -> Result<usize, RelayError> {
        if sub.id == "b" {
            Err(RelayError::UpstreamQuery("boom".into()))
        } else {
            Ok(sub.display_name.len())
        }
    }

    #[tokio::test]
    async fn test_settle_all_keeps_order_and_failures() {
        let subs = subs();
        let settled = settle_all(&subs, query).await;
        assert_eq!(settled.len(), 3);
        assert_eq!(settled[0].subscription.id, "a");
        assert!(settled[1].outcome.is_err());
        assert_eq!(*settled[2].outcome.as_ref().unwrap(), 5);
    }

    #[tokio::test]
    async fn test_skip_failed_drops_errors() {
        let subs = subs();
        let settled = settle_all(&subs, query).await;
        let ok = apply_policy(settled, FailurePolicy::SkipFailed, "test").unwrap();
        let ids: Vec<&str> = ok.iter().map(|(s, _)| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_fail_fast_returns_error() {
        let subs = subs();
        let settled = settle_all(&subs, query).await;
        let err = apply_policy(settled, FailurePolicy::FailFast, "test").unwrap_err();
        assert!(matches!(err, RelayError::UpstreamQuery(_)));
    }

    #[tokio::test]
    async fn test_empty_fan_out() {
        let subs: Vec<Subscription> = Vec::new();
        let settled = settle_all(&subs, query).await;
        assert!(apply_policy(settled, FailurePolicy::FailFast, "test").unwrap().is_empty());
    }
}
