use std::fmt;

use tracing::debug;

/// Service principal credentials used for the client-credentials grant.
#[derive(Clone)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Read a required variable through `lookup`. Empty values count as unset.
pub fn resolve_required<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => {
            debug!(var = %name, "Resolved credential from environment");
            Some(value.trim().to_string())
        }
        _ => None,
    }
}

/// Replace every occurrence of `secrets` in `text` with [REDACTED].
/// Secrets shorter than four characters are left alone.
pub fn redact_credentials(text: &str, secrets: &[&str]) -> String {
    let mut result = text.to_string();
    for secret in secrets {
        if !secret.is_empty() && secret.len() >= 4 {
            result = result.replace(secret, "[REDACTED]");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secret() {
        let creds = Credentials {
            tenant_id: "tenant".into(),
            client_id: "client".into(),
            client_secret: "sup3r-s3cret".into(),
        };
        let out = format!("{:?}", creds);
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains("sup3r-s3cret"));
    }

    #[test]
    fn test_resolve_required_treats_blank_as_missing() {
        let lookup = |name: &str| match name {
            "SET" => Some("value".to_string()),
            "BLANK" => Some("   ".to_string()),
            _ => None,
        };
        assert_eq!(resolve_required(&lookup, "SET").as_deref(), Some("value"));
        assert_eq!(resolve_required(&lookup, "BLANK"), None);
        assert_eq!(resolve_required(&lookup, "UNSET"), None);
    }

    #[test]
    fn test_redact_credentials() {
        let text = "AADSTS7000215: Invalid client secret provided: S3cret123";
        let redacted = redact_credentials(text, &["S3cret123"]);
        assert!(redacted.contains("[REDACTED]"));
        assert!(!redacted.contains("S3cret123"));
    }

    #[test]
    fn test_redact_credentials_short_secret_ignored() {
        let redacted = redact_credentials("key=ab", &["ab"]);
        assert_eq!(redacted, "key=ab");
    }
}
