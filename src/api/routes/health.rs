//! Health Routes
//!
//! - GET /healthcheck - Liveness probe with the current server time

use chrono::{SecondsFormat, Utc};

/// GET /healthcheck
///
/// Always 200. No dependency checks.
pub async fn healthcheck() -> String {
    format!(
        "ok - {}\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_healthcheck_body() {
        let body = healthcheck().await;

        let timestamp = body
            .strip_prefix("ok - ")
            .and_then(|rest| rest.strip_suffix('\n'))
            .unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}
