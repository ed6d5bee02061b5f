//! Upstream Error Handler
//!
//! Classifies a raw upstream response into success or exactly one
//! [`RelayError`]. The classification is pure: it depends only on the status
//! code and the body.
//!
//! Which statuses may surface upstream text is kept in [`MessagePolicy`] data
//! so the decision can be audited in one place. Only `401` and `429` pass the
//! upstream `message` through; everything else gets a canned message.

use crate::error::{RelayError, OOPS_MESSAGE, SERVICE_UNAVAILABLE_MESSAGE};
use crate::hibp::client::UpstreamResponse;

pub const ACCESS_DENIED_FALLBACK: &str =
    "Authorization failed: Access denied by the breach intelligence service.";
pub const RATE_LIMIT_FALLBACK: &str = "Rate limit is exceeded. Try again later.";

/// Statuses the relay distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStatus {
    Ok,
    Unauthorized,
    TooManyRequests,
    ServiceUnavailable,
    Other(u16),
}

impl From<u16> for UpstreamStatus {
    fn from(code: u16) -> Self {
        match code {
            200 => UpstreamStatus::Ok,
            401 => UpstreamStatus::Unauthorized,
            429 => UpstreamStatus::TooManyRequests,
            503 => UpstreamStatus::ServiceUnavailable,
            other => UpstreamStatus::Other(other),
        }
    }
}

/// How the caller-visible message is chosen for an error status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePolicy {
    /// Use the upstream `message` behind `prefix`, or `fallback` when absent
    Authentic {
        prefix: &'static str,
        fallback: &'static str,
    },
    /// Always use the given text
    Canned(&'static str),
}

impl MessagePolicy {
    pub fn render(&self, upstream_message: Option<&str>) -> String {
        match (self, upstream_message) {
            (MessagePolicy::Authentic { prefix, .. }, Some(message)) => format!("{prefix}{message}"),
            (MessagePolicy::Authentic { fallback, .. }, None) => fallback.to_string(),
            (MessagePolicy::Canned(text), _) => text.to_string(),
        }
    }
}

/// Error constructor and message policy for one error status
#[derive(Debug, Clone, Copy)]
pub struct StatusPolicy {
    pub build: fn(String) -> RelayError,
    pub message: MessagePolicy,
}

impl StatusPolicy {
    pub fn error(&self, upstream_message: Option<&str>) -> RelayError {
        (self.build)(self.message.render(upstream_message))
    }
}

/// Error handler for upstream responses
pub struct UpstreamErrorHandler;

impl UpstreamErrorHandler {
    /// Policy for a status, `None` on success
    pub fn policy_for(status: UpstreamStatus) -> Option<StatusPolicy> {
        match status {
            UpstreamStatus::Ok => None,
            UpstreamStatus::Unauthorized => Some(StatusPolicy {
                build: RelayError::AccessDenied,
                message: MessagePolicy::Authentic {
                    prefix: "Authorization failed: ",
                    fallback: ACCESS_DENIED_FALLBACK,
                },
            }),
            UpstreamStatus::TooManyRequests => Some(StatusPolicy {
                build: RelayError::TooManyRequests,
                message: MessagePolicy::Authentic {
                    prefix: "",
                    fallback: RATE_LIMIT_FALLBACK,
                },
            }),
            UpstreamStatus::ServiceUnavailable => Some(StatusPolicy {
                build: |_| RelayError::ServiceUnavailable,
                message: MessagePolicy::Canned(SERVICE_UNAVAILABLE_MESSAGE),
            }),
            UpstreamStatus::Other(_) => Some(StatusPolicy {
                build: |_| RelayError::Oops,
                message: MessagePolicy::Canned(OOPS_MESSAGE),
            }),
        }
    }

    /// Whether the upstream body can influence the outcome for this status
    pub fn reads_upstream_message(status: u16) -> bool {
        matches!(
            Self::policy_for(UpstreamStatus::from(status)),
            Some(StatusPolicy {
                message: MessagePolicy::Authentic { .. },
                ..
            })
        )
    }

    /// Classify an upstream response
    pub fn classify(response: &UpstreamResponse) -> Result<(), RelayError> {
        match Self::policy_for(UpstreamStatus::from(response.status)) {
            None => Ok(()),
            Some(policy) => Err(policy.error(response.message())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn response(status: u16, body: Option<serde_json::Value>) -> UpstreamResponse {
        UpstreamResponse {
            status,
            body,
        }
    }

    #[test]
    fn test_ok_is_success() {
        assert_eq!(UpstreamErrorHandler::classify(&response(200, None)), Ok(()));
        assert_eq!(
            UpstreamErrorHandler::classify(&response(200, Some(json!({"message": "ignored"})))),
            Ok(())
        );
    }

    #[test]
    fn test_unauthorized_prefixes_upstream_message() {
        let error = UpstreamErrorHandler::classify(&response(
            401,
            Some(json!({"message": "Unauthorized error from 3rd party"})),
        ))
        .unwrap_err();

        assert_eq!(error.code(), ErrorCode::AccessDenied);
        assert_eq!(error.to_string(), "Authorization failed: Unauthorized error from 3rd party");
    }

    #[test]
    fn test_unauthorized_without_message_uses_fallback() {
        for body in [None, Some(json!({})), Some(json!({"message": 42})), Some(json!("text"))] {
            let error = UpstreamErrorHandler::classify(&response(401, body)).unwrap_err();
            assert_eq!(error, RelayError::AccessDenied(ACCESS_DENIED_FALLBACK.to_string()));
        }
    }

    #[test]
    fn test_rate_limit_message_passes_through_verbatim() {
        let error = UpstreamErrorHandler::classify(&response(
            429,
            Some(json!({"statusCode": 429, "message": "Rate limit is exceeded. Try again in 3 seconds."})),
        ))
        .unwrap_err();

        assert_eq!(error.code(), ErrorCode::TooManyRequests);
        assert_eq!(error.to_string(), "Rate limit is exceeded. Try again in 3 seconds.");
    }

    #[test]
    fn test_rate_limit_without_message_uses_fallback() {
        let error = UpstreamErrorHandler::classify(&response(429, None)).unwrap_err();
        assert_eq!(error, RelayError::TooManyRequests(RATE_LIMIT_FALLBACK.to_string()));
    }

    #[test]
    fn test_service_unavailable_ignores_upstream_message() {
        let error = UpstreamErrorHandler::classify(&response(
            503,
            Some(json!({"message": "<html>maintenance</html>"})),
        ))
        .unwrap_err();

        assert_eq!(error, RelayError::ServiceUnavailable);
        assert_eq!(error.to_string(), SERVICE_UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn test_other_statuses_fall_back_to_oops() {
        for status in [201, 204, 400, 403, 404, 500, 502, 504] {
            let error = UpstreamErrorHandler::classify(&response(
                status,
                Some(json!({"message": "internal details"})),
            ))
            .unwrap_err();

            assert_eq!(error, RelayError::Oops, "status {status}");
            assert_eq!(error.to_string(), "Something went wrong.");
        }
    }

    fn code_of(status: UpstreamStatus) -> Option<ErrorCode> {
        UpstreamErrorHandler::policy_for(status).map(|policy| policy.error(None).code())
    }

    #[test]
    fn test_policy_table() {
        assert_eq!(code_of(UpstreamStatus::Ok), None);
        assert_eq!(code_of(UpstreamStatus::Unauthorized), Some(ErrorCode::AccessDenied));
        assert_eq!(code_of(UpstreamStatus::TooManyRequests), Some(ErrorCode::TooManyRequests));
        assert_eq!(
            code_of(UpstreamStatus::ServiceUnavailable),
            Some(ErrorCode::ServiceUnavailable)
        );
        assert_eq!(code_of(UpstreamStatus::Other(418)), Some(ErrorCode::Oops));
    }

    #[test]
    fn test_only_authentic_statuses_read_the_body() {
        assert!(UpstreamErrorHandler::reads_upstream_message(401));
        assert!(UpstreamErrorHandler::reads_upstream_message(429));

        for status in [200, 204, 500, 503] {
            assert!(!UpstreamErrorHandler::reads_upstream_message(status), "status {status}");
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(UpstreamStatus::from(200), UpstreamStatus::Ok);
        assert_eq!(UpstreamStatus::from(401), UpstreamStatus::Unauthorized);
        assert_eq!(UpstreamStatus::from(429), UpstreamStatus::TooManyRequests);
        assert_eq!(UpstreamStatus::from(503), UpstreamStatus::ServiceUnavailable);
        assert_eq!(UpstreamStatus::from(500), UpstreamStatus::Other(500));
    }
}
