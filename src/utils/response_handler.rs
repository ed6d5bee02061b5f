//! Response envelope builder
//!
//! Every relay response is wrapped in one of two shapes:
//! - `{"data": ...}` when the call succeeded
//! - `{"errors": [ ... ]}` holding exactly one canonical error otherwise
//!
//! Both shapes are sent with HTTP 200.

use crate::error::{CanonicalError, RelayError};
use actix_web::HttpResponse;
use serde::Serialize;

/// Uniform payload returned for every call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope<T> {
    Data(T),
    Errors(Vec<CanonicalError>),
}

impl<T> Envelope<T> {
    pub fn data(payload: T) -> Self {
        Envelope::Data(payload)
    }

    pub fn error(error: &RelayError) -> Self {
        Envelope::Errors(vec![error.to_canonical()])
    }
}

/// Payload of a successful health check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

pub struct ResponseHandler;

impl ResponseHandler {
    /// Wrap a payload in `data`
    pub fn success<T: Serialize>(payload: T) -> HttpResponse {
        HttpResponse::Ok().json(Envelope::data(payload))
    }

    /// Wrap a single error in `errors`
    pub fn failure(error: &RelayError) -> HttpResponse {
        HttpResponse::Ok().json(Envelope::<()>::error(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use serde_json::{json, Value};

    async fn body_json(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_success_envelope() {
        let response = ResponseHandler::success(HealthStatus::ok());

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"data": {"status": "ok"}}));
    }

    #[actix_web::test]
    async fn test_failure_envelope_holds_one_error() {
        let response = ResponseHandler::failure(&RelayError::Oops);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "errors": [
                    {"code": "oops", "message": "Something went wrong.", "type": "fatal"}
                ]
            })
        );
    }

    #[test]
    fn test_envelope_serialization_is_stable() {
        let error = RelayError::TooManyRequests("Rate limit is exceeded. Try again in 3 seconds.".into());
        let first = serde_json::to_string(&Envelope::<HealthStatus>::error(&error)).unwrap();
        let second = serde_json::to_string(&Envelope::<HealthStatus>::error(&error)).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first,
            r#"{"errors":[{"code":"too many requests","message":"Rate limit is exceeded. Try again in 3 seconds.","type":"fatal"}]}"#
        );
    }
}
