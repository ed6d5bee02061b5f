//! Bearer token extractor
//!
//! Pulls the token from the `Authorization` header, verifies it with the
//! [`JwtService`] registered as app data and hands the upstream credential to
//! the handler. Any failure short-circuits the request with the
//! `authorization failed` envelope before the handler body runs.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::auth::jwt::JwtService;
use crate::error::RelayError;

/// Upstream credential taken from a verified token
pub struct HibpCredentials {
    pub api_key: String,
}

// Custom Debug implementation to hide the credential
impl std::fmt::Debug for HibpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HibpCredentials").field("api_key", &"<hidden>").finish()
    }
}

/// Token part of a `<scheme> <token>` header with a case-insensitive `Bearer` scheme
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;

    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    Some(token)
}

fn extract_credentials(req: &HttpRequest) -> Result<HibpCredentials, RelayError> {
    let header_value = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Missing or unreadable authorization header");
            RelayError::authorization_failed()
        })?;

    let token = bearer_token(header_value).ok_or_else(|| {
        log::warn!("Invalid authorization header format");
        RelayError::authorization_failed()
    })?;

    let jwt_service = req.app_data::<web::Data<JwtService>>().ok_or_else(|| {
        log::error!("JwtService is not registered as app data");
        RelayError::Oops
    })?;

    let claims = jwt_service.get_claims(token)?;

    Ok(HibpCredentials {
        api_key: claims.key,
    })
}

impl FromRequest for HibpCredentials {
    type Error = RelayError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_credentials(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "relay_test_secret";

    fn token(secret: &str) -> String {
        encode(
            &Header::default(),
            &json!({"key": "hibp-key"}),
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn request_with(header: Option<String>) -> HttpRequest {
        let mut builder =
            TestRequest::post().app_data(web::Data::new(JwtService::new(SECRET)));
        if let Some(value) = header {
            builder = builder.insert_header((AUTHORIZATION, value));
        }
        builder.to_http_request()
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("  BEARER   abc  "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer abc def"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[actix_web::test]
    async fn test_valid_header_yields_credentials() {
        let req = request_with(Some(format!("Bearer {}", token(SECRET))));

        let credentials = extract_credentials(&req).unwrap();
        assert_eq!(credentials.api_key, "hibp-key");
    }

    #[actix_web::test]
    async fn test_invalid_headers_fail_authorization() {
        let cases = vec![
            None,
            Some(format!("Basic {}", token(SECRET))),
            Some(format!("Bearer {}", token("wrong_secret"))),
            Some("Bearer not.a.token".to_string()),
        ];

        for header in cases {
            let req = request_with(header);
            assert_eq!(extract_credentials(&req).unwrap_err(), RelayError::authorization_failed());
        }
    }

    #[actix_web::test]
    async fn test_missing_jwt_service_is_reported_as_oops() {
        let req = TestRequest::post()
            .insert_header((AUTHORIZATION, format!("Bearer {}", token(SECRET))))
            .to_http_request();

        assert_eq!(extract_credentials(&req).unwrap_err(), RelayError::Oops);
    }
}
