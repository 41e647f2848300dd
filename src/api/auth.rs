//! HTTP basic authentication for the remote endpoints.

use super::{ApiError, ApiState};
use crate::config::Credentials;
use crate::Error;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Reject requests whose `Authorization` header does not carry the
/// configured credentials. A no-op when no credentials are configured.
pub async fn require_basic_auth(
    State(state): State<ApiState>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.credentials.as_deref() else {
        return next.run(req).await;
    };

    let authorized = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic)
        .is_some_and(|(user, password)| credentials_match(expected, &user, &password));

    if !authorized {
        return ApiError::from(Error::Unauthorized).into_response();
    }
    next.run(req).await
}

fn credentials_match(expected: &Credentials, user: &str, password: &str) -> bool {
    expected.access_key_id == user && expected.secret_access_key == password
}

/// Decode `Basic <base64(user:password)>`.
pub(crate) fn parse_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let header = format!("Basic {}", STANDARD.encode("AKIA:s3cr:et"));
        assert_eq!(
            parse_basic(&header),
            Some(("AKIA".to_string(), "s3cr:et".to_string()))
        );
        let lower = format!("basic {}", STANDARD.encode("a:b"));
        assert!(parse_basic(&lower).is_some());
    }

    #[test]
    fn test_parse_basic_rejects_other_schemes() {
        assert_eq!(parse_basic("Bearer abc"), None);
        assert_eq!(parse_basic("Basic !!!notbase64"), None);
        assert_eq!(parse_basic(&format!("Basic {}", STANDARD.encode("nocolon"))), None);
    }
}
