use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

use crate::models::{CallerContext, Role};

#[derive(Deserialize)]
struct JwtPayload {
    sub: String,
    role: Role,
    affiliation_id: Option<String>,
}

/// Resolves the caller from the access token and stores a `CallerContext` in
/// the request extensions. The signature is checked by the gateway upstream.
pub async fn require_caller(mut request: Request, next: Next) -> Response {
    let caller = extract_token(request.headers()).and_then(|t| parse_caller(&t));

    match caller {
        Some(caller) => {
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "unauthorized" })),
        )
            .into_response(),
    }
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find_map(|c| c.strip_prefix("access_token="))
                .map(|t| t.to_string())
        })
}

fn parse_caller(token: &str) -> Option<CallerContext> {
    // Payload is the middle part
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
    let payload = serde_json::from_slice::<JwtPayload>(&payload_bytes).ok()?;
    if payload.sub.trim().is_empty() {
        return None;
    }
    Some(CallerContext {
        role: payload.role,
        owner_id: payload.sub,
        affiliation_id: payload.affiliation_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn token(payload: &str) -> String {
        format!(
            "eyJhbGciOiJIUzI1NiJ9.{}.sig",
            general_purpose::URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn parses_member_claims() {
        let t = token(r#"{"sub":"u-42","role":"REGULAR_MEMBER","affiliation_id":"org-7"}"#);
        let caller = parse_caller(&t).unwrap();
        assert_eq!(caller.owner_id, "u-42");
        assert_eq!(caller.role, Role::RegularMember);
        assert_eq!(caller.affiliation_id.as_deref(), Some("org-7"));
    }

    #[test]
    fn rejects_missing_role_or_garbage() {
        assert!(parse_caller(&token(r#"{"sub":"u-42"}"#)).is_none());
        assert!(parse_caller(&token(r#"{"sub":"u-42","role":"ROOT"}"#)).is_none());
        assert!(parse_caller("not-a-jwt").is_none());
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("a=1; access_token=cookie.tok.en"));
        assert_eq!(extract_token(&headers).as_deref(), Some("cookie.tok.en"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer head.tok.en"));
        assert_eq!(extract_token(&headers).as_deref(), Some("head.tok.en"));
    }
}
