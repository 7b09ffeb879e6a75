use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use bearergate::AuthGate;
use bearergate_auth::{Algorithm, StaticKey, Verifier};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use serde_json::{Value, json};

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

/// Signs `claims` with HS256 and the test secret.
pub fn sign<T: Serialize>(claims: &T) -> String {
    sign_with(claims, Algorithm::HS256, TEST_SECRET.as_bytes())
}

#[allow(dead_code)]
pub fn sign_with<T: Serialize>(claims: &T, alg: Algorithm, secret: &[u8]) -> String {
    encode(&Header::new(alg), claims, &EncodingKey::from_secret(secret)).unwrap()
}

/// Claims for `sub` expiring in an hour.
#[allow(dead_code)]
pub fn user_claims(sub: &str) -> Value {
    let now = Utc::now();
    json!({
        "sub": sub,
        "iat": now.timestamp(),
        "exp": (now + Duration::hours(1)).timestamp(),
    })
}

#[allow(dead_code)]
pub fn expired_claims(sub: &str) -> Value {
    let now = Utc::now();
    json!({
        "sub": sub,
        "iat": (now - Duration::hours(2)).timestamp(),
        "exp": (now - Duration::hours(1)).timestamp(),
    })
}

/// Untyped HS256 gate using the test secret.
#[allow(dead_code)]
pub fn untyped_gate() -> AuthGate {
    AuthGate::new(Verifier::untyped(
        Algorithm::HS256,
        StaticKey::from_secret(TEST_SECRET.as_bytes()),
    ))
}

#[allow(dead_code)]
pub fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[allow(dead_code)]
pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
