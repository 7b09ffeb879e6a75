use std::collections::BTreeMap;

use axum::{Form, Json};
use tracing::instrument;

use crate::middleware::identity::{IdentityClaims, IdentityToken};
use crate::modules::profile::model::{AccessClaims, FormEcho};

/// Claims of the caller's access token.
#[instrument(skip_all)]
pub async fn get_me(IdentityClaims(claims): IdentityClaims<AccessClaims>) -> Json<AccessClaims> {
    Json(claims)
}

/// Header of the caller's access token.
pub async fn get_token_header(token: IdentityToken) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "alg": token.header.alg,
        "kid": token.header.kid,
        "typ": token.header.typ,
    }))
}

/// Echoes the submitted form field names; the body is readable here even
/// when the token came from its `_jwt` field.
#[instrument(skip_all)]
pub async fn post_form(
    IdentityClaims(claims): IdentityClaims<AccessClaims>,
    Form(fields): Form<BTreeMap<String, String>>,
) -> Json<FormEcho> {
    Json(FormEcho {
        subject: claims.subject().map(str::to_string),
        fields: fields.into_keys().collect(),
    })
}
