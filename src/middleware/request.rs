//! Read-only view of an incoming request used by token extractors.
//!
//! Exposes header lookup and form field lookup. Form fields come from the
//! query string first and then, once the gate has read it, from an
//! `application/x-www-form-urlencoded` or `multipart/form-data` body. The
//! body is only buffered when the first extraction attempt came up empty,
//! and it is handed back intact so downstream handlers can still read it.

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Multipart},
    http::{HeaderValue, Method, Request, Uri, header, request::Parts},
};

use crate::utils::errors::GateError;

const URLENCODED_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormEncoding {
    UrlEncoded,
    Multipart,
}

#[derive(Debug)]
pub struct GateRequest {
    parts: Parts,
    body: Option<Bytes>,
    form: Vec<(String, String)>,
}

impl GateRequest {
    /// Builds a view over an already-split request. Only query string
    /// fields are visible until [`read_form`](Self::read_form) runs.
    pub fn from_parts(parts: Parts) -> Self {
        let form = parse_pairs(parts.uri.query().unwrap_or_default().as_bytes());
        Self {
            parts,
            body: None,
            form,
        }
    }

    /// Whether the content type announces a body with form fields.
    pub(crate) fn has_form_body(&self) -> bool {
        form_encoding(&self.parts).is_some()
    }

    /// Buffers the form body (at most `limit` bytes) and appends its text
    /// fields after the query string fields.
    pub(crate) async fn read_form(&mut self, body: Body, limit: usize) -> Result<(), GateError> {
        let Some(encoding) = form_encoding(&self.parts) else {
            return Ok(());
        };

        let bytes = axum::body::to_bytes(body, limit)
            .await
            .map_err(|err| GateError::UnreadableForm(err.to_string()))?;

        let fields = match encoding {
            FormEncoding::UrlEncoded => parse_pairs(&bytes),
            FormEncoding::Multipart => multipart_fields(&self.parts, bytes.clone()).await?,
        };

        self.form.extend(fields);
        self.body = Some(bytes);
        Ok(())
    }

    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.parts.headers.get(name)
    }

    /// First value of the form field `name`, query string before body.
    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    pub(crate) fn parts_mut(&mut self) -> &mut Parts {
        &mut self.parts
    }

    /// Returns the request parts and the buffered body, if one was read.
    pub(crate) fn into_parts(self) -> (Parts, Option<Bytes>) {
        (self.parts, self.body)
    }
}

fn form_encoding(parts: &Parts) -> Option<FormEncoding> {
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())?;

    if content_type.starts_with(URLENCODED_CONTENT_TYPE) {
        Some(FormEncoding::UrlEncoded)
    } else if content_type.starts_with(MULTIPART_CONTENT_TYPE) {
        Some(FormEncoding::Multipart)
    } else {
        None
    }
}

fn parse_pairs(input: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

/// Text fields of a buffered multipart body; file parts are skipped.
async fn multipart_fields(parts: &Parts, bytes: Bytes) -> Result<Vec<(String, String)>, GateError> {
    let mut request = Request::new(Body::from(bytes));
    if let Some(content_type) = parts.headers.get(header::CONTENT_TYPE) {
        request
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type.clone());
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|err| GateError::UnreadableForm(err.to_string()))?;

    let mut fields = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| GateError::UnreadableForm(err.to_string()))?
    {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|err| GateError::UnreadableForm(err.to_string()))?;
        fields.push((name, value));
    }

    Ok(fields)
}
