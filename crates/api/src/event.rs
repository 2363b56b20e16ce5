//! Serverless function adapter.
//!
//! Function runtimes hand over an event shaped like
//! `{httpMethod, path, queryStringParameters, headers, body, isBase64Encoded}`
//! and expect `{statusCode, headers, body, isBase64Encoded}` back. The
//! adapter turns the event into an HTTP request, runs it through the router
//! and converts the response, so the same handlers serve both runtimes.

use std::collections::{BTreeMap, HashMap};

use axum::{
    Router,
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use streamhub_common::{AppError, AppResult};
use tower::ServiceExt;

/// Incoming function event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpEvent {
    /// HTTP method, `GET` when absent.
    pub http_method: Option<String>,
    /// Request path, e.g. `/api`. Required to pick an endpoint.
    pub path: Option<String>,
    /// Decoded query parameters.
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Request headers.
    pub headers: Option<HashMap<String, String>>,
    /// Raw body, base64 encoded when `is_base64_encoded` is set.
    pub body: Option<String>,
    /// Whether `body` is base64 encoded.
    pub is_base64_encoded: bool,
}

/// Outgoing function response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEventResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Response body; base64 when it is not valid UTF-8.
    pub body: String,
    /// Whether `body` is base64 encoded.
    pub is_base64_encoded: bool,
}

/// Drive `router` with one function event.
pub async fn handle_event(router: Router, event: HttpEvent) -> AppResult<HttpEventResponse> {
    let request = into_request(event)?;
    let response = match router.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read response body: {e}")))?;

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let (body, is_base64_encoded) = match String::from_utf8(bytes.to_vec()) {
        Ok(text) => (text, false),
        Err(_) => (STANDARD.encode(&bytes), true),
    };

    Ok(HttpEventResponse {
        status_code: parts.status.as_u16(),
        headers,
        body,
        is_base64_encoded,
    })
}

fn into_request(event: HttpEvent) -> AppResult<Request<Body>> {
    let method = event
        .http_method
        .as_deref()
        .unwrap_or("GET")
        .parse::<Method>()
        .map_err(|_| AppError::BadRequest("Invalid HTTP method".to_string()))?;

    let path = event.path.as_deref().unwrap_or("/");
    let uri = match &event.query_string_parameters {
        Some(params) if !params.is_empty() => format!("{path}?{}", encode_query(params)),
        _ => path.to_string(),
    };

    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in event.headers.iter().flatten() {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => builder = builder.header(name, value),
            _ => tracing::warn!(header = %name, "Skipping invalid event header"),
        }
    }

    let body = match event.body {
        Some(body) if event.is_base64_encoded => STANDARD
            .decode(body)
            .map_err(|_| AppError::BadRequest("Invalid base64 body".to_string()))?,
        Some(body) => body.into_bytes(),
        None => Vec::new(),
    };

    builder
        .body(Body::from(body))
        .map_err(|e| AppError::BadRequest(format!("Invalid event: {e}")))
}

/// Encode parameters in a stable order.
fn encode_query(params: &HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = params.iter().collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
