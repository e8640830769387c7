//! HTTP plumbing shared by the hosted backends.

use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::error::{InsightError, Result};

/// Status and body of a completed request.
#[derive(Debug)]
pub(crate) struct Reply {
    pub status: StatusCode,
    pub body: String,
}

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| InsightError::model(format!("Failed to create HTTP client: {e}")))
}

/// Sends the request and reads the whole body.
///
/// Transport failures become model errors naming `service`. HTTP error
/// statuses are returned to the caller, which knows how to read them.
pub(crate) async fn send(request: RequestBuilder, service: &str) -> Result<Reply> {
    let response = request.send().await.map_err(|e| transport_error(&e, service))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| InsightError::model(format!("Failed to read {service} response: {e}")))?;

    debug!(%status, body_len = body.len(), service, "Model backend responded");
    Ok(Reply { status, body })
}

fn transport_error(error: &reqwest::Error, service: &str) -> InsightError {
    let target = error
        .url()
        .map(|url| format!(" at {url}"))
        .unwrap_or_default();

    if error.is_timeout() {
        InsightError::model(format!("Request to {service}{target} timed out"))
    } else if error.is_connect() {
        InsightError::model(format!("Failed to connect to {service}{target}"))
    } else {
        InsightError::model(format!("Request to {service} failed: {error}"))
    }
}
