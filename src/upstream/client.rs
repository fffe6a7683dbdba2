//! Upstream user API client.
//!
//! # Responsibilities
//! - Issue exactly one HTTP call per operation (no retries)
//! - Enforce the per-call timeout configured for the upstream
//! - Propagate the inbound request ID
//! - Classify failures into `UpstreamError`

use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::UpstreamConfig;
use crate::http::request::{RequestId, X_REQUEST_ID};
use crate::observability::metrics;
use crate::upstream::error::{UpstreamError, UpstreamResult};
use crate::users::{User, UserId, UserList};

/// Client for the upstream user collection.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: Client,
    users_url: String,
}

impl UpstreamClient {
    /// Build a client from the upstream section of the configuration.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone());

        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let http = builder.build().map_err(UpstreamError::Client)?;
        let users_url = format!("{}/api/users", config.base_url.trim_end_matches('/'));

        tracing::debug!(users_url = %users_url, "Upstream client initialized");

        Ok(Self { http, users_url })
    }

    /// URL of the user collection.
    pub fn users_url(&self) -> &str {
        &self.users_url
    }

    fn user_url(&self, id: UserId) -> String {
        format!("{}/{}", self.users_url, id)
    }

    /// `GET /api/users`. Any non-2xx status is an error.
    pub async fn list_users(&self, request_id: &RequestId) -> UpstreamResult<UserList> {
        let response = self
            .execute("list", self.http.get(&self.users_url), request_id)
            .await?;

        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }

        decode(response).await
    }

    /// `POST /api/users`. Only `201 Created` is accepted.
    pub async fn create_user(&self, user: &User, request_id: &RequestId) -> UpstreamResult<User> {
        let body = serde_json::to_vec(user).map_err(UpstreamError::Encode)?;
        let request = with_json(self.http.post(&self.users_url), body);
        let response = self.execute("create", request, request_id).await?;

        if response.status() != StatusCode::CREATED {
            return Err(unexpected_status(response).await);
        }

        decode(response).await
    }

    /// `PUT /api/users/{id}`. Only `200 OK` is accepted.
    pub async fn update_user(
        &self,
        id: UserId,
        user: &User,
        request_id: &RequestId,
    ) -> UpstreamResult<User> {
        let body = serde_json::to_vec(user).map_err(UpstreamError::Encode)?;
        let request = with_json(self.http.put(self.user_url(id)), body);
        let response = self.execute("update", request, request_id).await?;

        if response.status() != StatusCode::OK {
            return Err(unexpected_status(response).await);
        }

        decode(response).await
    }

    /// `DELETE /api/users/{id}`. `200` and `204` both count as deleted.
    pub async fn delete_user(&self, id: UserId, request_id: &RequestId) -> UpstreamResult<()> {
        let response = self
            .execute("delete", self.http.delete(self.user_url(id)), request_id)
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(UpstreamError::NotFound),
            _ => Err(unexpected_status(response).await),
        }
    }

    /// Send one request, recording its outcome.
    async fn execute(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        request_id: &RequestId,
    ) -> UpstreamResult<Response> {
        let start = Instant::now();
        let request = match HeaderValue::from_str(request_id.as_str()) {
            Ok(value) => request.header(X_REQUEST_ID, value),
            Err(_) => request,
        };

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!(
                    request_id = %request_id,
                    operation,
                    status = %status,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream responded"
                );
                metrics::record_upstream(operation, &status.as_u16().to_string(), start);
                Ok(response)
            }
            Err(e) => {
                let err = UpstreamError::Transport(e);
                tracing::error!(
                    request_id = %request_id,
                    operation,
                    kind = err.kind(),
                    error = %err,
                    "Upstream request failed"
                );
                metrics::record_upstream(operation, err.kind(), start);
                Err(err)
            }
        }
    }
}

fn with_json(request: RequestBuilder, body: Vec<u8>) -> RequestBuilder {
    request
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
}

async fn decode<T: DeserializeOwned>(response: Response) -> UpstreamResult<T> {
    let bytes = response.bytes().await.map_err(UpstreamError::Body)?;
    serde_json::from_slice(&bytes).map_err(UpstreamError::Decode)
}

async fn unexpected_status(response: Response) -> UpstreamError {
    let status = response.status();
    let details = dump_response(response).await;
    UpstreamError::Status { status, details }
}

/// Render a response the way it appeared on the wire: status line, headers,
/// blank line, body. A body that cannot be read is left out.
///
/// Header names are written as the `http` crate stores them, which is
/// lowercase; they are not re-canonicalized to `Content-Type` form.
async fn dump_response(response: Response) -> String {
    let mut dump = format!(
        "{:?} {} {}\r\n",
        response.version(),
        response.status().as_u16(),
        response.status().canonical_reason().unwrap_or("")
    );
    for (name, value) in response.headers() {
        dump.push_str(name.as_str());
        dump.push_str(": ");
        dump.push_str(&String::from_utf8_lossy(value.as_bytes()));
        dump.push_str("\r\n");
    }
    dump.push_str("\r\n");

    match response.text().await {
        Ok(body) => dump.push_str(&body),
        Err(e) => tracing::warn!(error = %e, "Failed to read upstream body for dump"),
    }
    dump
}
