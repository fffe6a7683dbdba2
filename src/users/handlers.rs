//! HTTP handlers for the `/users` resource.
//!
//! Each handler validates its input, performs exactly one upstream call and
//! translates the outcome. Input errors never reach the upstream.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::http::request::RequestId;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::upstream::UpstreamError;
use crate::users::types::{User, UserId, UserInput, UserList};

/// `GET /users`
pub async fn list_users(
    State(state): State<AppState>,
    request_id: RequestId,
) -> Result<Json<UserList>, ApiError> {
    let users = state
        .upstream
        .list_users(&request_id)
        .await
        .map_err(|e| collection_error(&request_id, e))?;

    Ok(Json(users))
}

/// `GET /users/{id}`
///
/// The upstream has no single-item lookup, so the collection is fetched and
/// scanned for the first matching id.
pub async fn get_user(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(raw_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&raw_id)?;

    let users = state
        .upstream
        .list_users(&request_id)
        .await
        .map_err(|e| collection_error(&request_id, e))?;

    users
        .find(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// `POST /users`
///
/// A non-201 upstream answer is passed through with its own status code and
/// a dump of the raw upstream response.
pub async fn create_user(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Bytes,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user: User = decode_body(&body, &request_id, "Invalid input data")?;

    match state.upstream.create_user(&user, &request_id).await {
        Ok(created) => {
            tracing::info!(request_id = %request_id, user_id = created.id, "User created");
            Ok((StatusCode::CREATED, Json(created)))
        }
        Err(UpstreamError::Status { status, details }) => {
            tracing::warn!(request_id = %request_id, status = %status, "Upstream rejected user creation");
            Err(ApiError::new(status, "Failed to create user").with_details(details))
        }
        Err(e) => {
            log_failure(&request_id, "create", &e);
            Err(ApiError::internal(match e {
                UpstreamError::Encode(_) => "Failed to marshal user data",
                UpstreamError::Body(_) => "Failed to read response body",
                UpstreamError::Decode(_) => "Failed to unmarshal response",
                _ => "Failed to send request",
            }))
        }
    }
}

/// `PUT /users/{id}`
///
/// Every upstream failure other than an unreadable success body collapses to
/// "Failed to update user".
pub async fn update_user(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&raw_id)?;
    let user: User = decode_body(&body, &request_id, "Invalid input")?;

    state
        .upstream
        .update_user(id, &user, &request_id)
        .await
        .map(Json)
        .map_err(|e| {
            log_failure(&request_id, "update", &e);
            ApiError::internal(match e {
                UpstreamError::Encode(_) => "Failed to marshal request",
                UpstreamError::Decode(_) => "Failed to parse response",
                _ => "Failed to update user",
            })
        })
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;

    match state.upstream.delete_user(id, &request_id).await {
        Ok(()) => {
            tracing::info!(request_id = %request_id, user_id = id.get(), "User deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(UpstreamError::NotFound) => Err(ApiError::not_found("User not found")),
        Err(e) => {
            log_failure(&request_id, "delete", &e);
            Err(ApiError::internal(match e {
                UpstreamError::Transport(_) => "Failed to send request",
                _ => "Failed to delete user",
            }))
        }
    }
}

fn parse_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse::<UserId>().map_err(|e| {
        tracing::debug!(error = %e, "Rejected path id");
        ApiError::bad_request("Invalid ID")
    })
}

fn decode_body(
    body: &[u8],
    request_id: &RequestId,
    message: &'static str,
) -> Result<User, ApiError> {
    serde_json::from_slice::<UserInput>(body)
        .map(User::from)
        .map_err(|e| {
            tracing::debug!(request_id = %request_id, error = %e, "Rejected request body");
            ApiError::bad_request(message)
        })
}

fn collection_error(request_id: &RequestId, err: UpstreamError) -> ApiError {
    log_failure(request_id, "list", &err);
    match err {
        UpstreamError::Decode(_) => ApiError::internal("Failed to parse data"),
        _ => ApiError::internal("Failed to fetch data"),
    }
}

fn log_failure(request_id: &RequestId, operation: &'static str, err: &UpstreamError) {
    match err {
        // Already logged by the client.
        UpstreamError::Transport(_) => {}
        _ => tracing::warn!(
            request_id = %request_id,
            operation,
            kind = err.kind(),
            error = %err,
            "Upstream call did not succeed"
        ),
    }
}
