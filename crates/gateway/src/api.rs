//! JSON API handlers — the endpoints agents poll.
//!
//! Request/response DTOs mirror the wire format the original hub spoke, so
//! existing agent scripts keep working: `POST /api/send` answers
//! `{success, message_index}`, `GET /api/messages` answers the read result
//! with `messages`, `total`, `new_messages`, `skipped`, and `mode`.

use crate::SharedStore;
use agenthub_core::{ChannelSummary, Error as CoreError, ReadMode, ReadResult};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            unread_count: None,
            hint: None,
        }
    }
}

/// Map a core error to its HTTP shape.
///
/// Validation → 400, unread-pending → 403 (the protocol signal), anything
/// touching storage → 500.
fn error_response(err: CoreError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        CoreError::Validation { message } => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
        }
        CoreError::UnreadPending { unread_count, hint } => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "You have unread messages. Please check messages first.".into(),
                unread_count: Some(unread_count),
                hint: Some(hint),
            }),
        ),
        err @ (CoreError::Persistence { .. } | CoreError::Serialization(_)) => {
            error!(error = %err, "Store operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(err.to_string())),
            )
        }
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

// ── Send ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    agent: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub message_index: usize,
}

pub async fn send_handler(
    State(store): State<SharedStore>,
    Json(payload): Json<SendRequest>,
) -> Result<Json<SendResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Empty strings count as missing, same as the original hub.
    let (Some(channel), Some(agent), Some(text)) = (
        payload.channel.filter(|s| !s.is_empty()),
        payload.agent.filter(|s| !s.is_empty()),
        payload.text.filter(|s| !s.is_empty()),
    ) else {
        return Err(bad_request("Missing channel, agent, or text"));
    };

    let receipt = store
        .send(&channel, &agent, &text)
        .await
        .map_err(error_response)?;

    info!(channel, agent, index = receipt.index, "Message sent");
    Ok(Json(SendResponse {
        success: true,
        message_index: receipt.index,
    }))
}

// ── Messages ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MessagesQuery {
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    agent: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    /// Kept as a string so a non-integer gets our error message instead of
    /// a generic extractor rejection.
    #[serde(default)]
    limit: Option<String>,
}

pub async fn messages_handler(
    State(store): State<SharedStore>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<ReadResult>, (StatusCode, Json<ErrorResponse>)> {
    let Some(channel) = query.channel.filter(|s| !s.is_empty()) else {
        return Err(bad_request("Missing channel parameter"));
    };
    let Some(agent) = query.agent.filter(|s| !s.is_empty()) else {
        return Err(bad_request("Missing agent parameter"));
    };

    let mode: ReadMode = match query.mode.as_deref() {
        None => ReadMode::New,
        Some(s) => s.parse().map_err(error_response)?,
    };

    // Negative limits are allowed and raised to the store's floor, matching
    // the lenient parsing agent scripts already rely on.
    let limit: usize = match query.limit.as_deref() {
        None => 0, // store clamps to its floor
        Some(s) => s
            .parse::<i64>()
            .map_err(|_| bad_request("Invalid limit parameter. Must be an integer."))?
            .max(0) as usize,
    };

    let result = store
        .read(&channel, &agent, mode, limit)
        .await
        .map_err(error_response)?;

    Ok(Json(result))
}

// ── Channels ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ChannelListResponse {
    pub channels: Vec<ChannelSummary>,
}

pub async fn list_channels_handler(
    State(store): State<SharedStore>,
) -> Json<ChannelListResponse> {
    Json(ChannelListResponse {
        channels: store.list_channels().await,
    })
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_router;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn send_and_read_flow() {
        let app = test_router();

        let (status, body) = post_json(
            &app,
            "/api/send",
            json!({"channel": "proj", "agent": "worker_1", "text": "Task A done"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message_index"], 0);

        let (status, body) =
            get_json(&app, "/api/messages?channel=proj&agent=worker_2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["new_messages"], 1);
        assert_eq!(body["total"], 1);
        assert_eq!(body["mode"], "new");
        assert_eq!(body["messages"][0]["agent"], "worker_1");
        assert_eq!(body["messages"][0]["text"], "Task A done");
    }

    #[tokio::test]
    async fn unread_pending_maps_to_forbidden() {
        let app = test_router();

        post_json(
            &app,
            "/api/send",
            json!({"channel": "proj", "agent": "a", "text": "hello"}),
        )
        .await;

        // b never read — its send is rejected with the unread count
        let (status, body) = post_json(
            &app,
            "/api/send",
            json!({"channel": "proj", "agent": "b", "text": "hi"}),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["unread_count"], 1);
        assert!(body["hint"].as_str().unwrap().contains("/api/messages"));
    }

    #[tokio::test]
    async fn missing_send_fields_are_bad_request() {
        let app = test_router();

        let (status, body) =
            post_json(&app, "/api/send", json!({"channel": "proj"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing channel, agent, or text");

        // Empty text counts as missing
        let (status, _) = post_json(
            &app,
            "/api/send",
            json!({"channel": "proj", "agent": "a", "text": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_names_are_bad_request() {
        let app = test_router();

        let (status, body) = post_json(
            &app,
            "/api/send",
            json!({"channel": "Proj-1", "agent": "Agent", "text": "x"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("channel name"));
    }

    #[tokio::test]
    async fn messages_query_validation() {
        let app = test_router();

        let (status, body) = get_json(&app, "/api/messages?agent=a").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing channel parameter");

        let (status, body) = get_json(&app, "/api/messages?channel=proj").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing agent parameter");

        let (status, body) =
            get_json(&app, "/api/messages?channel=proj&agent=a&mode=latest").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("mode"));

        let (status, body) =
            get_json(&app, "/api/messages?channel=proj&agent=a&limit=lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("limit"));
    }

    #[tokio::test]
    async fn negative_limit_is_raised_to_floor() {
        let app = test_router();

        post_json(
            &app,
            "/api/send",
            json!({"channel": "proj", "agent": "a", "text": "hello"}),
        )
        .await;

        let (status, body) =
            get_json(&app, "/api/messages?channel=proj&agent=b&limit=-5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["new_messages"], 1);
        assert_eq!(body["skipped"], 0);
    }

    #[tokio::test]
    async fn history_mode_over_http() {
        let app = test_router();

        post_json(
            &app,
            "/api/send",
            json!({"channel": "proj", "agent": "a", "text": "one"}),
        )
        .await;

        let (status, body) =
            get_json(&app, "/api/messages?channel=proj&agent=a&mode=history").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "history");
        assert_eq!(body["returned"], 1);
        assert_eq!(body["new_messages"], 0);
        // Own message included in history
        assert_eq!(body["messages"][0]["agent"], "a");
    }

    #[tokio::test]
    async fn reading_unknown_channel_returns_empty() {
        let app = test_router();

        let (status, body) =
            get_json(&app, "/api/messages?channel=ghost&agent=a").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert_eq!(body["messages"], json!([]));

        // And it was not created
        let (_, body) = get_json(&app, "/api/channels").await;
        assert_eq!(body["channels"], json!([]));
    }

    #[tokio::test]
    async fn channel_listing() {
        let app = test_router();

        post_json(
            &app,
            "/api/send",
            json!({"channel": "beta", "agent": "a", "text": "x"}),
        )
        .await;
        post_json(
            &app,
            "/api/send",
            json!({"channel": "alpha", "agent": "a", "text": "x"}),
        )
        .await;

        let (status, body) = get_json(&app, "/api/channels").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["channels"][0]["name"], "alpha");
        assert_eq!(body["channels"][1]["name"], "beta");
        assert_eq!(body["channels"][0]["message_count"], 1);
    }
}
