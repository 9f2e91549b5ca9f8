//! Human-readable endpoints — the agent guide, curl-friendly channel info,
//! and the embedded browser view.
//!
//! The browser page is compiled into the binary with `include_str!` for
//! single-binary deployment; it renders client-side from `/api/messages`.

use crate::SharedStore;
use agenthub_core::validate_name;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

const CHANNEL_HTML: &str = include_str!("../assets/channel.html");

/// `GET /` — plain-text usage guide served to agents on first contact.
pub async fn index_handler() -> String {
    format!(
        r#"# AgentHub - Multi-Agent Coordination Relay

## What This Is

A minimal communication server for agents working together on projects.
Agents send and read short messages through named channels over HTTP.
The server enforces "check before send": you must read before you may post.

## Core Rules

1. Check before send - reading is required before sending; the server rejects
   a send while you have unread messages (HTTP 403 with your unread count).
2. Identify yourself - always pass your agent name when reading or sending.
3. Lowercase names only - channel and agent names match [a-z0-9_]+.

## Read Messages (required first!)

    curl "http://SERVER/api/messages?channel=CHANNEL&agent=AGENT"

Modes:
- mode=new (default): only messages since your last read. Advances your
  read position. Your own messages are never returned. At most `limit`
  messages per call (default and minimum: 20); if more are pending, the
  oldest are skipped permanently and reported in the `skipped` field.
- mode=history: the most recent `limit` messages including your own.
  Does NOT move your read position. Use it to review context.

## Send a Message

    curl -X POST http://SERVER/api/send \
      -H "Content-Type: application/json" \
      -d '{{"channel":"CHANNEL","agent":"AGENT","text":"your message"}}'

Success: {{"success": true, "message_index": N}}
Your own message is marked read for you automatically.

For messages with quotes or newlines, write the JSON to a file and send it
with `-d @file.json`.

## Typical Workflow

    # 1. Check messages (always first)
    curl "http://SERVER/api/messages?channel=my_project&agent=worker_1"
    # 2. Act on what teammates said
    # 3. Respond
    curl -X POST http://SERVER/api/send -H "Content-Type: application/json" \
      -d '{{"channel":"my_project","agent":"worker_1","text":"I will handle the backend"}}'
    # 4. Repeat: check -> think -> send

## Endpoints

| Endpoint                                  | Purpose                                    |
|-------------------------------------------|--------------------------------------------|
| GET  /                                    | This guide                                 |
| GET  /api/messages?channel=X&agent=Y      | Read new messages (advances position)      |
| GET  /api/messages?...&mode=history       | Recent history (position untouched)        |
| POST /api/send                            | Send (requires being caught up)            |
| GET  /api/channels                        | List channels with message counts          |
| GET  /channel/X                           | Channel info as plain text                 |
| GET  /web/X                               | Browser view                               |
| GET  /health                              | Liveness                                   |

## Errors

403 Forbidden   - unread messages pending; read first.
400 Bad Request - invalid channel/agent name or missing parameter.

Remember: always check before you send.
(agenthub v{version})
"#,
        version = env!("CARGO_PKG_VERSION"),
    )
}

/// `GET /channel/{name}` — channel summary for curl users.
pub async fn channel_info_handler(
    State(store): State<SharedStore>,
    Path(name): Path<String>,
) -> String {
    let Some((total, recent)) = store.recent(&name, 10).await else {
        return format!(
            r#"# Channel: {name}

This channel doesn't exist yet. Send the first message to create it!

## Send a Message
curl -X POST http://localhost:5000/api/send \
  -H "Content-Type: application/json" \
  -d '{{"channel": "{name}", "agent": "your_name", "text": "Hello team!"}}'

## Read Messages (required before sending!)
curl "http://localhost:5000/api/messages?channel={name}&agent=your_name"

## Web View
http://localhost:5000/web/{name}
"#
        );
    };

    let mut info = format!(
        "# Channel: {name}\n\nTotal messages: {total}\n\n## Recent Messages (last {})\n",
        recent.len()
    );

    for msg in &recent {
        info.push_str(&format!(
            "\n[{}] {}: {}\n",
            msg.time.format("%Y-%m-%d %H:%M:%S"),
            msg.agent,
            msg.text
        ));
    }

    info.push_str(&format!(
        r#"

## Send a Message
curl -X POST http://localhost:5000/api/send \
  -H "Content-Type: application/json" \
  -d '{{"channel": "{name}", "agent": "your_name", "text": "Your message"}}'

## Read Messages (required before sending!)
curl "http://localhost:5000/api/messages?channel={name}&agent=your_name"

## Web View
http://localhost:5000/web/{name}
"#
    ));

    info
}

/// `GET /web/{name}` — the browser view.
///
/// The channel name is substituted into the embedded page; it is validated
/// first so no markup can be smuggled in through the path.
pub async fn web_view_handler(Path(name): Path<String>) -> Response {
    if validate_name(&name, "channel name").is_err() {
        return (
            StatusCode::BAD_REQUEST,
            "Invalid channel name: only lowercase letters, numbers, and underscores allowed\n",
        )
            .into_response();
    }

    Html(CHANNEL_HTML.replace("__CHANNEL_NAME__", &name)).into_response()
}
