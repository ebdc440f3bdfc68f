//! The streaming chat endpoint and its request adapter.
//!
//! `POST /api/chat/sse` — parse the inbound conversation, run the
//! orchestration loop, and relay its events as SSE `data:` frames in
//! order, unbuffered.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::sse::{Event as SseEvent, Sse},
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use crate::SharedGatewayState;
use chatrelay_core::message::{Conversation, Message, Role};
use chatrelay_orchestrator::ChatOrchestrator;

/// The inbound request body.
///
/// Unrecognized extra fields are ignored for forward compatibility.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    messages: Vec<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    role: String,
    content: IncomingContent,
}

/// Content is either a plain string or a list of structured parts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IncomingContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

impl ChatRequest {
    /// Validate roles and flatten content into the history model.
    ///
    /// Runs before any upstream call: a malformed message is a client
    /// error, not a stream failure.
    pub fn into_conversation(self) -> Result<Conversation, String> {
        let mut messages = Vec::with_capacity(self.messages.len());

        for (i, incoming) in self.messages.into_iter().enumerate() {
            let role = Role::parse(&incoming.role)
                .ok_or_else(|| format!("invalid role '{}' in messages[{i}]", incoming.role))?;

            let text = match incoming.content {
                IncomingContent::Text(text) => text,
                IncomingContent::Parts(parts) => parts
                    .into_iter()
                    .filter(|p| p.kind == "text")
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join(""),
            };

            messages.push(Message::with_role(role, text));
        }

        Ok(Conversation::from_messages(messages))
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `POST /api/chat/sse` — send a conversation, receive an SSE event stream.
///
/// The stream ends when the transport closes; no terminal sentinel event is
/// sent.
pub async fn chat_sse_handler(
    State(state): State<SharedGatewayState>,
    Json(payload): Json<ChatRequest>,
) -> Result<
    Sse<impl futures::Stream<Item = Result<SseEvent, Infallible>>>,
    (StatusCode, Json<ErrorResponse>),
> {
    info!(messages = payload.messages.len(), "chat/sse request");

    let conversation = payload.into_conversation().map_err(|error| {
        (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
    })?;

    let mut orchestrator = ChatOrchestrator::new(
        state.provider.clone(),
        &state.model,
        state.temperature,
        state.tools.clone(),
    );
    if let Some(max_tokens) = state.max_tokens {
        orchestrator = orchestrator.with_max_tokens(max_tokens);
    }

    let rx = orchestrator.run(conversation);

    let stream = ReceiverStream::new(rx).map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_default();
        Ok(SseEvent::default().data(data))
    });

    Ok(Sse::new(stream))
}
