//! Provider trait — the abstraction over the upstream completion API.
//!
//! A Provider knows how to send a conversation to an LLM and get a response
//! back, either as a complete message or as a stream of incremental chunks.
//! Streaming is the primary path: chunks carry text deltas and raw indexed
//! tool-call deltas that the orchestrator reassembles.

use crate::error::ProviderError;
use crate::message::{Message, MessageToolCall};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gpt-4o")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Available tools the model can call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,

    /// Whether the model may pick a tool on its own
    #[serde(default)]
    pub tool_choice: ToolChoice,

    /// Whether to stream the response
    #[serde(default)]
    pub stream: bool,
}

fn default_temperature() -> f32 {
    0.7
}

/// Tool-choice policy for one streaming round.
///
/// `Auto` lets the model decide whether to call a tool; `None` forbids tool
/// calls entirely (the final-answer round offers no tools).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    #[default]
    Auto,
    None,
}

/// A tool definition sent to the LLM so it knows what tools it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// A complete (non-streaming) response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated message
    pub message: Message,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// One fragment of an in-progress tool call.
///
/// The wire format may split a single invocation — even a single JSON token
/// of its arguments — across many fragments. Fragments for one invocation
/// share a stable `index` and must be concatenated in arrival order, never
/// overwritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallDelta {
    /// Which in-progress tool call this fragment belongs to
    pub index: u32,

    /// Invocation id fragment, if present in this chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Tool name fragment, if present in this chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Arguments-text fragment, if present in this chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

/// A single chunk in a streaming response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Partial content delta
    #[serde(default)]
    pub content: Option<String>,

    /// Raw tool-call delta fragments carried by this chunk
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_call_deltas: Vec<ToolCallDelta>,

    /// Whether this is the final chunk
    #[serde(default)]
    pub done: bool,
}

/// The core Provider trait.
///
/// The orchestration loop calls `stream()` without knowing which backend is
/// in use. A returned stream must be abandonable: dropping the receiver
/// stops the producer promptly and releases the upstream connection.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;

    /// Send a request and get a stream of response chunks.
    ///
    /// Default implementation calls `complete()` and replays the result as a
    /// content chunk plus whole-call deltas, followed by a done chunk.
    async fn stream(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<StreamChunk, ProviderError>>,
        ProviderError,
    > {
        let response = self.complete(request).await?;
        let (tx, rx) = tokio::sync::mpsc::channel(4);

        let content = if response.message.content.is_empty() {
            None
        } else {
            Some(response.message.content)
        };
        let tool_call_deltas = whole_call_deltas(&response.message.tool_calls);

        if content.is_some() || !tool_call_deltas.is_empty() {
            let _ = tx
                .send(Ok(StreamChunk {
                    content,
                    tool_call_deltas,
                    done: false,
                }))
                .await;
        }
        let _ = tx
            .send(Ok(StreamChunk {
                done: true,
                ..StreamChunk::default()
            }))
            .await;

        Ok(rx)
    }

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

/// Turn finalized tool calls into one unfragmented delta each.
fn whole_call_deltas(calls: &[MessageToolCall]) -> Vec<ToolCallDelta> {
    calls
        .iter()
        .enumerate()
        .map(|(i, tc)| ToolCallDelta {
            index: i as u32,
            id: Some(tc.id.clone()),
            name: Some(tc.name.clone()),
            arguments: Some(tc.arguments.clone()),
        })
        .collect()
}
