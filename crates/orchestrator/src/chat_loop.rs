//! The two-round streaming orchestration loop.

use crate::accumulator::ToolCallAccumulator;
use crate::stream_event::ChatStreamEvent;
use chatrelay_core::error::ToolError;
use chatrelay_core::message::{Conversation, Message, MessageToolCall};
use chatrelay_core::provider::{Provider, ProviderRequest, ToolChoice};
use chatrelay_core::tool::{ToolCall, ToolRegistry};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How many tool-execution cycles a single request may run.
///
/// One cycle keeps latency bounded: the model gets exactly one chance to
/// call tools, then must answer in text. Raising this is a deliberate,
/// localized change, not a structural one.
pub const MAX_TOOL_ROUNDS: usize = 1;

/// Drives one request through the streaming rounds.
///
/// All collaborators are injected at construction so tests can substitute
/// scripted providers and registries. The orchestrator itself is cheap to
/// build per request; the provider and registry are shared behind `Arc`.
pub struct ChatOrchestrator {
    /// The upstream completion client
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// Tool registry
    tools: Arc<ToolRegistry>,
}

impl ChatOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
        }
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Run the orchestration loop for one conversation.
    ///
    /// Returns a receiver of outward events; the loop runs in a background
    /// task. The channel closes when the conversation resolves, when the
    /// upstream stream fails, or when the caller drops the receiver
    /// (cancellation — no further upstream chunks are consumed).
    pub fn run(&self, conversation: Conversation) -> mpsc::Receiver<ChatStreamEvent> {
        let (tx, rx) = mpsc::channel::<ChatStreamEvent>(128);

        let provider = self.provider.clone();
        let model = self.model.clone();
        let temperature = self.temperature;
        let max_tokens = self.max_tokens;
        let tools = self.tools.clone();

        tokio::spawn(async move {
            drive(provider, model, temperature, max_tokens, tools, conversation, tx).await;
        });

        rx
    }
}

/// The state machine: stream → accumulate → execute tools → stream again.
async fn drive(
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    mut conversation: Conversation,
    tx: mpsc::Sender<ChatStreamEvent>,
) {
    let tool_defs = tools.definitions();
    let mut tool_rounds = 0usize;

    info!(
        model = %model,
        messages = conversation.len(),
        tools = tool_defs.len(),
        "Chat orchestration starting"
    );

    loop {
        let offering_tools = tool_rounds < MAX_TOOL_ROUNDS && !tool_defs.is_empty();

        let request = ProviderRequest {
            model: model.clone(),
            messages: conversation.messages.clone(),
            temperature,
            max_tokens,
            tools: if offering_tools {
                tool_defs.clone()
            } else {
                Vec::new()
            },
            tool_choice: if offering_tools {
                ToolChoice::Auto
            } else {
                ToolChoice::None
            },
            stream: true,
        };

        let mut chunks = match provider.stream(request).await {
            Ok(rx) => rx,
            Err(e) => {
                warn!(error = %e, "Provider stream failed to start");
                return;
            }
        };

        let mut accumulator = ToolCallAccumulator::new();

        while let Some(chunk_result) = chunks.recv().await {
            let chunk = match chunk_result {
                Ok(chunk) => chunk,
                Err(e) => {
                    // Fatal to the request: close the outward stream with no
                    // additional framing.
                    warn!(error = %e, "Upstream stream failed mid-round");
                    return;
                }
            };

            // Forward text immediately — never buffered.
            if let Some(text) = &chunk.content
                && !text.is_empty()
                && tx
                    .send(ChatStreamEvent::Text { text: text.clone() })
                    .await
                    .is_err()
            {
                debug!("Client disconnected, abandoning upstream stream");
                return;
            }

            for delta in &chunk.tool_call_deltas {
                let started = accumulator.push(delta);
                if offering_tools
                    && let Some(started) = started
                    && tx
                        .send(ChatStreamEvent::ToolStart {
                            tool_call_id: started.id,
                            tool_name: started.name,
                        })
                        .await
                        .is_err()
                {
                    debug!("Client disconnected, abandoning upstream stream");
                    return;
                }
            }
        }

        let calls = accumulator.finish();

        if !offering_tools {
            // The final round must answer in text; any tool calls the model
            // attempted anyway are dropped.
            if !calls.is_empty() {
                warn!(count = calls.len(), "Ignoring tool calls requested in final round");
            }
            return;
        }

        if calls.is_empty() {
            // Pure text answer — conversation resolved in one round.
            debug!("Round produced no tool calls, conversation resolved");
            return;
        }

        // One assistant message summarizes all finalized calls from this
        // round; the model expects a reply to every id it issued.
        tool_rounds += 1;
        conversation.push(Message::assistant_tool_calls(
            calls
                .iter()
                .map(|c| MessageToolCall {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    arguments: c.arguments.clone(),
                })
                .collect(),
        ));

        // Execute sequentially in discovery order so result events line up
        // with their start events.
        for call in &calls {
            debug!(tool = %call.name, id = %call.id, "Executing tool call");
            let (content, result) = execute_call(&tools, call).await;

            if tx
                .send(ChatStreamEvent::ToolResult {
                    tool_call_id: call.id.clone(),
                    result,
                })
                .await
                .is_err()
            {
                debug!("Client disconnected during tool execution");
                return;
            }

            conversation.push(Message::tool_result(&call.id, content));
        }

        // Loop back into the final streaming round.
    }
}

/// Execute one finalized call. Every failure mode is recovered locally:
/// the description becomes the tool message content and an error payload
/// becomes the event result, so the model can narrate or apologize.
async fn execute_call(tools: &ToolRegistry, call: &ToolCall) -> (String, serde_json::Value) {
    let arguments = match serde_json::from_str::<serde_json::Value>(&call.arguments) {
        Ok(value) => value,
        Err(e) => {
            warn!(tool = %call.name, error = %e, "Tool arguments failed to parse");
            let description = format!("invalid tool arguments: {e}");
            let payload = serde_json::json!({ "error": description.clone() });
            return (description, payload);
        }
    };

    match tools.execute(&call.name, arguments).await {
        Ok(result) => {
            let payload = result
                .data
                .clone()
                .unwrap_or_else(|| serde_json::Value::String(result.output.clone()));
            (result.output, payload)
        }
        Err(ToolError::NotFound(name)) => {
            warn!(tool = %name, "Unknown tool requested by model");
            let description = format!("unknown tool: {name}");
            let payload = serde_json::json!({ "error": description.clone() });
            (description, payload)
        }
        Err(e) => {
            warn!(tool = %call.name, error = %e, "Tool execution failed");
            let description = e.to_string();
            let payload = serde_json::json!({ "error": description.clone() });
            (description, payload)
        }
    }
}
