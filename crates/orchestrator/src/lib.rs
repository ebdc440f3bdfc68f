//! The streaming chat orchestration loop — the heart of ChatRelay.
//!
//! One request flows through at most two streaming rounds:
//!
//! 1. **Initial round** — stream the model's response with the full tool
//!    schema set. Text deltas are forwarded to the client immediately;
//!    tool-call deltas are reassembled by the accumulator.
//! 2. **Tool execution** — if the round produced tool calls, execute them
//!    sequentially in discovery order, appending results to the history.
//! 3. **Final round** — stream again with no tools offered, forwarding the
//!    model's answer.
//!
//! A round with no tool calls resolves the conversation directly.

pub mod accumulator;
pub mod chat_loop;
pub mod stream_event;

#[cfg(test)]
pub(crate) mod test_support;

pub use accumulator::{ToolCallAccumulator, ToolStarted};
pub use chat_loop::{ChatOrchestrator, MAX_TOOL_ROUNDS};
pub use stream_event::ChatStreamEvent;
