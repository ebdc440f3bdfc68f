//! Outward-facing streaming events.
//!
//! `ChatStreamEvent` is the wire schema the gateway writes to the client,
//! one SSE `data:` frame per event, in the exact order the orchestration
//! loop produces them.

use serde::{Deserialize, Serialize};

/// Events emitted by the orchestration loop during streaming execution.
///
/// - `text`        — an increment of the model's answer
/// - `tool_start`  — a tool invocation became known mid-stream
/// - `tool_result` — a tool invocation completed (successfully or not)
///
/// The stream has no terminal sentinel: connection close is completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatStreamEvent {
    /// An increment of the model's text answer.
    Text { text: String },

    /// A tool invocation became known. The name carries what has been
    /// accumulated when the id first appears.
    ToolStart {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        #[serde(rename = "toolName")]
        tool_name: String,
    },

    /// A tool invocation completed. On failure `result` is an error
    /// payload, never a stream-level failure.
    ToolResult {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        result: serde_json::Value,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_event_wire_format() {
        let event = ChatStreamEvent::Text {
            text: "Hello".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"text","text":"Hello"}"#);
    }

    #[test]
    fn tool_start_wire_format() {
        let event = ChatStreamEvent::ToolStart {
            tool_call_id: "call_abc".into(),
            tool_name: "get_current_weather".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"tool_start","toolCallId":"call_abc","toolName":"get_current_weather"}"#
        );
    }

    #[test]
    fn tool_result_wire_format() {
        let event = ChatStreamEvent::ToolResult {
            tool_call_id: "call_abc".into(),
            result: serde_json::json!({"forecast": "Rainy"}),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"tool_result","toolCallId":"call_abc","result":{"forecast":"Rainy"}}"#
        );
    }

    #[test]
    fn event_deserialization() {
        let json = r#"{"type":"text","text":"hi"}"#;
        let event: ChatStreamEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, ChatStreamEvent::Text { text: "hi".into() });
    }
}
