//! Reassembly of fragmented tool-call deltas.
//!
//! The wire format may split a single tool invocation — its id, its name,
//! even a single JSON token of its arguments — across many stream
//! fragments, keyed by a stable position index. The accumulator
//! concatenates fragments per position, in arrival order, and finalizes
//! each builder exactly once when the stream round ends.

use chatrelay_core::provider::ToolCallDelta;
use chatrelay_core::tool::ToolCall;

/// Notification that a tool invocation became known mid-stream.
///
/// Emitted the first time a position's id turns non-empty. The name is
/// whatever has been accumulated at that instant — by protocol convention
/// the name is fully known once the id appears, but nothing guarantees it,
/// so consumers must treat it as best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStarted {
    pub id: String,
    pub name: String,
}

/// An in-progress tool call builder for one position index.
#[derive(Debug)]
struct Builder {
    index: u32,
    id: String,
    name: String,
    arguments: String,
}

impl Builder {
    fn new(index: u32) -> Self {
        Self {
            index,
            id: String::new(),
            name: String::new(),
            arguments: String::new(),
        }
    }
}

/// Accumulates tool-call delta fragments into complete invocations.
///
/// Builders are kept in first-seen order, which defines both notification
/// order and execution order for the round.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    builders: Vec<Builder>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one fragment. Id, name, and arguments are appended — never
    /// replaced. Returns a notification exactly when this fragment takes
    /// the position's id from empty to non-empty.
    pub fn push(&mut self, delta: &ToolCallDelta) -> Option<ToolStarted> {
        let pos = match self.builders.iter().position(|b| b.index == delta.index) {
            Some(pos) => pos,
            None => {
                self.builders.push(Builder::new(delta.index));
                self.builders.len() - 1
            }
        };
        let builder = &mut self.builders[pos];

        let id_was_empty = builder.id.is_empty();

        if let Some(id) = &delta.id {
            builder.id.push_str(id);
        }
        if let Some(name) = &delta.name {
            builder.name.push_str(name);
        }
        if let Some(arguments) = &delta.arguments {
            builder.arguments.push_str(arguments);
        }

        if id_was_empty && !builder.id.is_empty() {
            Some(ToolStarted {
                id: builder.id.clone(),
                name: builder.name.clone(),
            })
        } else {
            None
        }
    }

    /// Whether any invocation has been identified so far.
    pub fn is_empty(&self) -> bool {
        self.builders.iter().all(|b| b.id.is_empty())
    }

    /// Finalize the round. Builders that never received an id carry no
    /// executable invocation and are dropped.
    pub fn finish(self) -> Vec<ToolCall> {
        self.builders
            .into_iter()
            .filter(|b| !b.id.is_empty())
            .map(|b| ToolCall {
                id: b.id,
                name: b.name,
                arguments: b.arguments,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(
        index: u32,
        id: Option<&str>,
        name: Option<&str>,
        arguments: Option<&str>,
    ) -> ToolCallDelta {
        ToolCallDelta {
            index,
            id: id.map(String::from),
            name: name.map(String::from),
            arguments: arguments.map(String::from),
        }
    }

    #[test]
    fn reassembles_arguments_split_across_fragments() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(&delta(0, Some("call_1"), Some("get_current_weather"), None));
        acc.push(&delta(0, None, None, Some("{\"loc")));
        acc.push(&delta(0, None, None, Some("ation\":\"Pa")));
        acc.push(&delta(0, None, None, Some("ris\"}")));

        let calls = acc.finish();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[0].name, "get_current_weather");
        assert_eq!(calls[0].arguments, r#"{"location":"Paris"}"#);
    }

    #[test]
    fn notifies_once_when_id_becomes_non_empty() {
        let mut acc = ToolCallAccumulator::new();

        // Arguments before the id: no notification yet.
        assert!(acc.push(&delta(0, None, None, Some("{"))).is_none());

        let started = acc.push(&delta(0, Some("call_"), Some("get_"), None)).unwrap();
        assert_eq!(started.id, "call_");
        assert_eq!(started.name, "get_");

        // Further id and name fragments append without a second notification.
        assert!(acc.push(&delta(0, Some("1"), Some("current_time"), None)).is_none());

        let calls = acc.finish();
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[0].name, "get_current_time");
    }

    #[test]
    fn preserves_first_seen_order_across_interleaved_fragments() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(&delta(2, Some("call_c"), Some("third"), None));
        acc.push(&delta(0, Some("call_a"), Some("first"), None));
        acc.push(&delta(2, None, None, Some("{}")));
        acc.push(&delta(1, Some("call_b"), Some("second"), None));

        let calls = acc.finish();
        let ids: Vec<&str> = calls.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["call_c", "call_a", "call_b"]);
    }

    #[test]
    fn builders_without_id_are_dropped() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(&delta(0, None, None, Some("{\"x\":1}")));
        assert!(acc.is_empty());
        assert!(acc.finish().is_empty());
    }

    #[test]
    fn empty_round_produces_no_calls() {
        let acc = ToolCallAccumulator::new();
        assert!(acc.is_empty());
        assert!(acc.finish().is_empty());
    }

    #[test]
    fn tracks_multiple_positions_independently() {
        let mut acc = ToolCallAccumulator::new();
        let first = acc.push(&delta(0, Some("call_a"), Some("get_current_weather"), None));
        let second = acc.push(&delta(1, Some("call_b"), Some("get_current_time"), None));
        assert!(first.is_some());
        assert!(second.is_some());

        acc.push(&delta(0, None, None, Some(r#"{"location":"Tokyo"}"#)));
        acc.push(&delta(1, None, None, Some("{}")));

        let calls = acc.finish();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].arguments, r#"{"location":"Tokyo"}"#);
        assert_eq!(calls[1].arguments, "{}");
    }
}
