//! Built-in tool implementations for ChatRelay.
//!
//! These are deliberately small: the interesting part of this system is the
//! tool-invocation protocol, not the tools themselves. The weather lookup
//! mirrors the canned data the reference frontend expects.

pub mod current_time;
pub mod weather_lookup;

use chatrelay_core::tool::ToolRegistry;

/// Create a default tool registry with all built-in tools.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(weather_lookup::WeatherLookupTool));
    registry.register(Box::new(current_time::CurrentTimeTool));
    registry
}
