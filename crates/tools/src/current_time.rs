//! Current time tool — reports the server's UTC clock.

use async_trait::async_trait;
use chatrelay_core::error::ToolError;
use chatrelay_core::tool::{Tool, ToolResult};
use chrono::Utc;

pub struct CurrentTimeTool;

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time in UTC"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let now = Utc::now();
        let data = serde_json::json!({
            "utc": now.to_rfc3339(),
            "unix": now.timestamp(),
        });

        Ok(ToolResult {
            success: true,
            output: data.to_string(),
            data: Some(data),
        })
    }
}
