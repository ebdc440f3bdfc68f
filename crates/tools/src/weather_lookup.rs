//! Weather lookup tool — stub that returns mock weather data.
//!
//! In production this would call a real weather API (OpenWeatherMap, etc.).
//! The stub returns canned data for a few well-known cities so the
//! orchestration loop can be exercised end-to-end without network access.

use async_trait::async_trait;
use chatrelay_core::error::ToolError;
use chatrelay_core::tool::{Tool, ToolResult};
use serde::Serialize;

pub struct WeatherLookupTool;

#[async_trait]
impl Tool for WeatherLookupTool {
    fn name(&self) -> &str {
        "get_current_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather in a given location"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state, e.g. San Francisco, CA"
                },
                "unit": {
                    "type": "string",
                    "enum": ["celsius", "fahrenheit"]
                }
            },
            "required": ["location"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let location = arguments["location"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'location' argument".into()))?;

        let unit = arguments["unit"].as_str().unwrap_or("celsius");
        let weather = lookup(location, unit);
        let data = serde_json::to_value(&weather)
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "get_current_weather".into(),
                reason: e.to_string(),
            })?;
        let output = data.to_string();

        Ok(ToolResult {
            success: true,
            output,
            data: Some(data),
        })
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum WeatherReport {
    Known {
        location: &'static str,
        temperature: &'static str,
        unit: String,
        forecast: &'static str,
    },
    Unknown {
        location: String,
        temperature: &'static str,
    },
}

/// Canned forecasts for the cities the demo frontend asks about.
fn lookup(location: &str, unit: &str) -> WeatherReport {
    let needle = location.to_lowercase();

    let known = [
        ("tokyo", "Tokyo", "10", "Rainy"),
        ("san francisco", "San Francisco", "72", "Sunny"),
        ("paris", "Paris", "22", "Cloudy"),
    ];

    for (key, name, temperature, forecast) in known {
        if needle.contains(key) {
            return WeatherReport::Known {
                location: name,
                temperature,
                unit: unit.to_string(),
                forecast,
            };
        }
    }

    WeatherReport::Unknown {
        location: location.to_string(),
        temperature: "unknown",
    }
}
