//! Current-weather lookup backed by the open-meteo forecast API

use async_trait::async_trait;
use inference_providers::FunctionDeclaration;
use serde_json::json;
use std::time::Duration;

use super::{ToolError, ToolHandler};

const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

pub struct WeatherTool {
    client: reqwest::Client,
    base_url: String,
}

impl WeatherTool {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn coordinate(input: &serde_json::Value, key: &str) -> Result<f64, ToolError> {
        input
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| ToolError::InvalidArguments(format!("missing numeric '{key}'")))
    }
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for WeatherTool {
    fn name(&self) -> &str {
        "get_current_weather"
    }

    fn definition(&self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: "get_current_weather".to_string(),
            description: "Get the current weather at a location".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "latitude": {
                        "type": "number",
                        "description": "The latitude of the location"
                    },
                    "longitude": {
                        "type": "number",
                        "description": "The longitude of the location"
                    }
                },
                "required": ["latitude", "longitude"]
            }),
        }
    }

    async fn call(&self, input: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let latitude = Self::coordinate(input, "latitude")?;
        let longitude = Self::coordinate(input, "longitude")?;

        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current=temperature_2m&hourly=temperature_2m&daily=sunrise,sunset&timezone=auto",
            self.base_url, latitude, longitude
        );

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Error fetching weather data: {e}")))?
            .error_for_status()
            .map_err(|e| ToolError::ExecutionFailed(format!("Error fetching weather data: {e}")))?;

        response
            .json()
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Error fetching weather data: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn fetches_forecast_for_coordinates() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/forecast")
                .query_param("latitude", "48.85")
                .query_param("longitude", "2.35")
                .query_param("current", "temperature_2m");
            then.status(200)
                .json_body(json!({"current": {"temperature_2m": 19.4}}));
        });

        let tool = WeatherTool::with_base_url(server.base_url());
        let output = tool
            .call(&json!({"latitude": 48.85, "longitude": 2.35}))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(output["current"]["temperature_2m"], json!(19.4));
    }

    #[tokio::test]
    async fn missing_coordinates_are_invalid_arguments() {
        let tool = WeatherTool::with_base_url("http://localhost:1");
        let err = tool.call(&json!({"latitude": 48.85})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn upstream_failure_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/forecast");
            then.status(500);
        });

        let tool = WeatherTool::with_base_url(server.base_url());
        let err = tool
            .call(&json!({"latitude": 1.0, "longitude": 2.0}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
    }
}
