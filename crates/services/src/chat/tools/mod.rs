//! Tool execution
//!
//! Tools are registered once at startup and looked up by function name when
//! the model requests them. Execution is serial, in drain order; a failing
//! tool produces an error event but never aborts the session.

pub mod weather;

use async_trait::async_trait;
use indexmap::IndexMap;
use inference_providers::{FunctionDeclaration, Tool};
use std::sync::Arc;
use thiserror::Error;

pub use weather::WeatherTool;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool '{0}' not found.")]
    NotFound(String),
    #[error("{0}")]
    ExecutionFailed(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// A locally executable function the model can call
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Function name as declared to the model
    fn name(&self) -> &str;

    /// Declaration advertised in the upstream request
    fn definition(&self) -> FunctionDeclaration;

    /// Execute with the merged call input
    async fn call(&self, input: &serde_json::Value) -> Result<serde_json::Value, ToolError>;
}

/// Name → handler table, insertion-ordered and read-only after startup
#[derive(Default)]
pub struct ToolRegistry {
    handlers: IndexMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its declared name
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        self.handlers.insert(handler.name().to_string(), handler);
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Tool declarations for the upstream request, or `None` when no tools
    /// are registered
    pub fn definitions(&self) -> Option<Vec<Tool>> {
        if self.handlers.is_empty() {
            return None;
        }
        Some(vec![Tool {
            function_declarations: self
                .handlers
                .values()
                .map(|handler| handler.definition())
                .collect(),
        }])
    }

    /// Execute a named tool with the given input
    pub async fn execute(
        &self,
        name: &str,
        input: &serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        handler.call(input).await
    }
}
