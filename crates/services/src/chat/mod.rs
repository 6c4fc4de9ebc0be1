pub mod events;
pub mod finish;
pub mod prompt;
pub mod service;
pub mod stream_state;
pub mod tools;

pub use events::{FinishMetadata, StreamFrame, UiMessageEvent, UsagePayload};
pub use prompt::{convert_to_contents, ClientMessage, ClientMessagePart};
pub use service::{ChatStreamError, ChatStreamService};
pub use tools::{ToolError, ToolHandler, ToolRegistry};
