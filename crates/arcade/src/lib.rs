//! Client library for the Arcade tool-calling service.
//!
//! Arcade hosts toolkits (bundles of remote actions such as Notion page
//! operations), brokers per-user authorization for them, and executes tool
//! calls on a user's behalf. This crate covers the endpoints an agent needs:
//! listing tools in OpenAI function format, authorizing a tool for a user,
//! waiting for that authorization to complete, and executing a tool.
//!
//! # Example
//!
//! ```no_run
//! use arcade::Client;
//!
//! # async fn example() -> arcade::Result<()> {
//! let client = Client::from_env()?;
//!
//! let tools = client.list_tools("NotionToolkit", 100).await?;
//! for tool in &tools {
//!     println!("Tool: {}", tool.name());
//! }
//!
//! let auth = client.authorize("NotionToolkit_SearchByTitle", "me@example.com").await?;
//! if !auth.status.is_completed() {
//!     println!("Visit {}", auth.url.as_deref().unwrap_or_default());
//!     client.wait_for_completion(auth).await?;
//! }
//!
//! let response = client
//!     .execute(
//!         "NotionToolkit_SearchByTitle",
//!         serde_json::json!({ "query": "Meeting Notes" }),
//!         "me@example.com",
//!     )
//!     .await?;
//! println!("{:?}", response.into_result());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod protocol;

pub use client::{
    Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, MAX_WAIT_SECS, PAGE_SIZE,
};
pub use error::{Error, Result};
pub use protocol::{
    AuthorizationContext, AuthorizationResponse, AuthorizationStatus, AuthorizeRequest,
    ExecuteToolRequest, ExecuteToolResponse, FunctionDefinition, Page, ToolDefinition,
    ToolOutput, ToolOutputError, qualified_name,
};
