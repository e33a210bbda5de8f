//! HTTP API of the screen agent

mod client;
mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpBackend;
pub use types::ScreenPayload;

/// The two calls the viewer makes against the agent
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Screens available for capture
    async fn list_screens(&self) -> Result<Vec<ScreenPayload>>;

    /// Exchange a local offer for the agent's answer
    async fn start_session(&self, offer: &str, screen: i32) -> Result<String>;
}
