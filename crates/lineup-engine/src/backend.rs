use async_trait::async_trait;
use lineup_common::element::{ElementHandle, ElementQuery, MouseButton};
use std::time::Duration;

pub use lineup_common::error::backend_error::BackendError;

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
}

/// The page/session being driven.
///
/// A backend is a single exclusively-owned resource: callers hold it by `&mut` and
/// never issue two operations at once. Every method is a single attempt; waiting
/// and retry budgets belong to the engine.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Launch the backend (start browser, attach to profile, etc.)
    async fn launch(&mut self) -> Result<(), BackendError>;

    /// Close the backend and cleanup resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Check if the backend is ready to accept commands.
    async fn is_ready(&self) -> bool;

    /// Navigate to a specific URL and wait for the load to settle.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError>;

    /// Probe once for a visible element matching `query`.
    async fn query(&mut self, query: &ElementQuery) -> Result<Option<ElementHandle>, BackendError>;

    /// Click an element previously returned by [`Backend::query`].
    async fn click(
        &mut self,
        handle: ElementHandle,
        button: MouseButton,
    ) -> Result<(), BackendError>;

    /// Replace the contents of a text field.
    async fn fill(&mut self, handle: ElementHandle, text: &str) -> Result<(), BackendError>;

    /// Press a single named key (e.g. `Enter`) on whatever has focus.
    async fn press_key(&mut self, key: &str) -> Result<(), BackendError>;

    /// Type text key by key into whatever has focus.
    async fn type_text(&mut self, _text: &str, _key_delay: Duration) -> Result<(), BackendError> {
        Err(BackendError::NotSupported("type_text".into()))
    }
}
