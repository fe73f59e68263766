//! Strategies for picking the destination playlist out of the "Add to playlist" menu.
//!
//! Unlike element locators these strategies finish the interaction themselves
//! (typing, confirming, clicking) and report [`Committed`] once they did.

use super::strategy::{ResolutionStrategy, wait_visible, wait_visible_any};
use crate::backend::{Backend, BackendError};
use async_trait::async_trait;
use lineup_common::element::{ElementQuery, MouseButton};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

const ACCEPT_KEY: &str = "Enter";

/// Marker returned by a selection strategy that completed its interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Committed;

/// Type the full playlist name into the menu's own filter field and accept.
///
/// Relies on the menu narrowing to (and pre-selecting) a single match.
pub struct FilterFieldStrategy {
    fields: Vec<ElementQuery>,
    playlist: String,
    budget: Duration,
    settle: Duration,
    poll: Duration,
}

impl FilterFieldStrategy {
    pub fn new(
        selectors: &[String],
        playlist: impl Into<String>,
        budget: Duration,
        settle: Duration,
        poll: Duration,
    ) -> Self {
        Self {
            fields: selectors.iter().map(ElementQuery::css).collect(),
            playlist: playlist.into(),
            budget,
            settle,
            poll,
        }
    }
}

#[async_trait]
impl ResolutionStrategy<Committed> for FilterFieldStrategy {
    fn name(&self) -> &str {
        "menu filter field"
    }

    async fn try_resolve(&self, backend: &mut dyn Backend) -> Result<Option<Committed>, BackendError> {
        let Some((index, field)) =
            wait_visible_any(backend, &self.fields, self.budget, self.poll).await?
        else {
            return Ok(None);
        };
        debug!(field = %self.fields[index], "Filtering playlist menu");

        backend.fill(field, &self.playlist).await?;
        sleep(self.settle).await;
        backend.press_key(ACCEPT_KEY).await?;
        Ok(Some(Committed))
    }
}

/// Click the first visible element whose text is exactly the playlist name,
/// searching a fixed list of element patterns in order.
pub struct ExactEntryStrategy {
    patterns: Vec<String>,
    playlist: String,
    budget_each: Duration,
    poll: Duration,
}

impl ExactEntryStrategy {
    pub fn new(
        patterns: &[String],
        playlist: impl Into<String>,
        budget_each: Duration,
        poll: Duration,
    ) -> Self {
        Self {
            patterns: patterns.to_vec(),
            playlist: playlist.into(),
            budget_each,
            poll,
        }
    }
}

#[async_trait]
impl ResolutionStrategy<Committed> for ExactEntryStrategy {
    fn name(&self) -> &str {
        "exact menu entry"
    }

    async fn try_resolve(&self, backend: &mut dyn Backend) -> Result<Option<Committed>, BackendError> {
        for pattern in &self.patterns {
            let query = ElementQuery::css_with_exact_text(pattern, &self.playlist);
            let found = match wait_visible(backend, &query, self.budget_each, self.poll).await {
                Ok(found) => found,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!(pattern = %pattern, "Pattern probe failed: {}", e);
                    continue;
                }
            };

            if let Some(entry) = found {
                match backend.click(entry, MouseButton::Left).await {
                    Ok(()) => return Ok(Some(Committed)),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => debug!(pattern = %pattern, "Entry click failed: {}", e),
                }
            }
        }
        Ok(None)
    }
}

/// Type a short prefix of the playlist name as type-ahead, then accept.
///
/// Nothing is located first: the keys go to whatever the open menu focuses.
pub struct TypeAheadStrategy {
    prefix: String,
    key_delay: Duration,
    settle: Duration,
}

impl TypeAheadStrategy {
    pub fn new(prefix: impl Into<String>, key_delay: Duration, settle: Duration) -> Self {
        Self {
            prefix: prefix.into(),
            key_delay,
            settle,
        }
    }
}

#[async_trait]
impl ResolutionStrategy<Committed> for TypeAheadStrategy {
    fn name(&self) -> &str {
        "type-ahead prefix"
    }

    async fn try_resolve(&self, backend: &mut dyn Backend) -> Result<Option<Committed>, BackendError> {
        if self.prefix.is_empty() {
            return Ok(None);
        }
        backend.type_text(&self.prefix, self.key_delay).await?;
        sleep(self.settle).await;
        backend.press_key(ACCEPT_KEY).await?;
        Ok(Some(Committed))
    }
}

/// Click any visible element on the page whose text contains the playlist name.
///
/// This is the loosest match of the cascade: a track title, a sidebar entry or a
/// similarly named playlist can satisfy it as well, so a hit is logged loudly.
pub struct SubstringStrategy {
    playlist: String,
    budget: Duration,
    poll: Duration,
}

impl SubstringStrategy {
    pub fn new(playlist: impl Into<String>, budget: Duration, poll: Duration) -> Self {
        Self {
            playlist: playlist.into(),
            budget,
            poll,
        }
    }
}

#[async_trait]
impl ResolutionStrategy<Committed> for SubstringStrategy {
    fn name(&self) -> &str {
        "page text substring"
    }

    async fn try_resolve(&self, backend: &mut dyn Backend) -> Result<Option<Committed>, BackendError> {
        let query = ElementQuery::text(&self.playlist);
        let Some(element) = wait_visible(backend, &query, self.budget, self.poll).await? else {
            return Ok(None);
        };
        warn!(
            playlist = %self.playlist,
            "Selected playlist by loose text match; the clicked element may not be the playlist entry"
        );
        backend.click(element, MouseButton::Left).await?;
        Ok(Some(Committed))
    }
}
