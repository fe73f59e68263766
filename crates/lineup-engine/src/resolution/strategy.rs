use crate::backend::{Backend, BackendError};
use async_trait::async_trait;
use lineup_common::element::{ElementHandle, ElementQuery};
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};

/// One named, independent way of resolving a UI target.
///
/// Strategies hold no state between calls and touch the page only when invoked.
/// `Ok(None)` means "not found within my budget" and lets the cascade move on.
#[async_trait]
pub trait ResolutionStrategy<T = ElementHandle>: Send + Sync {
    fn name(&self) -> &str;

    async fn try_resolve(&self, backend: &mut dyn Backend) -> Result<Option<T>, BackendError>;
}

/// Poll until `query` matches a visible element or `budget` runs out.
pub async fn wait_visible(
    backend: &mut dyn Backend,
    query: &ElementQuery,
    budget: Duration,
    poll: Duration,
) -> Result<Option<ElementHandle>, BackendError> {
    Ok(
        wait_visible_any(backend, std::slice::from_ref(query), budget, poll)
            .await?
            .map(|(_, handle)| handle),
    )
}

/// Poll a group of queries under one shared budget.
///
/// Each round probes the queries in order; the first visible match wins and is
/// returned together with the index of the query that found it.
pub async fn wait_visible_any(
    backend: &mut dyn Backend,
    queries: &[ElementQuery],
    budget: Duration,
    poll: Duration,
) -> Result<Option<(usize, ElementHandle)>, BackendError> {
    if queries.is_empty() {
        return Ok(None);
    }

    let deadline = Instant::now() + budget;
    let probe = async {
        loop {
            for (index, query) in queries.iter().enumerate() {
                match backend.query(query).await {
                    Ok(Some(handle)) => return Ok(Some((index, handle))),
                    Ok(None) => {}
                    Err(e) => return Err(e),
                }
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            sleep(poll.min(deadline - now)).await;
        }
    };

    // A probe that hangs in the backend must not outlive the budget either.
    match timeout(budget, probe).await {
        Ok(result) => result,
        Err(_) => Ok(None),
    }
}

/// Locate a single element by query within a visibility budget.
pub struct LocateStrategy {
    name: String,
    query: ElementQuery,
    budget: Duration,
    poll: Duration,
}

impl LocateStrategy {
    pub fn new(name: impl Into<String>, query: ElementQuery, budget: Duration, poll: Duration) -> Self {
        Self {
            name: name.into(),
            query,
            budget,
            poll,
        }
    }
}

#[async_trait]
impl ResolutionStrategy for LocateStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_resolve(
        &self,
        backend: &mut dyn Backend,
    ) -> Result<Option<ElementHandle>, BackendError> {
        wait_visible(backend, &self.query, self.budget, self.poll).await
    }
}
