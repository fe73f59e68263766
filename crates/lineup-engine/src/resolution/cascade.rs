use super::result::ResolutionError;
use super::strategy::ResolutionStrategy;
use crate::backend::Backend;
use lineup_common::element::ElementHandle;
use tracing::{debug, info};

/// The value produced by the strategy that won a cascade.
#[derive(Debug)]
pub struct CascadeHit<T> {
    pub strategy: String,
    pub value: T,
}

/// An ordered list of strategies for one target. First success wins.
pub struct Cascade<T = ElementHandle> {
    target: String,
    strategies: Vec<Box<dyn ResolutionStrategy<T>>>,
}

impl<T: Send> Cascade<T> {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            strategies: Vec::new(),
        }
    }

    pub fn with(mut self, strategy: impl ResolutionStrategy<T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Run the strategies in order until one yields a value.
    ///
    /// Later strategies are never invoked once one succeeds. Non-fatal backend
    /// errors count as a miss for that strategy only.
    pub async fn resolve(&self, backend: &mut dyn Backend) -> Result<CascadeHit<T>, ResolutionError> {
        let mut attempted = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            attempted.push(strategy.name().to_string());

            match strategy.try_resolve(backend).await {
                Ok(Some(value)) => {
                    info!(target_name = %self.target, strategy = strategy.name(), "Resolved");
                    return Ok(CascadeHit {
                        strategy: strategy.name().to_string(),
                        value,
                    });
                }
                Ok(None) => {
                    debug!(target_name = %self.target, strategy = strategy.name(), "No match");
                }
                Err(e) if e.is_fatal() => {
                    return Err(ResolutionError::Backend {
                        target: self.target.clone(),
                        strategy: strategy.name().to_string(),
                        source: e,
                    });
                }
                Err(e) => {
                    debug!(
                        target_name = %self.target,
                        strategy = strategy.name(),
                        code = e.code(),
                        "Strategy failed: {}",
                        e
                    );
                }
            }
        }

        Err(ResolutionError::Exhausted {
            target: self.target.clone(),
            attempted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, NavigationResult};
    use async_trait::async_trait;
    use lineup_common::element::{ElementQuery, MouseButton};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullBackend;

    #[async_trait]
    impl Backend for NullBackend {
        async fn launch(&mut self) -> Result<(), BackendError> {
            Ok(())
        }
        async fn close(&mut self) -> Result<(), BackendError> {
            Ok(())
        }
        async fn is_ready(&self) -> bool {
            true
        }
        async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
            Ok(NavigationResult {
                url: url.to_string(),
                title: String::new(),
            })
        }
        async fn query(
            &mut self,
            _query: &ElementQuery,
        ) -> Result<Option<ElementHandle>, BackendError> {
            Ok(None)
        }
        async fn click(
            &mut self,
            _handle: ElementHandle,
            _button: MouseButton,
        ) -> Result<(), BackendError> {
            Ok(())
        }
        async fn fill(&mut self, _handle: ElementHandle, _text: &str) -> Result<(), BackendError> {
            Ok(())
        }
        async fn press_key(&mut self, _key: &str) -> Result<(), BackendError> {
            Ok(())
        }
    }

    enum Behaviour {
        Hit(u64),
        Miss,
        Fail(BackendError),
    }

    struct CountingStrategy {
        name: &'static str,
        behaviour: Behaviour,
        calls: Arc<AtomicUsize>,
    }

    impl CountingStrategy {
        fn new(name: &'static str, behaviour: Behaviour) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    behaviour,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl ResolutionStrategy for CountingStrategy {
        fn name(&self) -> &str {
            self.name
        }

        async fn try_resolve(
            &self,
            _backend: &mut dyn Backend,
        ) -> Result<Option<ElementHandle>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behaviour {
                Behaviour::Hit(id) => Ok(Some(ElementHandle(*id))),
                Behaviour::Miss => Ok(None),
                Behaviour::Fail(e) => Err(e.clone()),
            }
        }
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let (a, a_calls) = CountingStrategy::new("a", Behaviour::Miss);
        let (b, b_calls) = CountingStrategy::new("b", Behaviour::Hit(2));
        let (c, c_calls) = CountingStrategy::new("c", Behaviour::Hit(3));
        let cascade = Cascade::new("row").with(a).with(b).with(c);

        let hit = cascade.resolve(&mut NullBackend).await.unwrap();

        assert_eq!(hit.strategy, "b");
        assert_eq!(hit.value, ElementHandle(2));
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exhaustion_lists_every_strategy() {
        let (a, _) = CountingStrategy::new("a", Behaviour::Miss);
        let (b, _) = CountingStrategy::new("b", Behaviour::Fail(BackendError::Script("x".into())));
        let cascade = Cascade::new("menu").with(a).with(b);

        match cascade.resolve(&mut NullBackend).await {
            Err(ResolutionError::Exhausted { target, attempted }) => {
                assert_eq!(target, "menu");
                assert_eq!(attempted, vec!["a", "b"]);
            }
            other => panic!("expected exhaustion, got {:?}", other.map(|h| h.strategy)),
        }
    }

    #[tokio::test]
    async fn test_non_fatal_error_falls_through() {
        let (a, _) = CountingStrategy::new("a", Behaviour::Fail(BackendError::Timeout));
        let (b, b_calls) = CountingStrategy::new("b", Behaviour::Hit(9));
        let cascade = Cascade::new("row").with(a).with(b);

        let hit = cascade.resolve(&mut NullBackend).await.unwrap();
        assert_eq!(hit.strategy, "b");
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fatal_error_aborts() {
        let (a, _) = CountingStrategy::new("a", Behaviour::Fail(BackendError::ConnectionLost));
        let (b, b_calls) = CountingStrategy::new("b", Behaviour::Hit(1));
        let cascade = Cascade::new("row").with(a).with(b);

        let err = cascade.resolve(&mut NullBackend).await.unwrap_err();
        assert!(matches!(err, ResolutionError::Backend { ref strategy, .. } if strategy == "a"));
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_cascade_is_exhausted() {
        let cascade: Cascade = Cascade::new("nothing");
        assert!(matches!(
            cascade.resolve(&mut NullBackend).await,
            Err(ResolutionError::Exhausted { .. })
        ));
    }
}
