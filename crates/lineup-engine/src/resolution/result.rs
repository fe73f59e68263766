use lineup_common::BackendError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ResolutionError {
    /// Every strategy ran and none matched.
    #[error("Resolution failed for target '{target}': no strategy matched (tried: {})", .attempted.join(", "))]
    Exhausted {
        target: String,
        attempted: Vec<String>,
    },

    /// A strategy hit an error that makes the remaining strategies pointless.
    #[error("Resolution aborted for target '{target}' in strategy '{strategy}': {source}")]
    Backend {
        target: String,
        strategy: String,
        #[source]
        source: BackendError,
    },
}
