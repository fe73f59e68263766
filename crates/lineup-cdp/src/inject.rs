use chromiumoxide::Page;
use lineup_engine::element::ElementQuery;
use std::time::Duration;

const LOCATOR_JS: &str = include_str!("locator.js");

/// Upper bound for one evaluation; a blocking dialog would otherwise hang it.
const EVAL_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_CONTEXT_RETRIES: u32 = 10;

const CONTEXT_RETRY_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum EvalError {
    Timeout,
    /// The page is between documents.
    Context(String),
    Other(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::Timeout => write!(f, "evaluation timed out"),
            EvalError::Context(e) => write!(f, "no execution context: {}", e),
            EvalError::Other(e) => write!(f, "{}", e),
        }
    }
}

fn is_context_error(err: &str) -> bool {
    err.contains("Cannot find context")
        || err.contains("Execution context was destroyed")
        || err.contains("-32000")
}

/// Find the first visible element matching `query` and return its handle id.
pub async fn locate(page: &Page, query: &ElementQuery) -> Result<Option<u64>, EvalError> {
    let args = serde_json::to_string(query).map_err(|e| EvalError::Other(e.to_string()))?;
    let value = call(page, &format!("window.__lineup.find({})", args)).await?;
    Ok(value.as_u64())
}

/// Focus a tagged field and empty its value.
pub async fn clear(page: &Page, handle: u64) -> Result<bool, EvalError> {
    let value = call(page, &format!("window.__lineup.clear({})", handle)).await?;
    Ok(value.as_bool().unwrap_or(false))
}

/// CSS selector addressing an element tagged by the locator.
pub fn handle_selector(handle: u64) -> String {
    format!("[data-lineup-handle=\"{}\"]", handle)
}

/// Evaluate a locator call, injecting the script first and retrying while the
/// page has no execution context.
async fn call(page: &Page, expression: &str) -> Result<serde_json::Value, EvalError> {
    let mut last_error = None;

    for attempt in 0..MAX_CONTEXT_RETRIES {
        let result = match evaluate_with_timeout(page, LOCATOR_JS).await {
            Ok(_) => evaluate_with_timeout(page, expression).await,
            Err(e) => Err(e),
        };

        match result {
            Err(EvalError::Context(err)) => {
                tracing::debug!(
                    "Context error (attempt {}/{}), retrying...",
                    attempt + 1,
                    MAX_CONTEXT_RETRIES
                );
                last_error = Some(err);
                tokio::time::sleep(CONTEXT_RETRY_DELAY).await;
            }
            other => return other,
        }
    }

    Err(EvalError::Context(
        last_error.unwrap_or_else(|| "no context after retries".to_string()),
    ))
}

async fn evaluate_with_timeout(
    page: &Page,
    expression: &str,
) -> Result<serde_json::Value, EvalError> {
    match tokio::time::timeout(EVAL_TIMEOUT, page.evaluate(expression)).await {
        Err(_) => Err(EvalError::Timeout),
        Ok(Err(e)) => {
            let err = e.to_string();
            if is_context_error(&err) {
                Err(EvalError::Context(err))
            } else {
                Err(EvalError::Other(err))
            }
        }
        Ok(Ok(remote)) => Ok(remote
            .into_value::<serde_json::Value>()
            .unwrap_or(serde_json::Value::Null)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_selector_targets_tag_attribute() {
        assert_eq!(handle_selector(7), "[data-lineup-handle=\"7\"]");
    }

    #[test]
    fn context_errors_are_recognised() {
        assert!(is_context_error("Execution context was destroyed."));
        assert!(is_context_error("Cannot find context with specified id"));
        assert!(!is_context_error("SyntaxError: unexpected token"));
    }

    #[test]
    fn queries_serialize_for_the_locator() {
        let json = serde_json::to_string(&ElementQuery::css_with_exact_text("li", "A \"B\"")).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"css_with_text","selector":"li","text":"A \"B\"","exact":true}"#
        );
    }
}
