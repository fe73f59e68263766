use serde::{Deserialize, Serialize};
use std::fmt;

/// A request to locate one element on the page.
///
/// Every variant only ever yields a *visible* element; hidden matches are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementQuery {
    /// First visible element matching a CSS selector.
    Css { selector: String },

    /// First visible element matching `selector` whose text equals (`exact`) or
    /// contains `text`. Comparison is case-insensitive on whitespace-collapsed text.
    CssWithText {
        selector: String,
        text: String,
        exact: bool,
    },

    /// First visible innermost element anywhere on the page containing `text`.
    Text { text: String },
}

impl ElementQuery {
    pub fn css(selector: impl Into<String>) -> Self {
        ElementQuery::Css {
            selector: selector.into(),
        }
    }

    pub fn css_with_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        ElementQuery::CssWithText {
            selector: selector.into(),
            text: text.into(),
            exact: false,
        }
    }

    pub fn css_with_exact_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        ElementQuery::CssWithText {
            selector: selector.into(),
            text: text.into(),
            exact: true,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ElementQuery::Text { text: text.into() }
    }
}

impl fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementQuery::Css { selector } => write!(f, "{}", selector),
            ElementQuery::CssWithText {
                selector,
                text,
                exact: true,
            } => write!(f, "{} =~ {:?}", selector, text),
            ElementQuery::CssWithText { selector, text, .. } => {
                write!(f, "{} ~ {:?}", selector, text)
            }
            ElementQuery::Text { text } => write!(f, "text ~ {:?}", text),
        }
    }
}

/// Opaque page-scoped token for an element returned by a query.
///
/// Handles are only meaningful to the backend that issued them and may go stale
/// once the page re-renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub u64);

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
}
