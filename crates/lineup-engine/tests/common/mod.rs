#![allow(dead_code)]

use async_trait::async_trait;
use lineup_engine::backend::{Backend, BackendError, NavigationResult};
use lineup_engine::config::schema::SelectorConfig;
use lineup_engine::element::{ElementHandle, ElementQuery, MouseButton};
use std::time::Duration;

pub const PLAYLIST: &str = "Rolling Loud 2026";

const CATEGORY: u64 = 1;
const ROW_BASE: u64 = 10;
const MENU_ENTRY: u64 = 20;
const PLAYLIST_FILTER: u64 = 30;
const PLAYLIST_ENTRY: u64 = 40;
const PAGE_TEXT: u64 = 50;
const PAGE_INPUT: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Ok,
    /// Never finishes loading.
    Stall,
    Fail,
}

/// What the page looks like after navigating to a search.
#[derive(Debug, Clone)]
pub struct Layout {
    pub nav: Nav,
    pub category_filter: bool,
    /// Index into the default result-row selectors that matches, if any.
    pub result_row: Option<usize>,
    pub row_click_fails: bool,
    pub menu_entry: bool,
    pub playlist_filter: bool,
    pub playlist_entry: bool,
    pub page_text: bool,
    /// A visible search box outside the menu.
    pub page_input: bool,
    pub keyboard_fails: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            nav: Nav::Ok,
            category_filter: true,
            result_row: Some(0),
            row_click_fails: false,
            menu_entry: true,
            playlist_filter: true,
            playlist_entry: true,
            page_text: true,
            page_input: false,
            keyboard_fails: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Navigate(String),
    Click(&'static str, MouseButton),
    Fill(&'static str, String),
    Key(String),
    Type(String),
}

/// A scripted page. Each navigation picks a [`Layout`] by URL substring.
#[derive(Debug, Default)]
pub struct MockPage {
    pub default_layout: Layout,
    pub overrides: Vec<(String, Layout)>,
    pub current: Layout,
    pub queries: Vec<ElementQuery>,
    pub events: Vec<Event>,
    selectors: SelectorConfig,
}

impl MockPage {
    pub fn new(default_layout: Layout) -> Self {
        Self {
            default_layout,
            ..Default::default()
        }
    }

    pub fn with_override(mut self, url_part: &str, layout: Layout) -> Self {
        self.overrides.push((url_part.to_string(), layout));
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Navigate(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clicks(&self) -> Vec<(&'static str, MouseButton)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Click(kind, button) => Some((*kind, *button)),
                _ => None,
            })
            .collect()
    }

    pub fn row_queries(&self) -> Vec<String> {
        let rows: Vec<&str> = self
            .selectors
            .result_rows
            .iter()
            .map(|r| r.selector.as_str())
            .collect();
        self.queries
            .iter()
            .filter_map(|q| match q {
                ElementQuery::Css { selector } if rows.contains(&selector.as_str()) => {
                    Some(selector.clone())
                }
                _ => None,
            })
            .collect()
    }

    fn classify(&self, query: &ElementQuery) -> Option<u64> {
        let layout = &self.current;
        let s = &self.selectors;
        match query {
            ElementQuery::CssWithText {
                selector,
                text,
                exact: false,
            } if *selector == s.category_filter && *text == s.category_filter_text => {
                layout.category_filter.then_some(CATEGORY)
            }
            ElementQuery::Css { selector } => {
                if let Some(index) = s.result_rows.iter().position(|r| r.selector == *selector) {
                    return (layout.result_row == Some(index)).then_some(ROW_BASE + index as u64);
                }
                if *selector == s.playlist_filter[0] {
                    return layout.playlist_filter.then_some(PLAYLIST_FILTER);
                }
                let unscoped_input =
                    selector == "input[type=\"text\"]" || selector == "input[placeholder*=\"search\"]";
                (layout.page_input && unscoped_input).then_some(PAGE_INPUT)
            }
            ElementQuery::CssWithText {
                selector,
                text,
                exact: false,
            } if *text == s.menu_entry_text => {
                (layout.menu_entry && *selector == s.menu_entry[0].selector)
                    .then_some(MENU_ENTRY)
            }
            ElementQuery::CssWithText {
                selector,
                text,
                exact: true,
            } if text == PLAYLIST => {
                (layout.playlist_entry && selector == "[role=\"option\"]").then_some(PLAYLIST_ENTRY)
            }
            ElementQuery::Text { text } if text == PLAYLIST => {
                layout.page_text.then_some(PAGE_TEXT)
            }
            _ => None,
        }
    }
}

fn kind_of(handle: ElementHandle) -> &'static str {
    match handle.0 {
        CATEGORY => "category",
        MENU_ENTRY => "menu entry",
        PLAYLIST_FILTER => "playlist filter",
        PLAYLIST_ENTRY => "playlist entry",
        PAGE_TEXT => "page text",
        PAGE_INPUT => "page input",
        id if id >= ROW_BASE && id < MENU_ENTRY => "row",
        _ => "unknown",
    }
}

#[async_trait]
impl Backend for MockPage {
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
        self.events.push(Event::Navigate(url.to_string()));
        self.current = self
            .overrides
            .iter()
            .find(|(part, _)| url.contains(part.as_str()))
            .map(|(_, layout)| layout.clone())
            .unwrap_or_else(|| self.default_layout.clone());

        match self.current.nav {
            Nav::Ok => {}
            Nav::Stall => tokio::time::sleep(Duration::from_secs(3600)).await,
            Nav::Fail => return Err(BackendError::Navigation("net::ERR_FAILED".into())),
        }
        Ok(NavigationResult {
            url: url.to_string(),
            title: "Search".to_string(),
        })
    }

    async fn query(&mut self, query: &ElementQuery) -> Result<Option<ElementHandle>, BackendError> {
        self.queries.push(query.clone());
        Ok(self.classify(query).map(ElementHandle))
    }

    async fn click(
        &mut self,
        handle: ElementHandle,
        button: MouseButton,
    ) -> Result<(), BackendError> {
        let kind = kind_of(handle);
        if kind == "row" && self.current.row_click_fails {
            return Err(BackendError::ElementStale { handle });
        }
        self.events.push(Event::Click(kind, button));
        Ok(())
    }

    async fn fill(&mut self, handle: ElementHandle, text: &str) -> Result<(), BackendError> {
        self.events.push(Event::Fill(kind_of(handle), text.to_string()));
        Ok(())
    }

    async fn press_key(&mut self, key: &str) -> Result<(), BackendError> {
        if self.current.keyboard_fails {
            return Err(BackendError::Script("keyboard unavailable".into()));
        }
        self.events.push(Event::Key(key.to_string()));
        Ok(())
    }

    async fn type_text(&mut self, text: &str, _key_delay: Duration) -> Result<(), BackendError> {
        if self.current.keyboard_fails {
            return Err(BackendError::Script("keyboard unavailable".into()));
        }
        self.events.push(Event::Type(text.to_string()));
        Ok(())
    }
}
