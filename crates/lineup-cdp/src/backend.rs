use crate::cdp::{CdpClient, LaunchOptions};
use crate::inject::{self, EvalError};
use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
    DispatchMouseEventType, MouseButton as CdpMouseButton,
};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use lineup_engine::backend::{Backend, BackendError, NavigationResult};
use lineup_engine::element::{ElementHandle, ElementQuery, MouseButton};
use std::time::Duration;
use tracing::{debug, info};

/// Drives one visible Chromium page.
pub struct ChromiumBackend {
    client: Option<CdpClient>,
    options: LaunchOptions,
}

impl ChromiumBackend {
    pub fn new(options: LaunchOptions) -> Self {
        Self {
            client: None,
            options,
        }
    }

    fn page(&self) -> Result<&Page, BackendError> {
        self.client
            .as_ref()
            .map(|c| &c.page)
            .ok_or(BackendError::NotReady)
    }

    async fn element(&self, handle: ElementHandle) -> Result<Element, BackendError> {
        self.page()?
            .find_element(inject::handle_selector(handle.0))
            .await
            .map_err(|e| match e {
                CdpError::NotFound => BackendError::ElementStale { handle },
                other => map_cdp(other),
            })
    }

    async fn key(&self, event: DispatchKeyEventParams) -> Result<(), BackendError> {
        self.page()?.execute(event).await.map_err(map_cdp)?;
        Ok(())
    }
}

fn map_cdp(err: CdpError) -> BackendError {
    match err {
        CdpError::Timeout => BackendError::Timeout,
        CdpError::Ws(_) | CdpError::ChannelSendError(_) => BackendError::ConnectionLost,
        other => BackendError::Other(other.to_string()),
    }
}

fn map_eval(err: EvalError) -> BackendError {
    match err {
        EvalError::Timeout => BackendError::TimeoutWithContext {
            operation: "locator evaluation".to_string(),
        },
        other => BackendError::Script(other.to_string()),
    }
}

/// DevTools key identifiers for the named keys the engine sends.
fn key_definition(key: &str) -> (&str, Option<&'static str>, i64) {
    match key {
        "Enter" => ("Enter", Some("\r"), 13),
        "Escape" => ("Escape", None, 27),
        "Tab" => ("Tab", None, 9),
        "Backspace" => ("Backspace", None, 8),
        other => (other, None, 0),
    }
}

fn key_event(
    kind: DispatchKeyEventType,
    key: &str,
    text: Option<&str>,
) -> Result<DispatchKeyEventParams, BackendError> {
    let (code, _, vk) = key_definition(key);
    let mut builder = DispatchKeyEventParams::builder().r#type(kind).key(key).code(code);
    if vk != 0 {
        builder = builder.windows_virtual_key_code(vk).native_virtual_key_code(vk);
    }
    if let Some(text) = text {
        builder = builder.text(text);
    }
    builder
        .build()
        .map_err(|e| BackendError::Other(format!("Failed to build key event: {:?}", e)))
}

fn mouse_event(
    kind: DispatchMouseEventType,
    x: f64,
    y: f64,
    button: CdpMouseButton,
) -> Result<DispatchMouseEventParams, BackendError> {
    DispatchMouseEventParams::builder()
        .r#type(kind)
        .x(x)
        .y(y)
        .button(button)
        .click_count(1)
        .build()
        .map_err(|e| BackendError::Other(format!("Failed to build mouse event: {:?}", e)))
}

#[async_trait]
impl Backend for ChromiumBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        info!("Launching Chromium...");
        let client = CdpClient::launch(&self.options)
            .await
            .map_err(|e| BackendError::Other(e.to_string()))?;
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| BackendError::Other(e.to_string()))?;
        }
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        let page = self.page()?;
        debug!("Navigating to: {}", url);
        page.goto(url).await.map_err(|e| match e {
            CdpError::Timeout => BackendError::TimeoutWithContext {
                operation: format!("navigate to {}", url),
            },
            other => BackendError::Navigation(other.to_string()),
        })?;

        let title = page.get_title().await.ok().flatten().unwrap_or_default();
        let url = page
            .url()
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?
            .unwrap_or_default();
        Ok(NavigationResult { url, title })
    }

    async fn query(&mut self, query: &ElementQuery) -> Result<Option<ElementHandle>, BackendError> {
        let page = self.page()?;
        let found = inject::locate(page, query).await.map_err(map_eval)?;
        Ok(found.map(ElementHandle))
    }

    async fn click(&mut self, handle: ElementHandle, button: MouseButton) -> Result<(), BackendError> {
        let element = self.element(handle).await?;
        element
            .scroll_into_view()
            .await
            .map_err(|e| BackendError::ElementNotInteractable {
                handle,
                reason: e.to_string(),
            })?;
        let point = element
            .clickable_point()
            .await
            .map_err(|e| BackendError::ElementNotInteractable {
                handle,
                reason: e.to_string(),
            })?;

        let button = match button {
            MouseButton::Left => CdpMouseButton::Left,
            MouseButton::Right => CdpMouseButton::Right,
        };
        let page = self.page()?;
        for kind in [
            DispatchMouseEventType::MouseMoved,
            DispatchMouseEventType::MousePressed,
            DispatchMouseEventType::MouseReleased,
        ] {
            page.execute(mouse_event(kind, point.x, point.y, button.clone())?)
                .await
                .map_err(map_cdp)?;
        }
        Ok(())
    }

    async fn fill(&mut self, handle: ElementHandle, text: &str) -> Result<(), BackendError> {
        let element = self.element(handle).await?;
        element.click().await.map_err(|e| BackendError::ElementNotInteractable {
            handle,
            reason: e.to_string(),
        })?;
        if !inject::clear(self.page()?, handle.0).await.map_err(map_eval)? {
            return Err(BackendError::ElementStale { handle });
        }
        element.type_str(text).await.map_err(map_cdp)?;
        Ok(())
    }

    async fn press_key(&mut self, key: &str) -> Result<(), BackendError> {
        let (_, text, _) = key_definition(key);
        self.key(key_event(DispatchKeyEventType::KeyDown, key, text)?)
            .await?;
        self.key(key_event(DispatchKeyEventType::KeyUp, key, None)?)
            .await
    }

    async fn type_text(&mut self, text: &str, key_delay: Duration) -> Result<(), BackendError> {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let key = ch.encode_utf8(&mut buf);
            self.key(key_event(DispatchKeyEventType::KeyDown, key, Some(key))?)
                .await?;
            self.key(key_event(DispatchKeyEventType::KeyUp, key, None)?)
                .await?;
            tokio::time::sleep(key_delay).await;
        }
        Ok(())
    }
}
