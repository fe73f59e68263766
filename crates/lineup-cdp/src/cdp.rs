use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use lineup_engine::config::schema::PlayerConfig;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;

/// How to start the browser.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Profile directory kept between runs so the player login persists.
    pub user_data_dir: PathBuf,
    pub visible: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub launch_timeout: Duration,
}

impl LaunchOptions {
    pub fn from_config(player: &PlayerConfig) -> Self {
        Self {
            user_data_dir: player.user_data_dir.clone(),
            visible: true,
            window_width: player.window_width,
            window_height: player.window_height,
            launch_timeout: Duration::from_millis(player.launch_timeout_ms),
        }
    }

    pub fn headless(mut self) -> Self {
        self.visible = false;
        self
    }
}

pub struct CdpClient {
    pub browser: Browser,
    pub handler_task: JoinHandle<()>,
    pub page: Page,
}

impl CdpClient {
    pub async fn launch(
        options: &LaunchOptions,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        std::fs::create_dir_all(&options.user_data_dir)?;

        let mut config_builder = BrowserConfig::builder()
            .no_sandbox()
            .user_data_dir(&options.user_data_dir)
            .window_size(options.window_width, options.window_height)
            .viewport(None)
            .launch_timeout(options.launch_timeout);

        if options.visible {
            tracing::info!("Launching browser in visible mode");
            config_builder = config_builder.with_head();
        } else {
            tracing::info!("Launching browser in headless mode");
        }

        if let Ok(chrome_bin) = std::env::var("CHROME_BIN") {
            tracing::info!("Using custom Chrome binary: {}", chrome_bin);
            config_builder = config_builder.chrome_executable(chrome_bin);
        }

        let (browser, mut handler) = Browser::launch(
            config_builder
                .build()
                .map_err(|e| format!("Failed to build browser config: {}", e))?,
        )
        .await
        .map_err(|e| format!("Failed to launch browser: {}", e))?;

        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if let Err(e) = h {
                    tracing::debug!("Browser handler error (ignoring): {}", e);
                }
            }
            tracing::info!("Browser handler task ended");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| format!("Failed to create page: {}", e))?;

        tracing::info!(profile = %options.user_data_dir.display(), "Browser ready");
        Ok(Self {
            browser,
            handler_task,
            page,
        })
    }

    pub async fn close(mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.browser
            .close()
            .await
            .map_err(|e| format!("Error closing browser: {}", e))?;
        self.handler_task
            .await
            .map_err(|e| format!("Error awaiting handler: {}", e))?;
        Ok(())
    }
}
