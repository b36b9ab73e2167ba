//! Chromium surfaces over the Chrome `DevTools` Protocol.
//!
//! Only compiled with the `browser` feature. Launching needs a Chromium
//! binary on the machine; the console URL comes from the test environment.

use crate::result::{ProbeError, ProbeResult};
use crate::selector::Selector;
use crate::surface::Surface;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use tracing::{debug, warn};

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1440,
            viewport_height: 900,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

fn browser_error(e: impl std::fmt::Display) -> ProbeError {
    ProbeError::Browser {
        message: e.to_string(),
    }
}

/// Chrome answered the query with a protocol error, so the node is absent.
/// Any other error means the browser itself is unreachable.
fn is_missing_element(e: &CdpError) -> bool {
    matches!(e, CdpError::Chrome(_))
}

/// A launched Chromium instance
#[derive(Debug)]
pub struct ConsoleBrowser {
    config: BrowserConfig,
    inner: CdpBrowser,
    handle: tokio::task::JoinHandle<()>,
}

impl ConsoleBrowser {
    /// Launch Chromium
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be started
    pub async fn launch(config: BrowserConfig) -> ProbeResult<Self> {
        let mut builder =
            CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder.build().map_err(browser_error)?;

        let (inner, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(browser_error)?;
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!(error = %e, "devtools connection closed");
                    break;
                }
            }
        });
        debug!(headless = config.headless, "browser launched");

        Ok(Self {
            config,
            inner,
            handle,
        })
    }

    /// Open `url` in a new page
    ///
    /// # Errors
    ///
    /// Returns error if the page cannot be created or navigation fails
    pub async fn open(&self, url: &str) -> ProbeResult<CdpSurface> {
        let page = self.inner.new_page(url).await.map_err(browser_error)?;
        page.wait_for_navigation().await.map_err(browser_error)?;
        Ok(CdpSurface { page })
    }

    /// Get the browser configuration
    #[must_use]
    pub const fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Close the browser
    ///
    /// # Errors
    ///
    /// Returns error if the browser does not shut down cleanly
    pub async fn close(mut self) -> ProbeResult<()> {
        self.inner.close().await.map_err(browser_error)?;
        self.handle.abort();
        Ok(())
    }
}

/// A console page backed by a live browser tab
#[derive(Debug)]
pub struct CdpSurface {
    page: CdpPage,
}

impl CdpSurface {
    /// Navigate to `url`
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails
    pub async fn goto(&mut self, url: &str) -> ProbeResult<()> {
        self.page.goto(url).await.map_err(browser_error)?;
        Ok(())
    }
}

#[async_trait]
impl Surface for CdpSurface {
    async fn reload(&mut self) -> ProbeResult<()> {
        self.page.reload().await.map_err(browser_error)?;
        Ok(())
    }

    async fn element_text(&mut self, selector: &Selector) -> ProbeResult<Option<String>> {
        let css = selector.to_css();
        match self.page.find_element(css.as_str()).await {
            Ok(element) => element.inner_text().await.map_err(browser_error),
            Err(e) if is_missing_element(&e) => {
                debug!(selector = %css, error = %e, "element not found");
                Ok(None)
            }
            Err(e) => Err(browser_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport_matches_console_layout() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!((config.viewport_width, config.viewport_height), (1440, 900));
    }

    #[test]
    fn test_builder() {
        let config = BrowserConfig::default()
            .with_viewport(1920, 1080)
            .with_headless(false)
            .with_chromium_path("/usr/bin/chromium")
            .with_no_sandbox();
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.viewport_width, 1920);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
    }

    #[test]
    fn test_transport_failures_are_not_missing_elements() {
        let io = CdpError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "websocket closed",
        ));
        assert!(!is_missing_element(&io));
        assert!(!is_missing_element(&CdpError::Timeout));
    }
}
