//! Rendering engine seam.
//!
//! [`Scraper`](crate::Scraper) only needs four things from a browser:
//! launch, navigate-until-idle, query, close. [`WebDriverEngine`] provides
//! them over `drawpage-drivers`; tests provide in-memory fakes.
use async_trait::async_trait;
use drawpage_common::{DrawpageError, EngineConfig, NavigationConfig, Result};
use drawpage_drivers::drawpage_browser::{driver::DrawpageDriver, page::DrawpagePage};
use tracing::{debug, warn};

/// Starts isolated rendering sessions.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    type Session: RenderSession + 'static;

    /// Start a fresh session. Each call owns an independent browser process.
    async fn launch(&self) -> Result<Self::Session>;
}

/// One live browser session with a single page.
#[async_trait]
pub trait RenderSession: Send {
    /// Navigate to `address` and return once the network is idle.
    async fn navigate(&mut self, address: &str) -> Result<()>;

    /// Inner markup of every element matching `selector`, in document order.
    async fn inner_html_all(&mut self, selector: &str) -> Result<Vec<String>>;

    /// Tear the session down.
    async fn close(self) -> Result<()>;
}

/// Owns a live session until it is explicitly released.
///
/// Dropping an armed guard (the owning future was cancelled, timed out or
/// aborted) closes the session on a spawned task.
pub struct SessionGuard<S: RenderSession + 'static> {
    session: Option<S>,
}

impl<S: RenderSession + 'static> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn session_mut(&mut self) -> Result<&mut S> {
        self.session
            .as_mut()
            .ok_or_else(|| DrawpageError::Release("session already released".into()))
    }

    /// Disarm the guard and close the session in the caller's task.
    pub async fn release(mut self) -> Result<()> {
        match self.session.take() {
            Some(session) => session.close().await,
            None => Ok(()),
        }
    }
}

impl<S: RenderSession + 'static> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(err) = session.close().await {
                        warn!(target: "scraper", error = %err, "deferred session release failed");
                    }
                });
            }
            Err(_) => {
                warn!(target: "scraper", "no runtime available; session dropped without release");
            }
        }
    }
}

/// Chrome driven over WebDriver.
#[derive(Debug, Clone)]
pub struct WebDriverEngine {
    engine: EngineConfig,
    navigation: NavigationConfig,
}

impl WebDriverEngine {
    pub fn new(engine: EngineConfig, navigation: NavigationConfig) -> Self {
        Self { engine, navigation }
    }
}

/// Session handed out by [`WebDriverEngine`].
pub struct WebDriverSession {
    driver: DrawpageDriver,
    page: DrawpagePage,
}

#[async_trait]
impl RenderEngine for WebDriverEngine {
    type Session = WebDriverSession;

    async fn launch(&self) -> Result<WebDriverSession> {
        let driver = DrawpageDriver::launch(&self.engine)
            .await
            .map_err(|e| DrawpageError::Launch(format!("{e:#}")))?;
        let page = driver.page(self.navigation.clone());
        Ok(WebDriverSession { driver, page })
    }
}

#[async_trait]
impl RenderSession for WebDriverSession {
    async fn navigate(&mut self, address: &str) -> Result<()> {
        self.page
            .load(address)
            .await
            .map_err(|e| DrawpageError::Navigation {
                url: address.to_string(),
                reason: format!("{e:#}"),
            })?;
        self.page
            .wait_for_network_idle()
            .await
            .map_err(|e| DrawpageError::NetworkIdle(format!("{e:#}")))?;

        if let Ok(landed) = self.page.get_url().await {
            debug!(target: "browser.navigate", requested = %address, %landed, "navigation finished");
        }
        Ok(())
    }

    async fn inner_html_all(&mut self, selector: &str) -> Result<Vec<String>> {
        self.page
            .inner_html_all(selector)
            .await
            .map_err(|e| DrawpageError::Query {
                selector: selector.to_string(),
                reason: format!("{e:#}"),
            })
    }

    async fn close(self) -> Result<()> {
        self.driver
            .close()
            .await
            .map_err(|e| DrawpageError::Release(format!("{e:#}")))
    }
}
