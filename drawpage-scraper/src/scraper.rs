use crate::engine::{RenderEngine, RenderSession, SessionGuard, WebDriverEngine};
use crate::target::DrawTarget;
use drawpage_common::{DrawpageError, NavigationConfig, Result, ScraperConfig};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Extracts marker-element markup from draw result pages.
///
/// Every [`scrape`](Self::scrape) launches its own session and releases it
/// before returning, on success and on every failure. Nothing is pooled or
/// rate limited: N concurrent calls run N browsers.
pub struct Scraper<E> {
    engine: E,
    selector: String,
    timeout: Duration,
}

impl Scraper<WebDriverEngine> {
    /// Scraper backed by Chrome over WebDriver.
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(
            WebDriverEngine::new(config.engine.clone(), config.navigation.clone()),
            config.selector.clone(),
            &config.navigation,
        )
    }
}

impl<E: RenderEngine> Scraper<E> {
    pub fn new(engine: E, selector: impl Into<String>, navigation: &NavigationConfig) -> Self {
        Self {
            engine,
            selector: selector.into(),
            timeout: navigation.timeout(),
        }
    }

    /// Fetch `target`, wait for the network to settle, and return the inner
    /// markup of every element matching the selector in document order.
    ///
    /// Navigation plus the idle wait is bounded by the navigation timeout and
    /// aborted early when `cancel` fires. Launching is not cancellable; it is
    /// bounded by the engine's own startup timeout. If this future is dropped
    /// before it completes, the session is closed on a spawned task.
    pub async fn scrape(
        &self,
        target: &DrawTarget,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        let address = target.address();
        let started = Instant::now();
        if cancel.is_cancelled() {
            return Err(DrawpageError::Cancelled);
        }

        let mut guard = SessionGuard::new(self.engine.launch().await?);
        let outcome = match guard.session_mut() {
            Ok(session) => self.extract(session, &address, cancel).await,
            Err(err) => Err(err),
        };
        let released = guard.release().await;

        let fragments = match (outcome, released) {
            (Ok(fragments), Ok(())) => fragments,
            (Ok(fragments), Err(err)) => {
                warn!(target: "scraper", %address, error = %err, "session release failed after extraction");
                fragments
            }
            (Err(err), Ok(())) => return Err(err),
            (Err(err), Err(release_err)) => {
                warn!(target: "scraper", %address, error = %release_err, "session release failed");
                return Err(err);
            }
        };

        info!(
            target: "scraper",
            %address,
            selector = %self.selector,
            matches = fragments.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scrape finished"
        );
        Ok(fragments)
    }

    async fn extract(
        &self,
        session: &mut E::Session,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DrawpageError::Cancelled),
            navigated = tokio::time::timeout(self.timeout, session.navigate(address)) => {
                navigated.map_err(|_| DrawpageError::Timeout(self.timeout))??;
            }
        }
        if cancel.is_cancelled() {
            return Err(DrawpageError::Cancelled);
        }
        session.inner_html_all(&self.selector).await
    }
}

/// Scrape `base_url/slug/draw_no` with a Chrome session configured by `config`.
///
/// Each call spawns its own browser; callers issuing many concurrent scrapes
/// must bound concurrency themselves.
pub async fn scrape_data(
    base_url: &str,
    slug: &str,
    draw_no: &str,
    config: &ScraperConfig,
) -> Result<Vec<String>> {
    Scraper::from_config(config)
        .scrape(
            &DrawTarget::new(base_url, slug, draw_no),
            &CancellationToken::new(),
        )
        .await
}
