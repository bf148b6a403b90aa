use crate::drawpage_browser::idle::{IdleTracker, NetworkSnapshot, NETWORK_STATE_SCRIPT};
use anyhow::{Context, Result};
use drawpage_common::NavigationConfig;
use fantoccini::Client;
use serde_json::json;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// Collects `innerHTML` of every match in document order, in one round trip.
const INNER_HTML_SCRIPT: &str = r#"
    return Array.from(document.querySelectorAll(arguments[0]), el => el.innerHTML);
"#;

/// Page context of a browser session.
pub struct DrawpagePage {
    pub(crate) client: Client,
    pub(crate) navigation: NavigationConfig,
}

impl DrawpagePage {
    /// Construct a page wrapper around an existing WebDriver client.
    pub fn new(client: Client, navigation: NavigationConfig) -> Self {
        Self { client, navigation }
    }

    /// Navigate to `url`, returning once the document has loaded.
    ///
    /// Follow with [`wait_for_network_idle`](Self::wait_for_network_idle);
    /// neither applies a deadline, callers bound both with their own timeout.
    pub async fn load(&self, url: &str) -> Result<()> {
        info!(target: "browser.navigate", %url, "navigating");
        self.client
            .goto(url)
            .await
            .with_context(|| format!("failed to load {url}"))
    }

    /// Poll the page until [`IdleTracker`] reports an idle network.
    pub async fn wait_for_network_idle(&self) -> Result<()> {
        let started = Instant::now();
        let mut tracker = IdleTracker::new(
            self.navigation.idle_window(),
            self.navigation.max_inflight,
        );
        loop {
            let snapshot = self.network_snapshot().await?;
            debug!(
                target: "browser.idle",
                ready_state = %snapshot.ready_state,
                inflight = snapshot.inflight,
                resources = snapshot.resources,
                "network snapshot"
            );
            if tracker.observe(&snapshot, Instant::now().into_std()) {
                info!(
                    target: "browser.idle",
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "network idle"
                );
                return Ok(());
            }
            sleep(self.navigation.poll_interval()).await;
        }
    }

    async fn network_snapshot(&self) -> Result<NetworkSnapshot> {
        let raw = self
            .client
            .execute(NETWORK_STATE_SCRIPT, vec![])
            .await
            .context("network state script failed")?;
        serde_json::from_value(raw).context("unexpected network state result")
    }

    /// Return the inner HTML of every element matching `selector`, in
    /// document order. An empty vector means nothing matched.
    pub async fn inner_html_all(&self, selector: &str) -> Result<Vec<String>> {
        let raw = self
            .client
            .execute(INNER_HTML_SCRIPT, vec![json!(selector)])
            .await
            .with_context(|| format!("failed to evaluate selector `{selector}`"))?;
        let fragments: Vec<String> =
            serde_json::from_value(raw).context("selector query returned a non-string list")?;
        debug!(target: "browser.query", %selector, matches = fragments.len(), "selector evaluated");
        Ok(fragments)
    }

    /// Return the current page URL.
    pub async fn get_url(&self) -> Result<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(anyhow::Error::from)
    }
}
