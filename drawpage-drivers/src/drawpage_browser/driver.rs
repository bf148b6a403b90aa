use crate::drawpage_browser::{
    launch::build_capabilities, page::DrawpagePage, service::ChromeDriverService,
};
use anyhow::{anyhow, Context, Result};
use drawpage_common::{EngineConfig, NavigationConfig};
use fantoccini::{Client, ClientBuilder};
use tracing::{info, warn};

/// A `fantoccini` WebDriver session and, when it was spawned for this
/// session, the chromedriver process behind it.
pub struct DrawpageDriver {
    pub client: Client,
    service: Option<ChromeDriverService>,
}

impl DrawpageDriver {
    /// Start a browser session.
    ///
    /// Connects to `engine.webdriver_url` when set; otherwise spawns
    /// chromedriver from `engine.chromedriver_path` for this session alone.
    pub async fn launch(engine: &EngineConfig) -> Result<Self> {
        let service = match &engine.webdriver_url {
            Some(_) => None,
            None => Some(
                ChromeDriverService::spawn(&engine.chromedriver_path, engine.startup_timeout())
                    .await?,
            ),
        };
        let endpoint = match (&engine.webdriver_url, &service) {
            (Some(url), _) => url.clone(),
            (None, Some(svc)) => svc.url().to_string(),
            (None, None) => return Err(anyhow!("no WebDriver endpoint available")),
        };

        let connected = ClientBuilder::native()
            .capabilities(build_capabilities(engine))
            .connect(&endpoint)
            .await
            .with_context(|| {
                format!(
                    "failed to start browser `{}` via {endpoint}",
                    engine.executable_path
                )
            });

        let client = match connected {
            Ok(client) => client,
            Err(err) => {
                if let Some(svc) = service {
                    if let Err(shutdown_err) = svc.shutdown().await {
                        warn!(target: "browser.launch", error = %shutdown_err, "chromedriver shutdown failed");
                    }
                }
                return Err(err);
            }
        };

        info!(
            target: "browser.launch",
            %endpoint,
            executable = %engine.executable_path,
            headless = engine.headless,
            "browser session started"
        );
        Ok(Self { client, service })
    }

    /// Open the page context of this session.
    pub fn page(&self, navigation: NavigationConfig) -> DrawpagePage {
        DrawpagePage::new(self.client.clone(), navigation)
    }

    /// End the browser session and stop any chromedriver spawned for it.
    ///
    /// The chromedriver is stopped even when closing the session fails.
    pub async fn close(self) -> Result<()> {
        let closed = self
            .client
            .close()
            .await
            .context("failed to close browser session");

        if let Some(svc) = self.service {
            if let Err(err) = svc.shutdown().await {
                warn!(target: "browser.launch", error = %err, "chromedriver shutdown failed");
            }
        }

        closed?;
        info!(target: "browser.launch", "browser session closed");
        Ok(())
    }
}
