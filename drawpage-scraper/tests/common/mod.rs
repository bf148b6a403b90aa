#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use drawpage_common::observability::{LogConfig, LogFormat};
use drawpage_common::{DrawpageError, Result};
use drawpage_scraper::{RenderEngine, RenderSession};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "drawpage-tests",
            log_dir: Some(std::env::temp_dir().join("drawpage-tests")),
            emit_stderr: true,
            format: if std::env::var("DRAWPAGE_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug",
        };

        drawpage_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// How a [`FakeSession`] behaves on navigation.
#[derive(Debug, Clone)]
pub enum NavigateBehavior {
    Succeed,
    Fail,
    Hang,
}

/// In-memory engine serving a fixed list of marker fragments.
#[derive(Clone)]
pub struct FakeEngine {
    pub fragments: Vec<String>,
    pub navigate: NavigateBehavior,
    pub fail_launch: bool,
    pub fail_query: bool,
    pub fail_close: bool,
    pub launches: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
    pub visited: Arc<Mutex<Vec<String>>>,
}

impl FakeEngine {
    pub fn serving<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            navigate: NavigateBehavior::Succeed,
            fail_launch: false,
            fail_query: false,
            fail_close: false,
            launches: Arc::default(),
            closes: Arc::default(),
            visited: Arc::default(),
        }
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

pub struct FakeSession {
    engine: FakeEngine,
}

#[async_trait]
impl RenderEngine for FakeEngine {
    type Session = FakeSession;

    async fn launch(&self) -> Result<FakeSession> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_launch {
            return Err(DrawpageError::Launch("no chrome here".into()));
        }
        Ok(FakeSession {
            engine: self.clone(),
        })
    }
}

#[async_trait]
impl RenderSession for FakeSession {
    async fn navigate(&mut self, address: &str) -> Result<()> {
        self.engine.visited.lock().unwrap().push(address.to_string());
        match self.engine.navigate {
            NavigateBehavior::Succeed => Ok(()),
            NavigateBehavior::Fail => Err(DrawpageError::Navigation {
                url: address.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".into(),
            }),
            NavigateBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }

    async fn inner_html_all(&mut self, selector: &str) -> Result<Vec<String>> {
        if self.engine.fail_query {
            return Err(DrawpageError::Query {
                selector: selector.to_string(),
                reason: "invalid selector".into(),
            });
        }
        Ok(self.engine.fragments.clone())
    }

    async fn close(self) -> Result<()> {
        self.engine.closes.fetch_add(1, Ordering::SeqCst);
        if self.engine.fail_close {
            return Err(DrawpageError::Release("browser already gone".into()));
        }
        Ok(())
    }
}
