//! Draw results page scraping.
//!
//! Builds the address of a draw results page from a base URL, a slug and a
//! draw number, renders it in a headless browser, waits for the network to
//! go idle and returns the inner markup of every marker element (`.B` by
//! default) in document order.
//!
//! - [`scrape_data`]: one-shot entry point driven by a [`ScraperConfig`]
//! - [`Scraper`]: the same operation over any [`RenderEngine`], with
//!   cancellation
//! - [`DrawTarget`]: the page descriptor
//!
//! ```no_run
//! # async fn demo() -> drawpage_common::Result<()> {
//! use drawpage_common::ScraperConfig;
//!
//! let fragments =
//!     drawpage_scraper::scrape_data("https://draws.test", "lotto", "2041", &ScraperConfig::default())
//!         .await?;
//! for html in &fragments {
//!     println!("{html}");
//! }
//! # Ok(()) }
//! ```
pub mod engine;
pub mod scraper;
pub mod target;

pub use drawpage_common::ScraperConfig;
pub use engine::{RenderEngine, RenderSession, SessionGuard, WebDriverEngine};
pub use scraper::{scrape_data, Scraper};
pub use target::DrawTarget;
pub use tokio_util::sync::CancellationToken;
