//! Driver layer for headless browser automation.
//!
//! This crate owns everything that talks to the browser: launching a
//! WebDriver session, navigating, waiting for the network to settle and
//! reading markup back out of the DOM.
//!
//! - [`drawpage_browser::driver::DrawpageDriver`]: WebDriver session wrapper
//! - [`drawpage_browser::page::DrawpagePage`]: navigation and DOM queries
//! - [`drawpage_browser::idle`]: network-idle script and tracker
//! - [`drawpage_browser::launch`]: Chrome arguments and capabilities
//! - [`drawpage_browser::service`]: per-session chromedriver process
pub mod drawpage_browser;
