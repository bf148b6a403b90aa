//! Network-idle detection over WebDriver.
//!
//! WebDriver has no network events, so the page is polled with
//! [`NETWORK_STATE_SCRIPT`]. The first poll wraps `fetch` and
//! `XMLHttpRequest` to count in-flight requests; every poll reports that
//! count, `document.readyState` and the number of resources completed so far.
//! [`IdleTracker`] turns the stream of snapshots into an idle verdict.
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Installs the request and resource counters once per document and returns
/// a [`NetworkSnapshot`]. Completed resources are counted by a
/// `PerformanceObserver`, so the count keeps growing after the browser's
/// resource-timing buffer fills.
pub const NETWORK_STATE_SCRIPT: &str = r#"
    const RESOURCE_BUFFER_SIZE = 10000;
    const w = window;
    if (!w.__drawpageNet) {
        const net = { inflight: 0, resources: performance.getEntriesByType('resource').length };
        const settle = () => { net.inflight = Math.max(0, net.inflight - 1); };
        w.__drawpageNet = net;
        performance.setResourceTimingBufferSize(RESOURCE_BUFFER_SIZE);
        if (typeof PerformanceObserver === 'function') {
            new PerformanceObserver(list => { net.resources += list.getEntries().length; })
                .observe({ type: 'resource' });
        }
        performance.addEventListener('resourcetimingbufferfull', () => {
            performance.clearResourceTimings();
        });
        if (typeof w.fetch === 'function') {
            const origFetch = w.fetch.bind(w);
            w.fetch = function (...args) {
                net.inflight++;
                return origFetch(...args).finally(settle);
            };
        }
        const origSend = XMLHttpRequest.prototype.send;
        XMLHttpRequest.prototype.send = function (...args) {
            net.inflight++;
            this.addEventListener('loadend', settle, { once: true });
            return origSend.apply(this, args);
        };
    }
    return {
        ready_state: document.readyState,
        inflight: w.__drawpageNet.inflight,
        resources: w.__drawpageNet.resources,
    };
"#;

/// One observation of page network activity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkSnapshot {
    pub ready_state: String,
    pub inflight: u32,
    pub resources: u64,
}

/// Declares the page idle once it is fully loaded, no more than
/// `max_inflight` requests are pending, and the resource count has held
/// steady for `window`.
#[derive(Debug, Clone)]
pub struct IdleTracker {
    window: Duration,
    max_inflight: u32,
    last_resources: Option<u64>,
    quiet_since: Option<Instant>,
}

impl IdleTracker {
    pub fn new(window: Duration, max_inflight: u32) -> Self {
        Self {
            window,
            max_inflight,
            last_resources: None,
            quiet_since: None,
        }
    }

    /// Feed a snapshot taken at `now`; returns `true` once idle.
    pub fn observe(&mut self, snapshot: &NetworkSnapshot, now: Instant) -> bool {
        let busy = snapshot.ready_state != "complete" || snapshot.inflight > self.max_inflight;
        if busy {
            self.last_resources = Some(snapshot.resources);
            self.quiet_since = None;
            return false;
        }

        if self.last_resources != Some(snapshot.resources) {
            self.last_resources = Some(snapshot.resources);
            self.quiet_since = Some(now);
        }
        let since = *self.quiet_since.get_or_insert(now);
        now.saturating_duration_since(since) >= self.window
    }
}
