mod common;

use std::time::Duration;

use common::{init_test_tracing, FakeEngine, NavigateBehavior};
use drawpage_common::{DrawpageError, NavigationConfig, DEFAULT_MARKER_SELECTOR};
use drawpage_scraper::{CancellationToken, DrawTarget, Scraper, SessionGuard};

fn target() -> DrawTarget {
    DrawTarget::new("http://x.test", "abc", "42")
}

fn scraper(engine: &FakeEngine, timeout_ms: u64) -> Scraper<FakeEngine> {
    let navigation = NavigationConfig {
        timeout_ms,
        ..NavigationConfig::default()
    };
    Scraper::new(engine.clone(), DEFAULT_MARKER_SELECTOR, &navigation)
}

#[tokio::test]
async fn returns_fragments_in_document_order() {
    init_test_tracing();
    let engine = FakeEngine::serving(["<b>1</b>", "<b>2</b>"]);

    let fragments = scraper(&engine, 1_000)
        .scrape(&target(), &CancellationToken::new())
        .await
        .expect("scrape succeeds");

    assert_eq!(fragments, vec!["<b>1</b>", "<b>2</b>"]);
    assert_eq!(engine.visited(), vec!["http://x.test/abc/42"]);
    assert_eq!(engine.launches(), 1);
    assert_eq!(engine.closes(), 1);
}

#[tokio::test]
async fn no_matches_yield_empty_result() {
    init_test_tracing();
    let engine = FakeEngine::serving(Vec::<String>::new());

    let fragments = scraper(&engine, 1_000)
        .scrape(&target(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(fragments.is_empty());
    assert_eq!(engine.closes(), 1);
}

#[tokio::test]
async fn navigation_failure_still_releases_session() {
    init_test_tracing();
    let mut engine = FakeEngine::serving(["<b>1</b>"]);
    engine.navigate = NavigateBehavior::Fail;

    let err = scraper(&engine, 1_000)
        .scrape(&target(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DrawpageError::Navigation { ref url, .. } if url == "http://x.test/abc/42"));
    assert_eq!(engine.closes(), 1);
}

#[tokio::test]
async fn query_failure_still_releases_session() {
    init_test_tracing();
    let mut engine = FakeEngine::serving(["<b>1</b>"]);
    engine.fail_query = true;

    let err = scraper(&engine, 1_000)
        .scrape(&target(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DrawpageError::Query { .. }));
    assert_eq!(engine.closes(), 1);
}

#[tokio::test]
async fn launch_failure_has_nothing_to_release() {
    init_test_tracing();
    let mut engine = FakeEngine::serving(["<b>1</b>"]);
    engine.fail_launch = true;

    let err = scraper(&engine, 1_000)
        .scrape(&target(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DrawpageError::Launch(_)));
    assert_eq!(engine.closes(), 0);
    assert!(engine.visited().is_empty());
}

#[tokio::test]
async fn slow_navigation_times_out_and_releases() {
    init_test_tracing();
    let mut engine = FakeEngine::serving(["<b>1</b>"]);
    engine.navigate = NavigateBehavior::Hang;

    let err = scraper(&engine, 50)
        .scrape(&target(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DrawpageError::Timeout(d) if d == Duration::from_millis(50)));
    assert_eq!(engine.closes(), 1);
}

#[tokio::test]
async fn cancellation_aborts_navigation_and_releases() {
    init_test_tracing();
    let mut engine = FakeEngine::serving(["<b>1</b>"]);
    engine.navigate = NavigateBehavior::Hang;
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    let canceller = async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    };
    let scraper = scraper(&engine, 60_000);
    let target = target();
    let (result, ()) = futures::join!(scraper.scrape(&target, &cancel), canceller);

    assert!(matches!(result, Err(DrawpageError::Cancelled)));
    assert_eq!(engine.closes(), 1);
}

#[tokio::test]
async fn already_cancelled_token_never_launches() {
    init_test_tracing();
    let engine = FakeEngine::serving(["<b>1</b>"]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = scraper(&engine, 1_000).scrape(&target(), &cancel).await;

    assert!(matches!(result, Err(DrawpageError::Cancelled)));
    assert_eq!(engine.launches(), 0);
    assert_eq!(engine.closes(), 0);
}

#[tokio::test]
async fn release_failure_after_extraction_keeps_result() {
    init_test_tracing();
    let mut engine = FakeEngine::serving(["<b>7</b>"]);
    engine.fail_close = true;

    let fragments = scraper(&engine, 1_000)
        .scrape(&target(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(fragments, vec!["<b>7</b>"]);
    assert_eq!(engine.closes(), 1);
}

#[tokio::test]
async fn each_scrape_uses_its_own_session() {
    init_test_tracing();
    let engine = FakeEngine::serving(["<b>1</b>"]);
    let scraper = scraper(&engine, 1_000);
    let cancel = CancellationToken::new();

    for draw in ["1", "2", "3"] {
        scraper
            .scrape(&DrawTarget::new("http://x.test", "abc", draw), &cancel)
            .await
            .unwrap();
    }

    assert_eq!(engine.launches(), 3);
    assert_eq!(engine.closes(), 3);
    assert_eq!(
        engine.visited(),
        vec![
            "http://x.test/abc/1",
            "http://x.test/abc/2",
            "http://x.test/abc/3"
        ]
    );
}

#[tokio::test]
async fn dropped_scrape_future_still_releases_session() {
    init_test_tracing();
    let mut engine = FakeEngine::serving(["<b>1</b>"]);
    engine.navigate = NavigateBehavior::Hang;
    let scraper = scraper(&engine, 60_000);
    let target = target();
    let cancel = CancellationToken::new();

    let outer = tokio::time::timeout(
        Duration::from_millis(50),
        scraper.scrape(&target, &cancel),
    )
    .await;
    assert!(outer.is_err(), "outer deadline should fire first");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(engine.launches(), 1);
    assert_eq!(engine.closes(), 1);
}

#[tokio::test]
async fn explicit_release_disarms_guard() {
    init_test_tracing();
    let engine = FakeEngine::serving(["<b>1</b>"]);
    let session = drawpage_scraper::RenderEngine::launch(&engine).await.unwrap();

    let guard = SessionGuard::new(session);
    guard.release().await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(engine.closes(), 1);
}
