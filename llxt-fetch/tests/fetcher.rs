//! Status classification and selection through a real HTTP round trip.

mod common;

use std::time::Duration;

use common::{fast_config, refused_url, start_backend, start_fixed, Reply};
use llxt_fetch::{FetchError, FetchErrorKind, Fetcher, TransportError, RATE_LIMIT_HINT};

#[tokio::test]
async fn test_success_returns_full_body() {
    let body = "# Hono\n\n> Web framework built on Web Standards\n";
    let backend = start_fixed(200, body).await;
    let fetcher = Fetcher::new(Some(fast_config(0)));

    let content = fetcher.fetch(&backend.url("/llms.txt")).await.unwrap();
    assert_eq!(content, body);
    assert_eq!(backend.hits(), 1);
}

#[tokio::test]
async fn test_empty_success_body() {
    let backend = start_fixed(204, "").await;
    let fetcher = Fetcher::new(Some(fast_config(0)));

    let content = fetcher.fetch(&backend.url("/llms.txt")).await.unwrap();
    assert!(content.is_empty());
}

#[tokio::test]
async fn test_not_found() {
    let backend = start_fixed(404, "missing").await;
    let fetcher = Fetcher::new(Some(fast_config(3)));
    let url = backend.url("/llms.txt");

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::NotFound);
    assert_eq!(err.url(), url);
    assert_eq!(err.status(), Some(404));
    // 404 is not retried
    assert_eq!(backend.hits(), 1);
}

#[tokio::test]
async fn test_rate_limited_carries_retry_after() {
    let backend =
        start_backend(|_| Reply::status(429).with_header("Retry-After", "5")).await;
    let fetcher = Fetcher::new(Some(fast_config(0)));

    let err = fetcher.fetch(&backend.url("/llms.txt")).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::RateLimited);
    assert_eq!(err.retry_after(), Some("5"));
    assert_eq!(err.hint(), Some(RATE_LIMIT_HINT));
    assert!(err.context().contains(&("retry_after", "5".to_string())));
}

#[tokio::test]
async fn test_rate_limited_without_header() {
    let backend = start_fixed(429, "").await;
    let fetcher = Fetcher::new(Some(fast_config(0)));

    let err = fetcher.fetch(&backend.url("/llms.txt")).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::RateLimited);
    assert_eq!(err.retry_after(), None);
}

#[tokio::test]
async fn test_other_error_statuses() {
    for status in [400u16, 401, 403, 410, 501] {
        let backend = start_fixed(status, "nope").await;
        let fetcher = Fetcher::new(Some(fast_config(0)));

        let err = fetcher.fetch(&backend.url("/llms.txt")).await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::ServerOrClientError, "{status}");
        assert_eq!(err.status(), Some(status));
    }
}

#[tokio::test]
async fn test_server_error_after_retries_exhausted() {
    let backend = start_fixed(503, "down").await;
    let fetcher = Fetcher::new(Some(fast_config(2).with_breaker(common::breaker(
        10,
        1,
        Duration::from_secs(30),
    ))));

    let err = fetcher.fetch(&backend.url("/llms.txt")).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 503, .. }));
    assert_eq!(backend.hits(), 3);
}

#[tokio::test]
async fn test_connection_refused_is_transport() {
    let url = refused_url().await;
    let fetcher = Fetcher::new(Some(fast_config(2)));

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::Transport);
    assert!(!err.is_circuit_open());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_timeout_is_transport() {
    let backend = start_backend(|_| Reply::Hang).await;
    let fetcher = Fetcher::new(Some(
        fast_config(0).with_timeout(Duration::from_millis(100)),
    ));

    let err = fetcher.fetch(&backend.url("/llms.txt")).await.unwrap_err();
    match err {
        FetchError::Transport { source, .. } => assert!(source.is_timeout()),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_is_idempotent() {
    let backend = start_fixed(200, "same content").await;
    let fetcher = Fetcher::new(Some(fast_config(0)));
    let url = backend.url("/llms.txt");

    let first = fetcher.fetch(&url).await.unwrap();
    let second = fetcher.fetch(&url).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_fetch_llms_txt_selects_target() {
    let backend = start_backend(|hit| Reply::ok(format!("served {}", hit.path))).await;
    let fetcher = Fetcher::new(Some(fast_config(0)));
    let primary = backend.url("/llms.txt");
    let full = backend.url("/llms-full.txt");

    let content = fetcher
        .fetch_llms_txt(&primary, Some(&full), true)
        .await
        .unwrap();
    assert_eq!(content, "served /llms-full.txt");

    let content = fetcher
        .fetch_llms_txt(&primary, Some(&full), false)
        .await
        .unwrap();
    assert_eq!(content, "served /llms.txt");

    let content = fetcher.fetch_llms_txt(&primary, None, true).await.unwrap();
    assert_eq!(content, "served /llms.txt");
}

#[tokio::test]
async fn test_cancel_aborts_in_flight_attempt() {
    let backend = start_backend(|_| Reply::Hang).await;
    let fetcher = Fetcher::new(Some(fast_config(5)));

    let started = std::time::Instant::now();
    let err = fetcher
        .fetch_or_cancel(
            &backend.url("/llms.txt"),
            tokio::time::sleep(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchError::Transport {
            source: TransportError::Cancelled,
            ..
        }
    ));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(backend.hits(), 1);
}

#[tokio::test]
async fn test_close_releases_fetcher() {
    let backend = start_fixed(200, "ok").await;
    let fetcher = Fetcher::new(Some(fast_config(0)));
    let client = fetcher.client().clone();
    fetcher.close();

    // A surviving clone of the client keeps working.
    let response = client.get(&backend.url("/llms.txt")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
}
