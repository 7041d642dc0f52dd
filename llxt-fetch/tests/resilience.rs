//! Retry and circuit breaker behavior against a live backend.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{breaker, fast_config, refused_url, start_backend, start_fixed, Reply};
use llxt_fetch::{CircuitState, ClientConfig, FailurePolicy, FetchError, FetchErrorKind, Fetcher};

#[tokio::test]
async fn test_transport_failures_then_success() {
    for n in 0..=3usize {
        let backend = start_backend(move |hit| {
            if hit.index <= n {
                Reply::Drop
            } else {
                Reply::ok(format!("attempt {}", hit.index))
            }
        })
        .await;
        let fetcher = Fetcher::new(Some(fast_config(u32::try_from(n).unwrap())));

        let content = fetcher.fetch(&backend.url("/llms.txt")).await.unwrap();
        assert_eq!(content, format!("attempt {}", n + 1));
        assert_eq!(backend.hits(), n + 1);
    }
}

#[tokio::test]
async fn test_retries_exhausted_one_short() {
    for n in 1..=3usize {
        let backend = start_backend(move |hit| {
            if hit.index <= n {
                Reply::Drop
            } else {
                Reply::ok("late")
            }
        })
        .await;
        let fetcher = Fetcher::new(Some(fast_config(u32::try_from(n - 1).unwrap())));

        let err = fetcher.fetch(&backend.url("/llms.txt")).await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Transport);
        assert_eq!(backend.hits(), n);
    }
}

#[tokio::test]
async fn test_retryable_status_then_success() {
    let backend = start_backend(|hit| match hit.index {
        1 => Reply::status(503),
        2 => Reply::status(429).with_header("Retry-After", "0"),
        _ => Reply::ok("recovered"),
    })
    .await;
    let fetcher = Fetcher::new(Some(fast_config(2)));

    let content = fetcher.fetch(&backend.url("/llms.txt")).await.unwrap();
    assert_eq!(content, "recovered");
    assert_eq!(backend.hits(), 3);
}

#[tokio::test]
async fn test_breaker_opens_and_fails_fast() {
    let backend = start_fixed(500, "boom").await;
    let fetcher = Fetcher::new(Some(
        fast_config(0).with_breaker(breaker(3, 1, Duration::from_secs(60))),
    ));
    let url = backend.url("/llms.txt");

    for _ in 0..3 {
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::ServerOrClientError);
    }
    assert_eq!(fetcher.client().breaker().state(), CircuitState::Open);

    for _ in 0..5 {
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Transport);
        assert!(err.is_circuit_open());
    }
    // No network attempt while open
    assert_eq!(backend.hits(), 3);
}

#[tokio::test]
async fn test_breaker_stops_retry_loop() {
    let backend = start_fixed(500, "boom").await;
    let fetcher = Fetcher::new(Some(
        fast_config(5).with_breaker(breaker(2, 1, Duration::from_secs(60))),
    ));

    let url = backend.url("/llms.txt");

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
    assert_eq!(backend.hits(), 2);
    assert_eq!(fetcher.client().breaker().state(), CircuitState::Open);

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(err.is_circuit_open());
    assert_eq!(backend.hits(), 2);
}

#[tokio::test]
async fn test_default_config_reports_server_error() {
    let backend = start_fixed(500, "boom").await;
    let fetcher = Fetcher::new(Some(
        ClientConfig::default().with_retry_wait(Duration::from_millis(1), Duration::from_millis(5)),
    ));

    let err = fetcher.fetch(&backend.url("/llms.txt")).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::ServerOrClientError);
    assert_eq!(err.status(), Some(500));
    assert!(!err.is_circuit_open());
    assert_eq!(backend.hits(), 3);
}

#[tokio::test]
async fn test_transport_failures_then_open_stays_circuit_open() {
    let url = refused_url().await;
    let mut cfg = breaker(2, 1, Duration::from_secs(60));
    cfg.policy = FailurePolicy::ServerAndTransportErrors;
    let fetcher = Fetcher::new(Some(fast_config(5).with_breaker(cfg)));

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(err.is_circuit_open());
}

#[tokio::test]
async fn test_half_open_success_closes() {
    let backend = start_backend(|hit| {
        if hit.index == 1 {
            Reply::status(502)
        } else {
            Reply::ok("back")
        }
    })
    .await;
    let fetcher = Fetcher::new(Some(
        fast_config(0).with_breaker(breaker(1, 1, Duration::from_millis(100))),
    ));
    let url = backend.url("/llms.txt");

    assert!(fetcher.fetch(&url).await.is_err());
    assert!(fetcher.fetch(&url).await.unwrap_err().is_circuit_open());

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(fetcher.fetch(&url).await.unwrap(), "back");
    assert_eq!(fetcher.client().breaker().state(), CircuitState::Closed);
    assert_eq!(backend.hits(), 2);
}

#[tokio::test]
async fn test_half_open_failure_reopens() {
    let backend = start_fixed(500, "still down").await;
    let fetcher = Fetcher::new(Some(
        fast_config(0).with_breaker(breaker(1, 1, Duration::from_millis(100))),
    ));
    let url = backend.url("/llms.txt");

    assert!(fetcher.fetch(&url).await.is_err());
    tokio::time::sleep(Duration::from_millis(150)).await;

    // Trial request goes out and fails
    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::ServerOrClientError);
    assert_eq!(fetcher.client().breaker().state(), CircuitState::Open);

    assert!(fetcher.fetch(&url).await.unwrap_err().is_circuit_open());
    assert_eq!(backend.hits(), 2);
}

#[tokio::test]
async fn test_transport_failures_ignored_by_default_policy() {
    let url = refused_url().await;
    let fetcher = Fetcher::new(Some(
        fast_config(0).with_breaker(breaker(1, 1, Duration::from_secs(60))),
    ));

    for _ in 0..3 {
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(!err.is_circuit_open());
    }
    assert_eq!(fetcher.client().breaker().state(), CircuitState::Closed);
}

#[tokio::test]
async fn test_transport_failures_counted_when_configured() {
    let url = refused_url().await;
    let mut cfg = breaker(2, 1, Duration::from_secs(60));
    cfg.policy = FailurePolicy::ServerAndTransportErrors;
    let fetcher = Fetcher::new(Some(fast_config(0).with_breaker(cfg)));

    assert!(!fetcher.fetch(&url).await.unwrap_err().is_circuit_open());
    assert!(!fetcher.fetch(&url).await.unwrap_err().is_circuit_open());
    assert!(fetcher.fetch(&url).await.unwrap_err().is_circuit_open());
}

#[tokio::test]
async fn test_state_changes_are_observable() {
    let backend = start_fixed(503, "").await;
    let fetcher = Fetcher::new(Some(
        fast_config(0).with_breaker(breaker(1, 1, Duration::from_millis(50))),
    ));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    fetcher
        .client()
        .breaker()
        .on_state_change(move |from, to| sink.lock().unwrap().push((from, to)));

    let url = backend.url("/llms.txt");
    let _ = fetcher.fetch(&url).await;
    tokio::time::sleep(Duration::from_millis(80)).await;
    let _ = fetcher.fetch(&url).await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (CircuitState::Closed, CircuitState::Open),
            (CircuitState::Open, CircuitState::HalfOpen),
            (CircuitState::HalfOpen, CircuitState::Open),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_failures_open_once() {
    let backend = start_fixed(500, "").await;
    let fetcher = Fetcher::new(Some(
        fast_config(0).with_breaker(breaker(3, 1, Duration::from_secs(60))),
    ));
    let opened = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&opened);
    fetcher.client().breaker().on_state_change(move |_, to| {
        if to == CircuitState::Open {
            *sink.lock().unwrap() += 1;
        }
    });

    let url = backend.url("/llms.txt");
    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let fetcher = fetcher.clone();
            let url = url.clone();
            tokio::spawn(async move { fetcher.fetch(&url).await })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().is_err());
    }

    assert_eq!(*opened.lock().unwrap(), 1);
    assert_eq!(fetcher.client().breaker().state(), CircuitState::Open);
    assert!(backend.hits() >= 3);
}
