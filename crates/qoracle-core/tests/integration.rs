//! Integration tests for qoracle-core.
//!
//! These tests drive the real HTTP backends against a wiremock server, then
//! run the full pipeline:
//! settings → provider chain → sampler → casting → hexagram names.
//!
//! The backends use a blocking client, so every call into the crate runs on
//! tokio's blocking pool while the mock server keeps serving.

use std::net::TcpListener;
use std::time::Duration;

use qoracle_core::{
    AnuSource, EntropySource, FallbackProvider, LfdrSource, QrngError, Settings, SourceTag, cast,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Run blocking client code off the async runtime.
async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

/// URL of a port nobody listens on.
fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

fn settings(lfdr_url: &str, anu_url: &str) -> Settings {
    Settings {
        lfdr_url: lfdr_url.to_string(),
        anu_url: anu_url.to_string(),
        anu_key: Some("secret".to_string()),
        timeout: Duration::from_secs(5),
        allow_fallback: false,
    }
}

// ---------------------------------------------------------------------------
// Backends over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lfdr_fetch_decodes_hex() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lfdr"))
        .and(query_param("length", "2"))
        .and(query_param("format", "HEX"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"qrn": "2d05", "length": 2})))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = settings(&format!("{}/lfdr", server.uri()), &refused_url());
    let data = blocking(move || LfdrSource::new(&cfg).and_then(|s| s.fetch(2))).await;
    assert_eq!(data.unwrap(), vec![0x2D, 0x05]);
}

#[tokio::test]
async fn anu_fetch_sends_key_and_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/anu"))
        .and(query_param("length", "3"))
        .and(query_param("type", "uint8"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "uint8",
            "length": 3,
            "data": [1, 2, 300],
            "success": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = settings(&refused_url(), &format!("{}/anu", server.uri()));
    let data = blocking(move || AnuSource::new(&cfg).and_then(|s| s.fetch(3))).await;
    assert_eq!(data.unwrap(), vec![1, 2, 44]);
}

#[tokio::test]
async fn error_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "busy"})))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = settings(&server.uri(), &server.uri());
    let err = blocking(move || LfdrSource::new(&cfg).and_then(|s| s.fetch(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, QrngError::Transport { backend: SourceTag::Lfdr, .. }), "{err:?}");
}

#[tokio::test]
async fn invalid_json_is_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let cfg = settings(&server.uri(), &server.uri());
    let err = blocking(move || AnuSource::new(&cfg).and_then(|s| s.fetch(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, QrngError::Format { backend: SourceTag::Anu, .. }), "{err:?}");
    assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn slow_backend_times_out_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"qrn": "00"}))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let cfg = settings(&server.uri(), &server.uri()).with_timeout(Duration::from_millis(200));
    let err = blocking(move || LfdrSource::new(&cfg).and_then(|s| s.fetch(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, QrngError::Transport { .. }), "{err:?}");
}

#[test]
fn unreachable_backend_is_transport_error() {
    let source = LfdrSource::new(&settings(&refused_url(), &refused_url())).unwrap();
    assert!(matches!(
        source.fetch(4),
        Err(QrngError::Transport { backend: SourceTag::Lfdr, .. })
    ));
}

// ---------------------------------------------------------------------------
// Full chain
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cast_falls_back_from_lfdr_to_anu() {
    let server = MockServer::start().await;
    for byte in [45, 5] {
        Mock::given(method("GET"))
            .and(query_param("length", "1"))
            .and(header("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [byte]})))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
    }

    let cfg = settings(&refused_url(), &server.uri());
    let (result, history, report) = blocking(move || {
        let provider = FallbackProvider::from_settings(&cfg).unwrap();
        let result = cast(&provider);
        (result, provider.history(), provider.health_report())
    })
    .await;

    let result = result.unwrap();
    assert_eq!(result.base().bits(), [1, 0, 1, 1, 0, 1]);
    assert_eq!(result.moving_line(), 6);
    assert_eq!(result.changed().bits(), [1, 0, 1, 1, 0, 0]);
    assert_eq!(result.base().display_name(), "离（上离下离）");
    assert_eq!(result.changed().display_name(), "丰（上震下离）");

    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|d| d.source_tag == SourceTag::Anu));
    assert_eq!(history[0].payload, vec![0x2D]);
    assert_eq!(history[1].payload, vec![0x05]);

    assert_eq!(report.sources[0].failures, 2);
    assert_eq!(report.sources[1].successes, 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[test]
fn exhausted_chain_reports_every_backend_in_order() {
    let mut cfg = settings(&refused_url(), &refused_url());
    cfg.anu_key = None;
    let provider = FallbackProvider::from_settings(&cfg).unwrap();

    let err = cast(&provider).unwrap_err();
    let QrngError::Aggregate { failures } = &err else {
        panic!("expected aggregate, got {err:?}");
    };
    assert!(matches!(failures[0], QrngError::Transport { backend: SourceTag::Lfdr, .. }));
    assert!(matches!(failures[1], QrngError::Config { backend: SourceTag::Anu, .. }));

    let message = err.to_string();
    assert!(message.starts_with("All QRNG backends failed: LFDR: "), "{message}");
    assert!(message.ends_with(" | ANU: ANU API key not configured"), "{message}");
    assert!(provider.history().is_empty());
}

#[test]
fn exhausted_chain_with_fallback_casts_locally() {
    let cfg = settings(&refused_url(), &refused_url()).with_fallback(true);
    let provider = FallbackProvider::from_settings(&cfg).unwrap();

    let result = cast(&provider).unwrap();
    assert!((1..=6).contains(&result.moving_line()));

    let history = provider.history();
    assert!(history.len() >= 2);
    assert!(history.iter().all(|d| d.source_tag == SourceTag::Classic));
    assert_eq!(history[0].payload.len(), 1);
}

// ---------------------------------------------------------------------------
// Live services
// ---------------------------------------------------------------------------

#[test]
#[ignore] // Run with: cargo test -- --ignored
fn lfdr_live() {
    let source = LfdrSource::new(&Settings::default()).unwrap();
    match source.fetch(2) {
        Ok(data) => assert_eq!(data.len(), 2),
        Err(e) => eprintln!("LFDR unavailable: {e}"),
    }
}

#[test]
#[ignore] // Run with: ANU_API_KEY=... cargo test -- --ignored
fn anu_live() {
    let Ok(key) = std::env::var("ANU_API_KEY") else {
        eprintln!("ANU_API_KEY not set");
        return;
    };
    let source = AnuSource::new(&Settings::default().with_anu_key(key)).unwrap();
    match source.fetch(2) {
        Ok(data) => assert_eq!(data.len(), 2),
        Err(e) => eprintln!("ANU unavailable: {e}"),
    }
}
