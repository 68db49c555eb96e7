//! 端到端校验：真实HTTP栈跑在本地axum夹具服务器上

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    routing::get,
    Router,
};
use chaincheck::domain::models::chain::{ChainRecord, ChainRegistry, ExplorerEndpoint};
use chaincheck::domain::models::verdict::{EndpointKind, Severity};
use chaincheck::domain::services::endpoint_validator::{ContentRules, EndpointValidator};
use chaincheck::engines::fetcher::{FetcherConfig, ResilientFetcher};
use chaincheck::engines::http_probe::ReqwestProbe;
use chaincheck::queue::dispatcher::{Dispatcher, DispatcherConfig};
use chaincheck::report::render::{render_narrative, render_table, write_report};
use chaincheck::utils::retry_policy::RetryPolicy;
use chaincheck::workers::batch_runner::BatchRunner;
use chaincheck::workers::progress::NullProgress;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct ServerState {
    slow_hits: Arc<AtomicUsize>,
}

async fn start_test_server(state: ServerState) -> String {
    let app = Router::new()
        .route(
            "/site",
            get(|| async { Html("<html><body>Project landing page</body></html>") }),
        )
        .route(
            "/explorer",
            get(|| async { Html("<html><body>Latest Blocks / Latest Transactions</body></html>") }),
        )
        .route(
            "/plain",
            get(|| async { Html("<html><body>nothing of interest</body></html>") }),
        )
        .route(
            "/forbidden",
            get(|| async { StatusCode::FORBIDDEN.into_response() }),
        )
        .route(
            "/missing",
            get(|| async { StatusCode::NOT_FOUND.into_response() }),
        )
        .route(
            "/slow",
            get(|State(state): State<ServerState>| async move {
                state.slow_hits.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(5)).await;
                Html("<html><body>late</body></html>")
            }),
        )
        .route("/hop", get(|| async { Redirect::temporary("/explorer") }))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn build_runner(attempt_timeout: Duration, max_retries: u32) -> BatchRunner {
    let dispatcher = Arc::new(Dispatcher::new(DispatcherConfig {
        max_concurrency: 8,
        admission_interval: Duration::ZERO,
        admissions_per_interval: 0,
    }));
    let fetcher = ResilientFetcher::new(
        Arc::new(ReqwestProbe::new().unwrap()),
        dispatcher,
        FetcherConfig {
            attempt_timeout,
            policy: RetryPolicy {
                max_retries,
                initial_backoff: Duration::from_millis(1),
                enable_jitter: false,
                ..RetryPolicy::default()
            },
        },
    );
    let validator = Arc::new(EndpointValidator::new(fetcher, ContentRules::default()));
    BatchRunner::new(validator, Arc::new(NullProgress))
}

fn chain(name: &str, website: String, explorers: Vec<String>) -> ChainRecord {
    ChainRecord {
        name: name.to_string(),
        website,
        explorers: explorers
            .into_iter()
            .map(|url| ExplorerEndpoint {
                url,
                hosted_by: String::new(),
            })
            .collect(),
    }
}

#[tokio::test]
async fn test_clean_chain_produces_an_empty_report() {
    let server = start_test_server(ServerState::default()).await;
    let runner = build_runner(Duration::from_secs(2), 1);

    let mut registry = ChainRegistry::new();
    registry.insert(
        "1".to_string(),
        chain(
            "Alpha",
            format!("{}/site", server),
            vec![format!("{}/explorer", server)],
        ),
    );

    let report = runner.run(&registry).await;

    assert!(report.is_clean());
    assert_eq!(
        render_narrative(&report),
        "All 1 chains validated clean.\n"
    );
}

#[tokio::test]
async fn test_broken_endpoints_are_classified_and_sorted() {
    let server = start_test_server(ServerState::default()).await;
    let runner = build_runner(Duration::from_secs(2), 1);

    let mut registry = ChainRegistry::new();
    // 403 website: reachable but restricted => warning
    // 404 explorer: dead link => critical
    // generic-content explorer: loads but is no explorer => critical
    registry.insert(
        "1".to_string(),
        chain(
            "Alpha",
            format!("{}/forbidden", server),
            vec![format!("{}/missing", server), format!("{}/plain", server)],
        ),
    );

    let report = runner.run(&registry).await;

    assert_eq!(report.entries().len(), 3);
    let website = &report.entries()[0];
    assert_eq!(website.endpoint_kind, EndpointKind::Website);
    assert_eq!(website.severity, Severity::Warning);
    assert!(website.message.contains("403"));

    let explorers: Vec<Severity> = report.entries()[1..]
        .iter()
        .map(|e| e.severity)
        .collect();
    assert_eq!(explorers, vec![Severity::Critical, Severity::Critical]);

    let table = render_table(&report);
    assert!(table.starts_with("| ID | Name | Type | URL | Issue | Severity |\n"));
    assert!(table.contains("⚠ WARNING"));
    assert!(table.contains("✗ CRITICAL"));
}

#[tokio::test]
async fn test_timeouts_exhaust_the_retry_budget_then_report_critical() {
    let state = ServerState::default();
    let server = start_test_server(state.clone()).await;
    let runner = build_runner(Duration::from_millis(200), 1);

    let mut registry = ChainRegistry::new();
    registry.insert(
        "1".to_string(),
        chain(
            "Alpha",
            format!("{}/site", server),
            vec![format!("{}/slow", server)],
        ),
    );

    let report = runner.run(&registry).await;

    assert_eq!(report.entries().len(), 1);
    let row = &report.entries()[0];
    assert_eq!(row.chain_id, "1");
    assert_eq!(row.endpoint_kind, EndpointKind::Explorer);
    assert_eq!(row.severity, Severity::Critical);
    assert!(row.message.contains("unreachable"));

    // max_retries + 1 attempts, never more (the URL is plain HTTP, so no
    // HTTPS fallback pass doubles the count)
    assert_eq!(state.slow_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_same_host_redirect_is_followed_and_accepted() {
    let server = start_test_server(ServerState::default()).await;
    let runner = build_runner(Duration::from_secs(2), 1);

    let mut registry = ChainRegistry::new();
    registry.insert(
        "1".to_string(),
        chain(
            "Alpha",
            format!("{}/site", server),
            // Redirects within the same host land on real explorer content
            vec![format!("{}/hop", server)],
        ),
    );

    let report = runner.run(&registry).await;

    assert!(report.is_clean());
}

#[tokio::test]
async fn test_report_file_round_trip() {
    let server = start_test_server(ServerState::default()).await;
    let runner = build_runner(Duration::from_secs(2), 1);

    let mut registry = ChainRegistry::new();
    registry.insert(
        "7".to_string(),
        chain("Gated", format!("{}/forbidden", server), vec![]),
    );

    let report = runner.run(&registry).await;
    let rendered = render_narrative(&report);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.md");
    write_report(&path, &rendered).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("**Gated (7)**"));
    assert!(written.contains("- Website: URL exists but access is restricted"));
}
