use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use paperflow_fetch::testing::MockTransport;
use paperflow_fetch::{BoundedBatchRunner, FetchJob, RetryPolicy, RetryingFetcher};
use tokio::time::Instant;

const PDF: &[u8] = b"%PDF-1.7 test body";

fn fetcher(transport: &Arc<MockTransport>) -> RetryingFetcher {
    RetryingFetcher::new(transport.clone(), RetryPolicy::new(3, 2.0))
}

fn job(id: &str, url: &str, dir: &Path) -> FetchJob {
    FetchJob {
        id: id.to_string(),
        url: Some(url.to_string()),
        dest: dir.join(format!("{id}.pdf")),
    }
}

#[tokio::test(start_paused = true)]
async fn persistent_failure_is_attempted_exactly_three_times_with_backoff() {
    let dir = tempfile::tempdir().unwrap();
    let url = "https://example.org/pdf/1";
    let transport = Arc::new(MockTransport::new().failing(url, 503));

    let start = Instant::now();
    let ok = fetcher(&transport)
        .fetch_to(url, &dir.path().join("1.pdf"))
        .await;
    let elapsed = start.elapsed();

    assert!(!ok);
    assert_eq!(transport.calls_for(url), 3);

    let at = transport.call_instants(url);
    assert_eq!(at[1] - at[0], Duration::from_secs(1));
    assert_eq!(at[2] - at[1], Duration::from_secs(2));
    // The last failure still waits its backoff before giving up.
    assert_eq!(elapsed, Duration::from_secs(7));
    assert!(!dir.path().join("1.pdf").exists());
}

#[tokio::test(start_paused = true)]
async fn transient_failure_recovers_on_a_later_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let url = "https://example.org/pdf/2";
    let transport = Arc::new(MockTransport::new().flaky(url, 2, PDF));
    let dest = dir.path().join("2.pdf");

    assert!(fetcher(&transport).fetch_to(url, &dest).await);
    assert_eq!(transport.calls_for(url), 3);
    assert_eq!(std::fs::read(&dest).unwrap(), PDF);
}

#[tokio::test]
async fn rerun_skips_everything_already_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(
        MockTransport::new()
            .on_url("https://example.org/a", b"aaa")
            .on_url("https://example.org/b", b"bbb"),
    );
    let fetcher = fetcher(&transport);
    let runner = BoundedBatchRunner::new(2);
    let jobs = vec![
        job("a", "https://example.org/a", dir.path()),
        job("b", "https://example.org/b", dir.path()),
    ];

    let first = runner
        .run(jobs.clone(), |j| {
            let fetcher = fetcher.clone();
            async move { fetcher.fetch_to(j.url.as_deref().unwrap_or_default(), &j.dest).await }
        })
        .await;
    assert_eq!(first.succeeded(), 2);
    assert_eq!(transport.total_calls(), 2);

    let second = runner
        .run(jobs, |j| {
            let fetcher = fetcher.clone();
            async move { fetcher.fetch_to(j.url.as_deref().unwrap_or_default(), &j.dest).await }
        })
        .await;
    assert_eq!(second, first);
    assert_eq!(transport.total_calls(), 2);
    assert_eq!(std::fs::read(dir.path().join("a.pdf")).unwrap(), b"aaa");
    assert_eq!(std::fs::read(dir.path().join("b.pdf")).unwrap(), b"bbb");
}

#[tokio::test(start_paused = true)]
async fn outcome_has_one_entry_per_item_and_failures_do_not_cancel_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(
        MockTransport::new()
            .on_url("https://example.org/ok1", PDF)
            .failing("https://example.org/bad", 404)
            .on_url("https://example.org/ok2", PDF),
    );
    let fetcher = fetcher(&transport);
    let jobs = vec![
        job("ok1", "https://example.org/ok1", dir.path()),
        job("bad", "https://example.org/bad", dir.path()),
        job("ok2", "https://example.org/ok2", dir.path()),
    ];

    let outcome = BoundedBatchRunner::new(2)
        .run(jobs, |j| {
            let fetcher = fetcher.clone();
            async move { fetcher.fetch_to(j.url.as_deref().unwrap_or_default(), &j.dest).await }
        })
        .await;

    assert_eq!(outcome.len(), 3);
    assert_eq!(outcome.get("ok1"), Some(true));
    assert_eq!(outcome.get("ok2"), Some(true));
    assert_eq!(outcome.get("bad"), Some(false));
    assert_eq!(outcome.failed_ids(), vec!["bad"]);
}

#[tokio::test(start_paused = true)]
async fn never_more_than_concurrency_requests_in_flight() {
    let dir = tempfile::tempdir().unwrap();
    let mut transport = MockTransport::new().with_latency(Duration::from_millis(200));
    let mut jobs = Vec::new();
    for i in 0..12 {
        let url = format!("https://example.org/{i}");
        transport = transport.on_url(&url, PDF);
        jobs.push(job(&i.to_string(), &url, dir.path()));
    }
    let transport = Arc::new(transport);
    let fetcher = fetcher(&transport);

    let outcome = BoundedBatchRunner::new(3)
        .run(jobs, |j| {
            let fetcher = fetcher.clone();
            async move { fetcher.fetch_to(j.url.as_deref().unwrap_or_default(), &j.dest).await }
        })
        .await;

    assert_eq!(outcome.succeeded(), 12);
    assert!(transport.peak_in_flight() <= 3);
}

#[tokio::test]
async fn duplicate_identifiers_are_fetched_once() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::new().on_url("https://example.org/x", PDF));
    let fetcher = fetcher(&transport);
    let jobs = vec![
        job("x", "https://example.org/x", dir.path()),
        job("x", "https://example.org/x", dir.path()),
    ];

    let outcome = BoundedBatchRunner::new(4)
        .run(jobs, |j| {
            let fetcher = fetcher.clone();
            async move { fetcher.fetch_to(j.url.as_deref().unwrap_or_default(), &j.dest).await }
        })
        .await;

    assert_eq!(outcome.len(), 1);
    assert_eq!(transport.calls_for("https://example.org/x"), 1);
}

#[tokio::test]
async fn progress_reaches_total() {
    let runner = BoundedBatchRunner::new(2);
    let rx = runner.subscribe();
    let items: Vec<FetchJob> = (0..5)
        .map(|i| FetchJob {
            id: i.to_string(),
            url: None,
            dest: Path::new("/nonexistent").join(i.to_string()),
        })
        .collect();

    let outcome = runner.run(items, |j| async move { j.id != "3" }).await;

    let progress = *rx.borrow();
    assert_eq!(progress.total, 5);
    assert_eq!(progress.resolved, 5);
    assert_eq!(progress.succeeded, 4);
    assert_eq!(outcome.failed_ids(), vec!["3"]);
}

#[tokio::test]
async fn empty_batch_yields_empty_outcome() {
    let outcome = BoundedBatchRunner::new(5)
        .run(Vec::<FetchJob>::new(), |_| async { true })
        .await;
    assert!(outcome.is_empty());
}
