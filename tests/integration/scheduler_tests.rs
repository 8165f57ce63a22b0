//! Batched crawl runs against a scripted directory session

use super::create_test_config;
use async_trait::async_trait;
use district_scout::browser::{BrowserError, SearchSession};
use district_scout::config::CrawlerConfig;
use district_scout::crawler::{run_crawl, BatchScheduler, Target, TargetSet};
use district_scout::storage::{AppendLog, ResultStore};
use district_scout::{ScoutError, TargetState};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::Instant;

/// Directory result page carrying a website link for `id`
fn result_page(id: &str) -> String {
    format!(
        "<tr><td><a href=\"transfer.asp?location=www.d{}.k12.ca.us\" target=\"_blank\">http://www.d{}.k12.ca.us</a></td></tr>",
        id, id
    )
}

fn expected_link(id: &str) -> String {
    format!("https://www.d{}.k12.ca.us", id)
}

fn timeout_error() -> BrowserError {
    BrowserError::Timeout {
        action: "submitting the search".to_string(),
        secs: 30,
    }
}

/// Shared view of what the scripted session was asked to do
#[derive(Clone, Default)]
struct SessionLog {
    queries: Arc<Mutex<Vec<(String, Instant)>>>,
    closed: Arc<Mutex<bool>>,
}

impl SessionLog {
    fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|(query, _)| query.clone())
            .collect()
    }

    fn times(&self) -> Vec<Instant> {
        self.queries.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }

    fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap()
    }
}

/// Search session replaying scripted responses per query
///
/// Queries without a script return one page linking to the target's website.
#[derive(Default)]
struct ScriptedSession {
    scripts: HashMap<String, VecDeque<Result<Vec<String>, BrowserError>>>,
    log: SessionLog,
}

impl ScriptedSession {
    fn respond(mut self, query: &str, response: Result<Vec<String>, BrowserError>) -> Self {
        self.scripts
            .entry(query.to_string())
            .or_default()
            .push_back(response);
        self
    }

    fn log(&self) -> SessionLog {
        self.log.clone()
    }
}

#[async_trait]
impl SearchSession for ScriptedSession {
    async fn search(&mut self, query: &str) -> Result<Vec<String>, BrowserError> {
        self.log
            .queries
            .lock()
            .unwrap()
            .push((query.to_string(), Instant::now()));

        match self.scripts.get_mut(query).and_then(VecDeque::pop_front) {
            Some(response) => response,
            None => Ok(vec![result_page(query)]),
        }
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        *self.log.closed.lock().unwrap() = true;
        Ok(())
    }
}

fn targets(ids: &[&str]) -> TargetSet {
    ids.iter().map(|id| Target::from(*id)).collect()
}

fn numbered_targets(count: usize) -> TargetSet {
    (1..=count).map(|n| Target::new(format!("06{:05}", n))).collect()
}

fn crawler_config(batch_size: usize) -> CrawlerConfig {
    CrawlerConfig {
        batch_size,
        ..CrawlerConfig::default()
    }
}

fn read_log(path: &std::path::Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

#[tokio::test(start_paused = true)]
async fn test_targets_searched_once_in_sorted_order() {
    let dir = TempDir::new().unwrap();
    let store = AppendLog::new(dir.path().join("links.txt"));
    let session = ScriptedSession::default();
    let log = session.log();

    let summary = BatchScheduler::new(crawler_config(5), session, store)
        .run(targets(&["0603", "0601", "0602", "0601"]))
        .await
        .expect("Crawl failed");

    assert_eq!(log.queries(), vec!["0601", "0602", "0603"]);
    assert!(log.is_closed());
    assert_eq!(summary.batches_total, 1);
    assert_eq!(summary.count(TargetState::Linked), 3);
}

#[tokio::test(start_paused = true)]
async fn test_pacing_delays() {
    let dir = TempDir::new().unwrap();
    let store = AppendLog::new(dir.path().join("links.txt"));
    let session = ScriptedSession::default();
    let log = session.log();

    let started = Instant::now();
    let summary = BatchScheduler::new(crawler_config(5), session, store)
        .run(numbered_targets(7))
        .await
        .expect("Crawl failed");

    // 7 request delays plus one pause between the two batches
    assert_eq!(started.elapsed(), Duration::from_secs(7 * 4 + 30));
    assert_eq!(summary.batches_total, 2);
    assert_eq!(summary.batches_completed, 2);

    let offsets: Vec<u64> = log
        .times()
        .iter()
        .map(|at| at.duration_since(started).as_secs())
        .collect();
    assert_eq!(offsets, vec![4, 8, 12, 16, 20, 54, 58]);
}

#[tokio::test(start_paused = true)]
async fn test_each_target_written_once_across_batches() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("outputs").join("links.txt");
    let store = AppendLog::new(&path);

    let summary = BatchScheduler::new(crawler_config(5), ScriptedSession::default(), store)
        .run(numbered_targets(12))
        .await
        .expect("Crawl failed");

    let content = read_log(&path);
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 12);
    for n in 1..=12 {
        let id = format!("06{:05}", n);
        assert_eq!(lines[n - 1], format!("{},{}", id, expected_link(&id)));
    }
    assert_eq!(summary.batches_total, 3);
    assert_eq!(summary.lines_written, 12);
    assert_eq!(summary.links_recorded, 12);
}

#[tokio::test(start_paused = true)]
async fn test_later_page_overwrites_earlier_link() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("links.txt");
    let session = ScriptedSession::default().respond(
        "0601",
        Ok(vec![
            result_page("first"),
            "<p>No website listed</p>".to_string(),
            result_page("second"),
        ]),
    );

    BatchScheduler::new(crawler_config(5), session, AppendLog::new(&path))
        .run(targets(&["0601"]))
        .await
        .expect("Crawl failed");

    assert_eq!(read_log(&path), format!("0601,{}\n", expected_link("second")));
}

#[tokio::test(start_paused = true)]
async fn test_target_without_link_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("links.txt");
    let session = ScriptedSession::default()
        .respond("0601", Ok(vec![]))
        .respond("0602", Ok(vec!["<p>No website listed</p>".to_string()]));

    let summary = BatchScheduler::new(crawler_config(5), session, AppendLog::new(&path))
        .run(targets(&["0601", "0602", "0603"]))
        .await
        .expect("Crawl failed");

    assert_eq!(read_log(&path), format!("0603,{}\n", expected_link("0603")));
    assert_eq!(summary.count(TargetState::NoLink), 2);
    assert_eq!(summary.count(TargetState::Linked), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unstorable_target_does_not_block_its_batch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("links.txt");
    let session = ScriptedSession::default();

    let summary = BatchScheduler::new(crawler_config(5), session, AppendLog::new(&path))
        .run(targets(&["0601", "06,02", "0603"]))
        .await
        .expect("Crawl failed");

    assert_eq!(
        read_log(&path),
        format!(
            "0601,{}\n0603,{}\n",
            expected_link("0601"),
            expected_link("0603")
        )
    );
    assert_eq!(summary.lines_written, 2);
    assert_eq!(summary.count(TargetState::Linked), 2);
    assert_eq!(summary.count(TargetState::NoLink), 1);
}

#[tokio::test(start_paused = true)]
async fn test_link_with_line_break_is_dropped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("links.txt");
    let broken = "<a href=\"transfer.asp?location=www.bad\r.org\" target=\"_blank\">http://www.bad.org</a>";
    let session = ScriptedSession::default()
        .respond("0601", Ok(vec![broken.to_string(), result_page("0601")]))
        .respond("0602", Ok(vec![broken.to_string()]));

    let summary = BatchScheduler::new(crawler_config(5), session, AppendLog::new(&path))
        .run(targets(&["0601", "0602", "0603"]))
        .await
        .expect("Crawl failed");

    assert_eq!(
        read_log(&path),
        format!(
            "0601,{}\n0603,{}\n",
            expected_link("0601"),
            expected_link("0603")
        )
    );
    assert_eq!(summary.count(TargetState::NoLink), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_retried_with_backoff() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("links.txt");
    let session = ScriptedSession::default()
        .respond("0601", Err(timeout_error()))
        .respond("0601", Err(timeout_error()));
    let log = session.log();

    let started = Instant::now();
    let summary = BatchScheduler::new(crawler_config(5), session, AppendLog::new(&path))
        .run(targets(&["0601"]))
        .await
        .expect("Crawl failed");

    // Request delay, then 5s and 10s of backoff
    assert_eq!(started.elapsed(), Duration::from_secs(4 + 5 + 10));
    assert_eq!(log.queries().len(), 3);
    assert_eq!(summary.count(TargetState::Linked), 1);
    assert_eq!(read_log(&path), format!("0601,{}\n", expected_link("0601")));
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_skip_and_continue() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("links.txt");
    let session = ScriptedSession::default()
        .respond("0602", Err(timeout_error()))
        .respond("0602", Err(timeout_error()))
        .respond("0602", Err(timeout_error()));
    let log = session.log();

    let summary = BatchScheduler::new(crawler_config(5), session, AppendLog::new(&path))
        .run(targets(&["0601", "0602", "0603"]))
        .await
        .expect("Crawl failed");

    assert_eq!(
        log.queries(),
        vec!["0601", "0602", "0602", "0602", "0603"]
    );
    assert_eq!(summary.count(TargetState::Skipped), 1);
    assert_eq!(
        read_log(&path),
        format!(
            "0601,{}\n0603,{}\n",
            expected_link("0601"),
            expected_link("0603")
        )
    );
}

#[tokio::test(start_paused = true)]
async fn test_permanent_failure_is_not_retried() {
    let dir = TempDir::new().unwrap();
    let session = ScriptedSession::default()
        .respond("0601", Err(BrowserError::InvalidSelector("table[".to_string())));
    let log = session.log();

    let summary = BatchScheduler::new(
        crawler_config(5),
        session,
        AppendLog::new(dir.path().join("links.txt")),
    )
    .run(targets(&["0601"]))
    .await
    .expect("Crawl failed");

    assert_eq!(log.queries().len(), 1);
    assert_eq!(summary.count(TargetState::Skipped), 1);
}

#[tokio::test(start_paused = true)]
async fn test_fatal_failure_keeps_only_completed_batches() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("links.txt");
    let config = CrawlerConfig {
        batch_size: 2,
        max_retries: 0,
        skip_failed_targets: false,
        ..CrawlerConfig::default()
    };
    let session = ScriptedSession::default().respond("0604", Err(timeout_error()));
    let log = session.log();

    let result = BatchScheduler::new(config, session, AppendLog::new(&path))
        .run(targets(&["0601", "0602", "0603", "0604"]))
        .await;

    match result {
        Err(ScoutError::Automation { target, .. }) => assert_eq!(target, "0604"),
        other => panic!("Expected automation failure, got {:?}", other.map(|_| ())),
    }
    assert!(log.is_closed());
    assert_eq!(
        read_log(&path),
        format!(
            "0601,{}\n0602,{}\n",
            expected_link("0601"),
            expected_link("0602")
        )
    );
}

#[tokio::test(start_paused = true)]
async fn test_zero_batch_size_is_rejected() {
    let dir = TempDir::new().unwrap();
    let session = ScriptedSession::default();
    let log = session.log();

    let result = BatchScheduler::new(
        crawler_config(0),
        session,
        AppendLog::new(dir.path().join("links.txt")),
    )
    .run(targets(&["0601"]))
    .await;

    assert!(matches!(result, Err(ScoutError::Config(_))));
    assert!(log.queries().is_empty());
    assert!(log.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_second_run_appends_after_first() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("links.txt");

    BatchScheduler::new(crawler_config(5), ScriptedSession::default(), AppendLog::new(&path))
        .run(targets(&["0601", "0602"]))
        .await
        .expect("First run failed");

    let mut remaining = targets(&["0601", "0602", "0603"]);
    let recorded = AppendLog::new(&path).recorded_targets().unwrap();
    assert_eq!(remaining.remove_all(&recorded), 2);

    let session = ScriptedSession::default();
    let log = session.log();
    BatchScheduler::new(crawler_config(5), session, AppendLog::new(&path))
        .with_resumed(2)
        .run(remaining)
        .await
        .expect("Second run failed");

    assert_eq!(log.queries(), vec!["0603"]);
    assert_eq!(read_log(&path).lines().count(), 3);
}

#[tokio::test]
async fn test_run_crawl_with_everything_recorded_skips_browser() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let path = std::path::Path::new(&config.output.results_path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "0601,https://a.edu\n0602,https://b.edu\n").unwrap();

    let summary = run_crawl(&config, targets(&["0601", "0602"]), false)
        .await
        .expect("Resume failed");

    assert_eq!(summary.resumed_skipped, 2);
    assert_eq!(summary.batches_total, 0);
    assert_eq!(read_log(path), "0601,https://a.edu\n0602,https://b.edu\n");
}
