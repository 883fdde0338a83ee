//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small site and run the full crawl cycle
//! end-to-end. Page mocks carry `expect(..)` counts, so the mock server
//! verifies on drop that every page was fetched exactly as often as intended.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use web_spider::config::Config;
use web_spider::crawler::{crawl, Coordinator};
use web_spider::output::{parse_report, Reporter};
use web_spider::{PageState, SpiderError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const INDEX: &str = include_str!("../fixtures/TestFiles/index.html");
const PRODUCTS: &str = include_str!("../fixtures/TestFiles/products.html");
const ABOUT: &str = include_str!("../fixtures/TestFiles/about.html");
const CONTACT: &str = include_str!("../fixtures/TestFiles/contact.html");

const PAGES: [&str; 4] = ["index.html", "products.html", "about.html", "contact.html"];

/// Creates a test configuration with short timeouts
fn create_test_config(workers: u32) -> Config {
    let mut config = Config::default();
    config.crawler.workers = workers;
    config.crawler.frontier_timeout_ms = 100;
    config.crawler.fetch_timeout_secs = 5;
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
}

/// Mounts a page that must be fetched exactly `times` times
async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts the four-page fixture site, each page fetched once
async fn mount_test_site(server: &MockServer) {
    mount_page(server, "/TestFiles/index.html", html(INDEX), 1).await;
    mount_page(server, "/TestFiles/products.html", html(PRODUCTS), 1).await;
    mount_page(server, "/TestFiles/about.html", html(ABOUT), 1).await;
    mount_page(server, "/TestFiles/contact.html", html(CONTACT), 1).await;
}

fn page_url(server: &MockServer, page: &str) -> String {
    format!("{}/TestFiles/{}", server.uri(), page)
}

fn quiet_reporter() -> Reporter {
    Reporter::new(std::io::sink())
}

#[tokio::test]
async fn test_full_crawl_of_test_site() {
    let server = MockServer::start().await;
    mount_test_site(&server).await;

    let seed = page_url(&server, "index.html");
    let summary = crawl(create_test_config(4), quiet_reporter(), &seed)
        .await
        .expect("Crawl failed");

    // One record per page
    assert_eq!(summary.records.len(), 4);
    let crawled: HashSet<String> = summary.records.iter().map(|r| r.url.clone()).collect();
    let expected: HashSet<String> = PAGES.iter().map(|p| page_url(&server, p)).collect();
    assert_eq!(crawled, expected);

    // Every page links to the same four pages, duplicates collapsed
    let expected_links: Vec<String> = PAGES.iter().map(|p| page_url(&server, p)).collect();
    for record in &summary.records {
        assert_eq!(record.links, expected_links, "links of {}", record.url);
    }

    // Seed plus 4 links pushed by each of the 4 pages: 17 pops, 4 claims
    let stats = &summary.statistics;
    assert_eq!(stats.count(PageState::Processed), 4);
    assert_eq!(stats.count(PageState::Skipped), 13);
    assert_eq!(stats.urls_claimed(), 4);
    assert_eq!(stats.records_reported, 4);
    assert_eq!(stats.links_found, 16);
    assert_eq!(stats.errors(), 0);
}

#[tokio::test]
async fn test_no_lost_work_for_any_worker_count() {
    for workers in [1, 2, 3, 8, 32] {
        let server = MockServer::start().await;
        mount_test_site(&server).await;

        let seed = page_url(&server, "index.html");
        let summary = crawl(create_test_config(workers), quiet_reporter(), &seed)
            .await
            .expect("Crawl failed");

        assert_eq!(
            summary.records.len(),
            4,
            "expected 4 records with {} workers",
            workers
        );
        assert_eq!(summary.statistics.urls_claimed(), 4);

        // Mock expectations are verified here
        server.verify().await;
    }
}

#[tokio::test]
async fn test_report_file_has_one_block_per_page() {
    let server = MockServer::start().await;
    mount_test_site(&server).await;

    let log = NamedTempFile::new().unwrap();
    let reporter = Reporter::to_file(log.path()).unwrap();

    let seed = page_url(&server, "index.html");
    crawl(create_test_config(4), reporter, &seed)
        .await
        .expect("Crawl failed");

    let content = std::fs::read_to_string(log.path()).unwrap();
    let records = parse_report(&content);

    assert_eq!(records.len(), 4);

    let by_url: HashMap<String, Vec<String>> =
        records.into_iter().map(|r| (r.url, r.links)).collect();
    assert_eq!(by_url.len(), 4, "a page was reported twice");

    let index_links = &by_url[&page_url(&server, "index.html")];
    assert_eq!(
        index_links,
        &PAGES
            .iter()
            .map(|p| page_url(&server, p))
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_fetch_failure_does_not_stop_siblings() {
    let server = MockServer::start().await;

    let root = r#"<html><body>
        <a href="http://127.0.0.1:1/down">Down</a>
        <a href="/sibling-a">A</a>
        <a href="/sibling-b">B</a>
    </body></html>"#;
    mount_page(&server, "/", html(root), 1).await;
    mount_page(&server, "/sibling-a", html("<p>a</p>"), 1).await;
    mount_page(&server, "/sibling-b", html(r#"<a href="/">home</a>"#), 1).await;

    let summary = crawl(create_test_config(2), quiet_reporter(), &format!("{}/", server.uri()))
        .await
        .expect("Crawl failed");

    assert_eq!(summary.records.len(), 3);
    assert_eq!(summary.statistics.count(PageState::Unreachable), 1);
    assert!(summary
        .records
        .iter()
        .all(|r| r.url != "http://127.0.0.1:1/down"));
}

#[tokio::test]
async fn test_non_success_status_is_claimed_but_not_crawled() {
    let server = MockServer::start().await;

    let root = r#"<a href="/missing">gone</a><a href="/broken">broken</a><a href="/next">next</a>"#;
    let next = r#"<a href="/missing">gone again</a><a href="/broken">broken again</a>"#;
    mount_page(&server, "/", html(root), 1).await;
    mount_page(&server, "/next", html(next), 1).await;
    mount_page(&server, "/missing", ResponseTemplate::new(404), 1).await;
    mount_page(&server, "/broken", ResponseTemplate::new(500), 1).await;

    let seed = format!("{}/", server.uri());
    let coordinator = Coordinator::new(create_test_config(3), quiet_reporter()).unwrap();
    let summary = coordinator.run(&seed).await.expect("Crawl failed");

    let stats = &summary.statistics;
    assert_eq!(stats.count(PageState::Processed), 2);
    assert_eq!(stats.count(PageState::DeadLink), 1);
    assert_eq!(stats.count(PageState::HttpError), 1);
    assert_eq!(summary.records.len(), 2);

    // Failed pages stay claimed for the rest of the run
    assert!(summary.has_visited(&format!("{}/missing", server.uri())));
    assert!(summary.has_visited(&format!("{}/broken", server.uri())));
}

#[tokio::test]
async fn test_invalid_links_are_not_followed_or_reported() {
    let server = MockServer::start().await;

    let root = r#"
        <a href="javascript:void(0)">js</a>
        <a href="mailto:someone@example.com">mail</a>
        <a href="ftp://files.example.com/pub">ftp</a>
        <a href="/only">only</a>
    "#;
    mount_page(&server, "/", html(root), 1).await;
    mount_page(&server, "/only", html("<p>end</p>"), 1).await;

    let seed = format!("{}/", server.uri());
    let summary = crawl(create_test_config(2), quiet_reporter(), &seed)
        .await
        .expect("Crawl failed");

    let root_record = summary
        .records
        .iter()
        .find(|r| r.url == seed)
        .expect("seed was not reported");
    assert_eq!(root_record.links, vec![format!("{}/only", server.uri())]);
    assert_eq!(summary.records.len(), 2);
}

#[tokio::test]
async fn test_non_html_page_yields_empty_record() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html(r#"<a href="/doc.txt">doc</a>"#), 1).await;
    mount_page(
        &server,
        "/doc.txt",
        ResponseTemplate::new(200).set_body_raw(r#"<a href="/hidden">x</a>"#, "text/plain"),
        1,
    )
    .await;
    mount_page(&server, "/hidden", html("<p>never</p>"), 0).await;

    let seed = format!("{}/", server.uri());
    let summary = crawl(create_test_config(2), quiet_reporter(), &seed)
        .await
        .expect("Crawl failed");

    let doc = summary
        .records
        .iter()
        .find(|r| r.url.ends_with("/doc.txt"))
        .expect("non-HTML page was not reported");
    assert!(doc.links.is_empty());
    assert_eq!(summary.records.len(), 2);
}

#[tokio::test]
async fn test_max_depth_limits_crawl() {
    let server = MockServer::start().await;

    mount_page(&server, "/TestFiles/index.html", html(INDEX), 1).await;
    mount_page(&server, "/TestFiles/products.html", html(PRODUCTS), 0).await;
    mount_page(&server, "/TestFiles/about.html", html(ABOUT), 0).await;
    mount_page(&server, "/TestFiles/contact.html", html(CONTACT), 0).await;

    let mut config = create_test_config(2);
    config.crawler.max_depth = Some(0);

    let seed = page_url(&server, "index.html");
    let summary = crawl(config, quiet_reporter(), &seed)
        .await
        .expect("Crawl failed");

    assert_eq!(summary.records.len(), 1);
    assert_eq!(summary.records[0].url, seed);
    assert_eq!(summary.statistics.count(PageState::DepthExceeded), 4);
}

#[tokio::test]
async fn test_invalid_seed_is_fatal() {
    let result = crawl(create_test_config(2), quiet_reporter(), "ftp://example.com/").await;
    assert!(matches!(result, Err(SpiderError::InvalidSeed { .. })));
}

#[tokio::test]
async fn test_independent_runs_do_not_share_state() {
    let server = MockServer::start().await;

    // Two separate runs fetch every page once each
    mount_page(&server, "/TestFiles/index.html", html(INDEX), 2).await;
    mount_page(&server, "/TestFiles/products.html", html(PRODUCTS), 2).await;
    mount_page(&server, "/TestFiles/about.html", html(ABOUT), 2).await;
    mount_page(&server, "/TestFiles/contact.html", html(CONTACT), 2).await;

    let seed = page_url(&server, "index.html");
    let (first, second) = tokio::join!(
        crawl(create_test_config(2), quiet_reporter(), &seed),
        crawl(create_test_config(3), quiet_reporter(), &seed),
    );

    assert_eq!(first.expect("first crawl failed").records.len(), 4);
    assert_eq!(second.expect("second crawl failed").records.len(), 4);
}

/// Serves a hub page linking to `links` leaf pages, delaying every response
///
/// The arrival time of each request is recorded. A response is sent no earlier
/// than `delay` after its arrival, so two requests whose windows
/// `[arrival, arrival + delay)` overlap were in flight at the same time.
struct SlowSite {
    links: usize,
    delay: Duration,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl Respond for SlowSite {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());

        let body = if request.url.path() == "/" {
            (0..self.links)
                .map(|i| format!(r#"<a href="/page/{i}">{i}</a>"#))
                .collect::<String>()
        } else {
            String::new()
        };

        html(&body).set_delay(self.delay)
    }
}

/// Largest number of requests whose delay windows overlap
fn peak_in_flight(arrivals: &[Instant], delay: Duration) -> usize {
    arrivals
        .iter()
        .map(|&at| {
            arrivals
                .iter()
                .filter(|&&other| other <= at && at < other + delay)
                .count()
        })
        .max()
        .unwrap_or(0)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_worker_count_bounds_requests_in_flight() {
    let server = MockServer::start().await;
    let arrivals = Arc::new(Mutex::new(Vec::new()));
    let delay = Duration::from_millis(100);

    Mock::given(method("GET"))
        .respond_with(SlowSite {
            links: 40,
            delay,
            arrivals: Arc::clone(&arrivals),
        })
        .mount(&server)
        .await;

    let summary = crawl(
        create_test_config(3),
        quiet_reporter(),
        &format!("{}/", server.uri()),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(summary.records.len(), 41);

    let arrivals = arrivals.lock().unwrap();
    assert_eq!(arrivals.len(), 41, "every page fetched exactly once");

    let peak = peak_in_flight(&arrivals, delay);
    assert!(peak <= 3, "{peak} requests in flight with 3 workers");
    assert!(peak > 1, "workers never fetched in parallel");
}

#[tokio::test]
async fn test_single_worker_fetches_one_page_at_a_time() {
    let server = MockServer::start().await;
    let arrivals = Arc::new(Mutex::new(Vec::new()));
    let delay = Duration::from_millis(20);

    Mock::given(method("GET"))
        .respond_with(SlowSite {
            links: 5,
            delay,
            arrivals: Arc::clone(&arrivals),
        })
        .mount(&server)
        .await;

    let summary = crawl(
        create_test_config(1),
        quiet_reporter(),
        &format!("{}/", server.uri()),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(summary.records.len(), 6);
    assert_eq!(peak_in_flight(&arrivals.lock().unwrap(), delay), 1);
}
