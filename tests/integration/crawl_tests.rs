//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_ripple::config::{Config, CrawlerConfig, HttpConfig};
use site_ripple::crawler::{crawl, Coordinator};
use site_ripple::output::{format_markdown_summary, write_markdown_summary, CrawlReport};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the given seed
fn create_test_config(seed_url: &str, workers: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed_url.to_string(),
            workers,
            frontier_capacity: 16,
            track_out_of_scope: false,
        },
        http: HttpConfig {
            timeout_secs: 5,
            user_agent: "TestBot/1.0".to_string(),
        },
    }
}

/// Mounts an HTML page at `page_path`
async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn sorted_urls(report: &CrawlReport) -> Vec<String> {
    report.sorted_urls().into_iter().map(String::from).collect()
}

#[tokio::test]
async fn test_three_link_site_any_worker_count() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Index links to three leaf pages, one of them absolute
    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="{}/page3">Page 3</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;
    for page in ["/page1", "/page2", "/page3"] {
        mount_page(
            &mock_server,
            page,
            "<html><body>Leaf content</body></html>".to_string(),
        )
        .await;
    }

    let expected = vec![
        format!("{}/", base_url),
        format!("{}/page1", base_url),
        format!("{}/page2", base_url),
        format!("{}/page3", base_url),
    ];

    for workers in [1, 2, 3, 4, 10] {
        let config = create_test_config(&format!("{}/", base_url), workers);
        let report = crawl(config).await.expect("Crawl failed");

        assert_eq!(sorted_urls(&report), expected, "workers = {}", workers);
        assert_eq!(report.workers, workers);
        assert!(report.failed.is_empty());
        assert!(!report.cancelled);
    }
}

#[tokio::test]
async fn test_duplicate_links_are_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="/about">About</a>
            <a href="/about">About again</a>
            <a href="{}/about">About, absolute</a>
            <a href="/contact">Contact</a>"#,
            base_url
        ),
    )
    .await;

    // Both pages link back home and to each other
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/">Home</a><a href="/contact">Contact</a>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/">Home</a><a href="/about">About</a>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", base_url), 4);
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.total(), 3);
    assert_eq!(report.admitted, 3);
    assert_eq!(report.duplicates, 6);

    // Wiremock verifies the fetch counts when mock_server drops
}

#[tokio::test]
async fn test_failing_page_is_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/ok">OK</a><a href="/broken">Broken</a><a href="/missing">Missing</a>"#
            .to_string(),
    )
    .await;
    mount_page(&mock_server, "/ok", "<p>fine</p>".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    // "/missing" is not mounted, so wiremock answers 404

    let config = create_test_config(&format!("{}/", base_url), 2);
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.total(), 4);
    let mut failed = report.failed.clone();
    failed.sort();
    assert_eq!(
        failed,
        vec![format!("{}/broken", base_url), format!("{}/missing", base_url)]
    );
    assert!((report.success_rate() - 50.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_fetch_timeout_is_not_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/slow">Slow</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&format!("{}/", base_url), 2);
    config.http.timeout_secs = 1;
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.total(), 2);
    assert_eq!(report.failed, vec![format!("{}/slow", base_url)]);
}

#[tokio::test]
async fn test_out_of_scope_links_are_not_followed() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="{}/elsewhere">External</a>
            <a href="mailto:someone@example.com">Mail</a>
            <a href="relative/path">Relative without slash</a>
            <a href="">Empty</a>
            <a href="/inside">Inside</a>"#,
            other_server.uri()
        ),
    )
    .await;
    mount_page(&mock_server, "/inside", "<p>inside</p>".to_string()).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&other_server)
        .await;

    let mut config = create_test_config(&format!("{}/", base_url), 3);
    config.crawler.track_out_of_scope = true;
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(
        sorted_urls(&report),
        vec![format!("{}/", base_url), format!("{}/inside", base_url)]
    );

    let mut expected_out = vec![
        format!("{}/elsewhere", other_server.uri()),
        "mailto:someone@example.com".to_string(),
        "relative/path".to_string(),
    ];
    expected_out.sort();
    assert_eq!(report.out_of_scope, expected_out);
}

#[tokio::test]
async fn test_out_of_scope_links_not_tracked_by_default() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="https://other.invalid/">External</a>"#.to_string(),
    )
    .await;

    let config = create_test_config(&format!("{}/", base_url), 1);
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.total(), 1);
    assert!(report.out_of_scope.is_empty());
}

#[tokio::test]
async fn test_deep_chain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // "/" -> "/p1" -> ... -> "/p20", each page links to the next
    mount_page(&mock_server, "/", r#"<a href="/p1">next</a>"#.to_string()).await;
    for i in 1..=20 {
        mount_page(
            &mock_server,
            &format!("/p{}", i),
            format!(r#"<a href="/p{}">next</a><a href="/">home</a>"#, i + 1),
        )
        .await;
    }

    let config = create_test_config(&format!("{}/", base_url), 3);
    let report = crawl(config).await.expect("Crawl failed");

    // "/p21" is linked but not mounted
    assert_eq!(report.total(), 22);
    assert_eq!(report.failed, vec![format!("{}/p21", base_url)]);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let config = create_test_config("ftp://example.com/", 2);
    let result = crawl(config).await;
    assert!(result.is_err());

    let config = create_test_config("https://example.com/", 0);
    let result = crawl(config).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_coordinator_report_and_summary() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/a">A</a>"#.to_string()).await;
    mount_page(&mock_server, "/a", "<p>a</p>".to_string()).await;

    let config = create_test_config(&format!("{}/", base_url), 2);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.seed_url, format!("{}/", base_url));
    assert!(report.finished_at >= report.started_at);

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let summary_path = dir.path().join("summary.md");
    write_markdown_summary(&report, &summary_path).expect("Failed to write summary");

    let markdown = std::fs::read_to_string(&summary_path).expect("Failed to read summary");
    assert_eq!(markdown, format_markdown_summary(&report));
    assert!(markdown.contains(&format!("- {}/a", base_url)));
    assert!(markdown.contains("| Crawled | 2 |"));
}
