//! Robots.txt checks against mock district sites

use super::create_test_config;
use district_scout::compliance::{run_site_check, ComplianceChecker};
use district_scout::config::UserAgentConfig;
use district_scout::input::SiteEntry;
use district_scout::robots::build_http_client;
use district_scout::SiteVerdict;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_checker() -> ComplianceChecker {
    let user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    };
    ComplianceChecker::new(build_http_client(&user_agent).expect("Failed to build client"))
}

async fn mock_robots(status: u16, body: &str) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_full_disallow_is_denied() {
    let mock_server = mock_robots(200, "User-agent: *\nDisallow: /\n").await;
    let mut checker = test_checker();

    let check = checker.check_site(&mock_server.uri()).await;

    assert!(!check.decision.site_allowed);
    assert_eq!(check.verdict, SiteVerdict::Denied);
}

#[tokio::test]
async fn test_missing_policy_fails_open() {
    let mock_server = mock_robots(404, "Not Found").await;
    let mut checker = test_checker();

    let check = checker.check_site(&mock_server.uri()).await;

    assert!(check.decision.site_allowed);
    assert!(check.decision.sensitive_path_allowed);
    assert_eq!(check.verdict, SiteVerdict::Allowed);
}

#[tokio::test]
async fn test_server_error_fails_open() {
    let mock_server = mock_robots(503, "").await;
    let mut checker = test_checker();

    assert_eq!(
        checker.check_site(&mock_server.uri()).await.verdict,
        SiteVerdict::Allowed
    );
}

#[tokio::test]
async fn test_unreachable_site_fails_open() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let mut checker = test_checker();
    assert_eq!(checker.check_site(&uri).await.verdict, SiteVerdict::Allowed);
}

#[tokio::test]
async fn test_staff_disallow_blocks_sensitive_paths_only() {
    let mock_server = mock_robots(
        200,
        "# district policy\nUser-agent: *\nDisallow: /staff/\nDisallow: /search\n",
    )
    .await;
    let mut checker = test_checker();

    let check = checker.check_site(&mock_server.uri()).await;

    assert!(check.decision.site_allowed);
    assert!(!check.decision.sensitive_path_allowed);
    assert_eq!(check.verdict, SiteVerdict::SensitiveDisallowed);
}

#[tokio::test]
async fn test_agent_specific_block_does_not_apply() {
    let mock_server = mock_robots(
        200,
        "User-agent: Googlebot\nDisallow: /\n\nUser-agent: *\nAllow: /\n",
    )
    .await;
    let mut checker = test_checker();

    assert_eq!(
        checker.check_site(&mock_server.uri()).await.verdict,
        SiteVerdict::Allowed
    );
}

#[tokio::test]
async fn test_policy_fetched_once_per_origin() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /tmp/"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut checker = test_checker();
    let base = mock_server.uri();
    checker.check_site(&base).await;
    checker.check_site(&format!("{}/schools/index.html", base)).await;

    assert_eq!(checker.cached_origins(), 1);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_site_check_writes_accepted_links_in_order() {
    let open = mock_robots(200, "User-agent: *\nDisallow: /private/").await;
    let closed = mock_robots(200, "User-agent: *\nDisallow: /").await;
    let no_staff = mock_robots(200, "User-agent: *\nDisallow: /faculty/").await;
    let missing = mock_robots(404, "").await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(dir.path());

    let sites = vec![
        SiteEntry {
            name: "Alpha Unified".to_string(),
            link: open.uri(),
        },
        SiteEntry {
            name: "Beta Elementary".to_string(),
            link: closed.uri(),
        },
        SiteEntry {
            name: "Gamma High".to_string(),
            link: no_staff.uri(),
        },
        SiteEntry {
            name: "Delta County".to_string(),
            link: missing.uri(),
        },
    ];

    let report = run_site_check(&config, &sites).await.expect("Site check failed");

    assert_eq!(report.accepted, vec![open.uri(), missing.uri()]);
    assert_eq!(report.denied, 1);
    assert_eq!(report.sensitive_disallowed, 1);
    assert_eq!(report.total(), 4);

    let written = std::fs::read_to_string(&config.output.accepted_links_path)
        .expect("Accepted links file missing");
    assert_eq!(written, format!("{}\n{}\n", open.uri(), missing.uri()));
}
