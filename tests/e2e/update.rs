use super::TestContext;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread")]
async fn test_update_new_package_is_refused() {
    // Unmatched requests get a 404, so the package has no versions
    let server = MockServer::start().await;
    let ctx = TestContext::new().with_api(&server.uri());

    ctx.wingetup()
        .args(["update", "--id", "Nobody.Nothing", "--version", "1.0.0"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Nobody.Nothing is not in the winget-pkgs repository.",
        ))
        .stdout(predicate::str::contains("'new' command"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_rejects_invalid_urls() {
    let server = MockServer::start().await;
    let ctx = TestContext::new().with_api(&server.uri());

    ctx.wingetup()
        .args([
            "update",
            "--id",
            "Contoso.App",
            "--urls",
            "ftp://example.com/app.msi",
            "app.msi",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("Invalid installer URL ftp://example.com/app.msi")
                .and(predicate::str::contains("Invalid installer URL app.msi"))
                .and(predicate::str::contains("2 of 2 installer URLs are invalid")),
        );

    // Nothing was fetched
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_reports_api_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/microsoft/winget-pkgs/contents/manifests/c/Contoso/App"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let ctx = TestContext::new().with_api(&server.uri());

    ctx.wingetup()
        .args(["update", "--id", "Contoso.App"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: GitHub API error"));
}
