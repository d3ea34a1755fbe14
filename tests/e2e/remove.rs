use super::TestContext;
use predicates::prelude::*;
use wiremock::MockServer;

#[tokio::test(flavor = "multi_thread")]
async fn test_remove_missing_version() {
    let server = MockServer::start().await;
    let ctx = TestContext::new().with_api(&server.uri());

    ctx.wingetup()
        .args([
            "remove",
            "--id",
            "Contoso.App",
            "--version",
            "9.9.9",
            "--reason",
            "Not needed anymore",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Contoso.App 9.9.9 does not exist in microsoft/winget-pkgs",
        ));
}
