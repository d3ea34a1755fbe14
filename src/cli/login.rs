use wingetup::config::Config;
use wingetup::core::credentials::GITHUB_TOKEN_KEY;
use wingetup::core::{CredentialStore, WingetError, WingetResult};
use wingetup::di::ConfigProvider;
use wingetup::github::GitHubClient;
use wingetup::prompt::{DialoguerInput, UserInput};

pub async fn run() -> WingetResult<()> {
    let config = Config::load()?;
    run_with_input(&config, &DialoguerInput).await
}

pub async fn run_with_input(config: &dyn ConfigProvider, input: &dyn UserInput) -> WingetResult<()> {
    input.show("GitHub Login");
    input.show("Create a token with the 'public_repo' scope at https://github.com/settings/tokens\n");

    let token = read_token(input)?;
    let login = verify_token(config, &token).await?;

    CredentialStore::store(GITHUB_TOKEN_KEY, &token)?;
    input.show(&format!("\n✓ Logged in as {}", login));
    input.show("✓ Token stored securely");
    Ok(())
}

pub fn logout() -> WingetResult<()> {
    if !CredentialStore::exists(GITHUB_TOKEN_KEY) {
        println!("No GitHub token is stored");
        return Ok(());
    }
    CredentialStore::delete(GITHUB_TOKEN_KEY)?;
    println!("✓ Removed GitHub token from the keychain");
    Ok(())
}

fn read_token(input: &dyn UserInput) -> WingetResult<String> {
    let token = input.prompt_password("GitHub Token")?;
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(WingetError::Credential("Token cannot be empty".to_string()));
    }
    Ok(token)
}

/// Resolve the account a token belongs to
async fn verify_token(config: &dyn ConfigProvider, token: &str) -> WingetResult<String> {
    let client = GitHubClient::new(config, Some(token.to_string()))?;
    client.authenticated_user().await
}
