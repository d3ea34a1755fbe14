use crate::core::{WingetError, WingetResult};
use crate::di::traits::InstallerHasher;
use async_trait::async_trait;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{header, Client as HttpClient};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info};

/// Streams installers and hashes them without touching the disk
pub struct Downloader {
    http_client: HttpClient,
    show_progress: bool,
}

impl Downloader {
    pub fn new() -> WingetResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("wingetup/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WingetError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            show_progress: true,
        })
    }

    /// Disable the progress bar
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn progress_bar(&self, total: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        match total {
            Some(total) => {
                let pb = ProgressBar::new(total);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec})")
                {
                    pb.set_style(style.progress_chars("#>-"));
                }
                pb
            }
            None => ProgressBar::new_spinner(),
        }
    }

    /// Download `url` and return the uppercase hex SHA-256 of its body
    pub async fn download_sha256(&self, url: &str) -> WingetResult<String> {
        info!(url, "Downloading installer");
        let response = self
            .http_client
            .get(url)
            .header(header::ACCEPT, "*/*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WingetError::Download(format!(
                "Failed to download {}: HTTP {}",
                url, status
            )));
        }

        let pb = self.progress_bar(response.content_length());
        let mut stream = response.bytes_stream();
        let mut hasher = Sha256::new();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            hasher.update(&chunk);
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }
        pb.finish_and_clear();

        let sha256 = hex::encode_upper(hasher.finalize());
        debug!(url, bytes = downloaded, %sha256, "Hashed installer");
        Ok(sha256)
    }
}

#[async_trait]
impl InstallerHasher for Downloader {
    async fn sha256(&self, url: &str) -> WingetResult<String> {
        self.download_sha256(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format_error_with_help;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_hash_is_uppercase_sha256() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app.exe"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello".to_vec()))
            .mount(&server)
            .await;

        let downloader = Downloader::new().unwrap().quiet();
        let sha = downloader
            .sha256(&format!("{}/app.exe", server.uri()))
            .await
            .unwrap();
        assert_eq!(
            sha,
            "2CF24DBA5FB0A30E26E83B2AC5B9E29E1B161E5C1FA7425E73043362938B9824"
        );
    }

    #[tokio::test]
    async fn test_http_error_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let downloader = Downloader::new().unwrap().quiet();
        let result = downloader
            .sha256(&format!("{}/missing.exe", server.uri()))
            .await;
        assert!(matches!(result, Err(WingetError::Download(_))));
    }

    #[tokio::test]
    async fn test_forbidden_download_is_not_a_github_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let downloader = Downloader::new().unwrap().quiet();
        let err = downloader
            .sha256(&format!("{}/private.exe", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, WingetError::Download(_)));
        let rendered = format_error_with_help(&err);
        assert!(!rendered.contains("GitHub token"));
        assert!(rendered.contains("installer URL"));
    }
}
