//! Remote metadata fetching.
//!
//! The build-target generator needs the published `.sha1` digest for every
//! library artifact. Digests are fetched one at a time from the artifact
//! repository; any failure is fatal for the whole run, since a build file
//! with missing hashes would be inconsistent with the rest of the output.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::consts::{DEFAULT_REPO_URL, REPO_URL_ENV};

/// Errors that can occur while fetching remote metadata.
#[derive(Debug, Error)]
pub enum FetchError {
  /// The request could not be performed.
  #[error("cannot download '{url}': {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// The server answered with a non-success status.
  #[error("cannot download '{url}': HTTP {status}")]
  Status { url: String, status: StatusCode },
}

/// Fetches hash digests from a Maven-layout artifact repository.
pub struct HashFetcher {
  client: reqwest::Client,
  repo_url: String,
}

impl HashFetcher {
  /// Create a fetcher for the given repository base URL. The base URL is
  /// expected to end with `/`.
  pub fn new(repo_url: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      repo_url: repo_url.into(),
    }
  }

  /// Create a fetcher from the environment, falling back to Maven Central.
  pub fn from_env() -> Self {
    let repo_url = std::env::var(REPO_URL_ENV).unwrap_or_else(|_| DEFAULT_REPO_URL.to_string());
    Self::new(repo_url)
  }

  /// The repository base URL this fetcher reads from.
  pub fn repo_url(&self) -> &str {
    &self.repo_url
  }

  /// Fetch the `.sha1` digest for a repository-relative artifact path plus
  /// suffix (e.g. `com/google/guava/guava/31.0/guava-31.0` + `.jar`).
  ///
  /// The response body is decoded as text and trimmed.
  pub async fn fetch_sha1(&self, repo_path: &str, suffix: &str) -> Result<String, FetchError> {
    let url = format!("{}{}{}.sha1", self.repo_url, repo_path, suffix);
    debug!(url = %url, "fetching digest");

    let response = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|e| FetchError::Request {
        url: url.clone(),
        source: e,
      })?;

    if !response.status().is_success() {
      return Err(FetchError::Status {
        url,
        status: response.status(),
      });
    }

    let body = response.text().await.map_err(|e| FetchError::Request {
      url: url.clone(),
      source: e,
    })?;

    Ok(body.trim().to_string())
  }
}
