//! GitHub Releases REST client
//!
//! Three calls make up a release:
//! - `POST /repos/{owner}/{repo}/releases` creates the (draft) release
//! - `POST {upload_url}?name=<file>` uploads one binary asset
//! - `PATCH /repos/{owner}/{repo}/releases/{id}` flips `draft` to false
//!
//! The pipeline is sequential, so the blocking client is used and every call
//! finishes before the next one starts.

use crate::core::error::{ApiError, PipelineError, PipelineResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const PACKAGE_CONTENT_TYPE: &str = "application/octet-stream";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("pack-rail/", env!("CARGO_PKG_VERSION"));

/// Request body for creating a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelease {
  pub tag_name: String,
  pub target_commitish: String,
  pub name: String,
  pub body: String,
  pub draft: bool,
  pub prerelease: bool,
}

/// Release as returned by the API (fields we use)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
  pub id: u64,
  pub tag_name: String,
  pub html_url: String,
  /// Hypermedia template, e.g. `https://uploads.github.com/.../assets{?name,label}`
  pub upload_url: String,
  pub draft: bool,
}

impl Release {
  /// Upload endpoint with the URI template stripped
  pub fn upload_endpoint(&self) -> &str {
    match self.upload_url.find('{') {
      Some(idx) => &self.upload_url[..idx],
      None => &self.upload_url,
    }
  }
}

/// Uploaded asset (fields we use)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
  pub id: u64,
  pub name: String,
  pub browser_download_url: String,
}

#[derive(Debug, Serialize)]
struct ReleaseUpdate {
  draft: bool,
}

/// Operations the release target performs against the hosting platform
pub trait ReleaseApi {
  fn create_release(&self, owner: &str, repo: &str, release: &NewRelease) -> PipelineResult<Release>;
  fn upload_asset(&self, release: &Release, asset: &Path) -> PipelineResult<ReleaseAsset>;
  fn publish_release(&self, owner: &str, repo: &str, release_id: u64) -> PipelineResult<Release>;
}

/// GitHub API client authenticated with a token
pub struct GitHubClient {
  client: reqwest::blocking::Client,
  api_url: String,
  token: String,
}

impl GitHubClient {
  pub fn new(api_url: &str, token: &str, timeout: Duration) -> PipelineResult<Self> {
    let client = reqwest::blocking::Client::builder()
      .timeout(timeout)
      .user_agent(USER_AGENT)
      .build()
      .map_err(|e| PipelineError::message(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      api_url: api_url.trim_end_matches('/').to_string(),
      token: token.to_string(),
    })
  }

  fn authorized(&self, request: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
    request
      .bearer_auth(&self.token)
      .header("Accept", "application/vnd.github+json")
      .header("X-GitHub-Api-Version", API_VERSION)
  }
}

impl ReleaseApi for GitHubClient {
  fn create_release(&self, owner: &str, repo: &str, release: &NewRelease) -> PipelineResult<Release> {
    let url = format!("{}/repos/{}/{}/releases", self.api_url, owner, repo);
    tracing::debug!(%url, tag = %release.tag_name, "creating release");

    let response = self.authorized(self.client.post(&url)).json(release).send()?;
    parse_json(response, "create release")
  }

  fn upload_asset(&self, release: &Release, asset: &Path) -> PipelineResult<ReleaseAsset> {
    let file_name = asset
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .ok_or_else(|| PipelineError::message(format!("Asset path has no file name: {}", asset.display())))?;
    let bytes = std::fs::read(asset).with_context(|| format!("Failed to read asset {}", asset.display()))?;
    tracing::debug!(asset = %file_name, size = bytes.len(), "uploading release asset");

    let response = self
      .authorized(self.client.post(release.upload_endpoint()))
      .query(&[("name", file_name.as_str())])
      .header("Content-Type", PACKAGE_CONTENT_TYPE)
      .body(bytes)
      .send()?;
    parse_json(response, &format!("upload of {}", file_name))
  }

  fn publish_release(&self, owner: &str, repo: &str, release_id: u64) -> PipelineResult<Release> {
    let url = format!("{}/repos/{}/{}/releases/{}", self.api_url, owner, repo, release_id);
    tracing::debug!(%url, "publishing release");

    let response = self
      .authorized(self.client.patch(&url))
      .json(&ReleaseUpdate { draft: false })
      .send()?;
    parse_json(response, "publish release")
  }
}

fn parse_json<T: serde::de::DeserializeOwned>(
  response: reqwest::blocking::Response,
  operation: &str,
) -> PipelineResult<T> {
  let status = response.status();
  if !status.is_success() {
    let body = response.text().unwrap_or_default();
    return Err(PipelineError::Api(ApiError::Status {
      operation: operation.to_string(),
      status: status.as_u16(),
      body,
    }));
  }
  Ok(response.json()?)
}
