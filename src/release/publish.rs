//! Release creation: draft, upload every asset, then publish
//!
//! Uploads run one after another and each one completes before the next
//! starts. The release is only made public once every asset is attached; if
//! an upload fails the draft stays behind and the error carries its URL.

use crate::core::error::{ApiError, PipelineError, PipelineResult};
use crate::release::artifacts::ArtifactSet;
use crate::release::github::{NewRelease, Release, ReleaseApi};
use crate::ui::ArtifactProgress;

/// Owner/name pair of the repository receiving the release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
  pub owner: String,
  pub name: String,
}

/// Create a draft release, attach `artifacts`, and publish it
pub fn publish_release(
  api: &dyn ReleaseApi,
  slug: &RepoSlug,
  release: &NewRelease,
  artifacts: &ArtifactSet,
) -> PipelineResult<Release> {
  let draft_request = NewRelease {
    draft: true,
    ..release.clone()
  };
  let draft = api.create_release(&slug.owner, &slug.name, &draft_request)?;
  println!("   📝 Draft release created: {}", draft.html_url);

  let mut progress = ArtifactProgress::new(artifacts.len(), "Uploading assets");
  for asset in artifacts.iter() {
    match api.upload_asset(&draft, asset) {
      Ok(uploaded) => {
        tracing::debug!(asset = %uploaded.name, url = %uploaded.browser_download_url, "asset uploaded");
        progress.inc();
      }
      Err(err) => {
        return Err(PipelineError::Api(ApiError::DraftLeftBehind {
          url: draft.html_url.clone(),
          source: Box::new(err),
        }));
      }
    }
  }

  let published = api
    .publish_release(&slug.owner, &slug.name, draft.id)
    .map_err(|err| {
      PipelineError::Api(ApiError::DraftLeftBehind {
        url: draft.html_url.clone(),
        source: Box::new(err),
      })
    })?;
  println!("   🚀 Release published: {}", published.html_url);
  Ok(published)
}
