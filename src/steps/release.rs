//! CreateRelease target

use crate::core::context::PipelineContext;
use crate::core::error::{ConfigError, GitError, PipelineError, PipelineResult};
use crate::release::changelog::latest_release_notes;
use crate::release::{ArtifactSet, NewRelease, ReleaseApi, RepoSlug, publish_release};

pub fn run(ctx: &PipelineContext, api: Option<&dyn ReleaseApi>) -> PipelineResult<()> {
  let api = api.ok_or_else(|| {
    PipelineError::Config(ConfigError::MissingField {
      field: "GITHUB_TOKEN".to_string(),
      target: "CreateRelease".to_string(),
    })
  })?;

  let slug = match &ctx.repo.github {
    Some((owner, name)) => RepoSlug {
      owner: owner.clone(),
      name: name.clone(),
    },
    None => {
      return Err(PipelineError::Git(GitError::UnknownRemote {
        url: "origin".to_string(),
      }));
    }
  };

  let request = release_request(ctx)?;
  let artifacts = ArtifactSet::discover(
    &ctx.config.artifacts_dir,
    &ctx.config.artifacts_type,
    &ctx.config.exclude_filter,
  )?;
  println!(
    "   Releasing {} on {}/{} with {} asset(s)",
    request.tag_name,
    slug.owner,
    slug.name,
    artifacts.len()
  );

  publish_release(api, &slug, &request, &artifacts)?;
  Ok(())
}

/// Release fields derived from the version and changelog
pub fn release_request(ctx: &PipelineContext) -> PipelineResult<NewRelease> {
  let notes = latest_release_notes(&ctx.config.changelog)?;
  let version = &ctx.version;

  Ok(NewRelease {
    tag_name: version.nuget_version_v2.clone(),
    target_commitish: ctx.repo.head_sha.clone(),
    name: format!("v{}", version.nuget_version_v2),
    body: notes,
    draft: true,
    prerelease: version.is_prerelease(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::config::ConfigOverrides;
  use crate::release::github::{Release, ReleaseAsset};
  use crate::steps::testing;
  use std::cell::RefCell;
  use std::fs;
  use std::path::Path;

  const CHANGELOG: &str = "# Changelog\n\n## [1.0.0]\n\n- Added widgets\n- Fixed sprockets\n\n## [0.9.0]\n\n- Beta\n";

  #[derive(Default)]
  struct FakeApi {
    created: RefCell<Vec<NewRelease>>,
    uploaded: RefCell<Vec<String>>,
    published: RefCell<bool>,
  }

  impl ReleaseApi for FakeApi {
    fn create_release(&self, _owner: &str, _repo: &str, release: &NewRelease) -> PipelineResult<Release> {
      self.created.borrow_mut().push(release.clone());
      Ok(Release {
        id: 1,
        tag_name: release.tag_name.clone(),
        html_url: "https://github.com/acme/widgets/releases/1".to_string(),
        upload_url: "https://uploads.example/assets{?name}".to_string(),
        draft: true,
      })
    }

    fn upload_asset(&self, _release: &Release, asset: &Path) -> PipelineResult<ReleaseAsset> {
      let name = asset.file_name().unwrap().to_string_lossy().to_string();
      self.uploaded.borrow_mut().push(name.clone());
      Ok(ReleaseAsset {
        id: 2,
        browser_download_url: String::new(),
        name,
      })
    }

    fn publish_release(&self, _owner: &str, _repo: &str, release_id: u64) -> PipelineResult<Release> {
      *self.published.borrow_mut() = true;
      Ok(Release {
        id: release_id,
        tag_name: String::new(),
        html_url: "https://github.com/acme/widgets/releases/1".to_string(),
        upload_url: String::new(),
        draft: false,
      })
    }
  }

  fn setup(branch: &str) -> (tempfile::TempDir, PipelineContext) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("CHANGELOG.md"), CHANGELOG).unwrap();
    let ctx = testing::context(dir.path(), branch, ConfigOverrides::default());
    fs::create_dir_all(&ctx.config.artifacts_dir).unwrap();
    fs::write(ctx.config.artifacts_dir.join("MyPack.1.0.0.nupkg"), b"pkg").unwrap();
    (dir, ctx)
  }

  #[test]
  fn test_release_uses_latest_notes_and_version() {
    let (_dir, ctx) = setup("main");
    let request = release_request(&ctx).unwrap();

    assert_eq!(request.body, "- Added widgets\n- Fixed sprockets");
    assert_eq!(request.tag_name, ctx.version.nuget_version_v2);
    assert_eq!(request.name, format!("v{}", ctx.version.nuget_version_v2));
    assert_eq!(request.target_commitish, ctx.repo.head_sha);
    assert!(!request.prerelease);
  }

  #[test]
  fn test_release_branch_is_prerelease() {
    let (_dir, ctx) = setup("release/1.0.0");
    assert!(release_request(&ctx).unwrap().prerelease);
  }

  #[test]
  fn test_run_uploads_artifacts_then_publishes() {
    let (_dir, ctx) = setup("main");
    let api = FakeApi::default();
    run(&ctx, Some(&api)).unwrap();

    assert!(api.created.borrow()[0].draft);
    assert_eq!(*api.uploaded.borrow(), vec!["MyPack.1.0.0.nupkg"]);
    assert!(*api.published.borrow());
  }

  #[test]
  fn test_missing_token_is_config_error() {
    let (_dir, ctx) = setup("main");
    let err = run(&ctx, None).unwrap_err();
    assert!(matches!(err, PipelineError::Config(ConfigError::MissingField { .. })));
  }

  #[test]
  fn test_missing_changelog_fails_before_any_call() {
    let (dir, ctx) = setup("main");
    fs::remove_file(dir.path().join("CHANGELOG.md")).unwrap();
    let api = FakeApi::default();

    assert!(run(&ctx, Some(&api)).is_err());
    assert!(api.created.borrow().is_empty());
  }
}
