//! Artifact discovery in the output directory
//!
//! The include pattern is a glob relative to the artifacts directory
//! (`*.nupkg`). The exclude pattern drops matches by file name: a glob when it
//! contains wildcards, otherwise a plain suffix (`.symbols.nupkg`).

use crate::core::error::{PipelineResult, ResultExt};
use glob::Pattern;
use std::path::{Path, PathBuf};

/// File-name filter for excluded artifacts
#[derive(Debug, Clone)]
pub enum ExcludeFilter {
  None,
  Suffix(String),
  Glob(Pattern),
}

impl ExcludeFilter {
  /// Build from the configured exclude text
  pub fn parse(text: Option<&str>) -> PipelineResult<Self> {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
      return Ok(ExcludeFilter::None);
    };

    if text.contains(['*', '?', '[']) {
      Ok(ExcludeFilter::Glob(Pattern::new(text)?))
    } else {
      Ok(ExcludeFilter::Suffix(text.to_string()))
    }
  }

  /// Whether a path is excluded
  pub fn excludes(&self, path: &Path) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    match self {
      ExcludeFilter::None => false,
      ExcludeFilter::Suffix(suffix) => name.ends_with(suffix.as_str()),
      ExcludeFilter::Glob(pattern) => pattern.matches(&name),
    }
  }
}

/// Sorted list of publishable artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
  pub files: Vec<PathBuf>,
}

impl ArtifactSet {
  /// Enumerate `include` matches under `dir`, dropping excluded files
  ///
  /// A missing directory yields an empty set.
  pub fn discover(dir: &Path, include: &str, exclude: &ExcludeFilter) -> PipelineResult<Self> {
    if !dir.is_dir() {
      tracing::debug!(dir = %dir.display(), "artifacts directory does not exist");
      return Ok(Self::default());
    }

    let escaped_dir = Pattern::escape(&dir.to_string_lossy());
    let full_pattern = format!("{}/{}", escaped_dir.trim_end_matches('/'), include);

    let mut files = Vec::new();
    for entry in glob::glob(&full_pattern)? {
      let path = entry
        .map_err(std::io::Error::from)
        .with_context(|| format!("Failed to read artifact under {}", dir.display()))?;
      if !path.is_file() {
        continue;
      }
      if exclude.excludes(&path) {
        tracing::debug!(artifact = %path.display(), "excluded by pattern");
        continue;
      }
      files.push(path);
    }
    files.sort();

    Ok(Self { files })
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
    self.files.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"pkg").unwrap();
  }

  #[test]
  fn test_excluded_files_never_included() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "MyPack.1.0.0.nupkg");
    touch(dir.path(), "MyPack.1.0.0.symbols.nupkg");
    touch(dir.path(), "notes.txt");

    let exclude = ExcludeFilter::parse(Some(".symbols.nupkg")).unwrap();
    let set = ArtifactSet::discover(dir.path(), "*.nupkg", &exclude).unwrap();

    assert_eq!(set.len(), 1);
    assert!(set.iter().all(|p| !exclude.excludes(p)));
    assert!(set.files[0].ends_with("MyPack.1.0.0.nupkg"));
  }

  #[test]
  fn test_glob_exclude() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.nupkg", "a.snupkg", "b.symbols.nupkg", "c.nupkg"] {
      touch(dir.path(), name);
    }

    let exclude = ExcludeFilter::parse(Some("*.symbols.nupkg")).unwrap();
    let set = ArtifactSet::discover(dir.path(), "*nupkg", &exclude).unwrap();
    let names: Vec<_> = set
      .iter()
      .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
      .collect();

    assert_eq!(names, vec!["a.nupkg", "a.snupkg", "c.nupkg"]);
  }

  #[test]
  fn test_missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let set = ArtifactSet::discover(&dir.path().join("nope"), "*.nupkg", &ExcludeFilter::None).unwrap();
    assert!(set.is_empty());
  }

  #[test]
  fn test_blank_exclude_is_none() {
    assert!(matches!(ExcludeFilter::parse(Some("  ")).unwrap(), ExcludeFilter::None));
    assert!(matches!(ExcludeFilter::parse(None).unwrap(), ExcludeFilter::None));
  }

  #[test]
  fn test_invalid_exclude_glob() {
    assert!(ExcludeFilter::parse(Some("[")).is_err());
  }
}
