//! Small formatting helpers shared by the pipeline output

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Hide a secret for display, keeping the last four characters of long values
///
/// Short secrets are fully masked so nothing guessable leaks.
pub fn mask_secret(secret: &str) -> String {
  let chars: Vec<char> = secret.chars().collect();
  if chars.len() <= 8 {
    return "****".to_string();
  }
  let tail: String = chars[chars.len() - 4..].iter().collect();
  format!("****{}", tail)
}

/// Display an optional secret (`<not set>` when absent)
pub fn describe_secret(secret: Option<&str>) -> String {
  match secret {
    Some(s) if !s.is_empty() => mask_secret(s),
    _ => "<not set>".to_string(),
  }
}

/// `1m 05s`, `12.3s` or `450ms`
pub fn format_duration(duration: Duration) -> String {
  let millis = duration.as_millis();
  if millis < 1_000 {
    format!("{}ms", millis)
  } else if millis < 60_000 {
    format!("{:.1}s", duration.as_secs_f64())
  } else {
    let secs = duration.as_secs();
    format!("{}m {:02}s", secs / 60, secs % 60)
  }
}

/// Resolve `.` and `..` components without touching the filesystem
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize_path(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if !out.pop() {
          out.push(component);
        }
      }
      other => out.push(other),
    }
  }
  out
}

/// Normalize `path`, then canonicalize its longest existing prefix
///
/// Paths that do not exist yet still resolve symlinks in their existing parents.
pub fn resolve_path(path: &Path) -> PathBuf {
  let normalized = normalize_path(path);
  let mut existing = normalized.as_path();
  let mut rest = Vec::new();
  loop {
    if let Ok(canonical) = std::fs::canonicalize(existing) {
      return rest.iter().rev().fold(canonical, |acc: PathBuf, part| acc.join(part));
    }
    match (existing.parent(), existing.file_name()) {
      (Some(parent), Some(name)) => {
        rest.push(name.to_os_string());
        existing = parent;
      }
      _ => return normalized,
    }
  }
}
