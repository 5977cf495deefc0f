//! Release notes extraction from a heading-delimited changelog
//!
//! A section starts at every line beginning with `## `. Blank lines are dropped,
//! so a section with only whitespace under its heading counts as empty and is
//! passed over when picking the latest notes.
//!
//! ```markdown
//! # Changelog
//!
//! ## [Unreleased]
//!
//! ## [1.2.0] - 2025-01-15
//! - Added subtraction
//!
//! ## [1.1.0] - 2024-12-01
//! - Initial release
//! ```
//!
//! Without a tag the notes returned above are `- Added subtraction`.

use crate::core::error::{PipelineError, PipelineResult, ResultExt};
use std::path::Path;

const SECTION_MARKER: &str = "## ";

/// One `## ` section of a changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogSection {
  /// Heading text without the marker, e.g. `[1.2.0] - 2025-01-15`
  pub caption: String,
  pub notes: Vec<String>,
}

impl ChangelogSection {
  /// Whether the caption names `tag` (`[1.2.0] - date` matches `1.2.0` and `v1.2.0`)
  fn matches_tag(&self, tag: &str) -> bool {
    let tag = tag.trim().trim_start_matches(['v', 'V']).to_ascii_lowercase();
    let caption = self.caption.replace(['[', ']'], "").to_ascii_lowercase();
    let caption = caption.trim_start_matches(['v', 'V']);
    caption == tag || caption.starts_with(&format!("{} ", tag))
  }
}

/// Split changelog text into its sections
pub fn parse_sections(content: &str) -> Vec<ChangelogSection> {
  let mut sections: Vec<ChangelogSection> = Vec::new();

  for line in content.lines().filter(|l| !l.trim().is_empty()) {
    if let Some(caption) = line.strip_prefix(SECTION_MARKER) {
      sections.push(ChangelogSection {
        caption: caption.trim().to_string(),
        notes: Vec::new(),
      });
    } else if let Some(current) = sections.last_mut() {
      current.notes.push(line.trim_end().to_string());
    }
  }

  sections
}

/// Notes of the section for `tag`, or of the first non-empty section
pub fn extract_section_notes(content: &str, tag: Option<&str>) -> PipelineResult<Vec<String>> {
  let sections = parse_sections(content);
  if sections.is_empty() {
    return Err(PipelineError::Validation(
      "changelog has no `## ` sections".to_string(),
    ));
  }

  let section = match tag {
    Some(tag) => sections.iter().find(|s| s.matches_tag(tag)).ok_or_else(|| {
      PipelineError::Validation(format!("changelog has no section for '{}'", tag))
    })?,
    None => sections
      .iter()
      .find(|s| !s.notes.is_empty())
      .ok_or_else(|| PipelineError::Validation("every changelog section is empty".to_string()))?,
  };

  Ok(section.notes.clone())
}

/// Read the changelog file and join the latest notes into a release body
pub fn latest_release_notes(path: &Path) -> PipelineResult<String> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read changelog {}", path.display()))?;
  let notes = extract_section_notes(&content, None)?;
  Ok(notes.join("\n"))
}

#[cfg(test)]
mod tests {
  use super::*;

  const CHANGELOG: &str = "# Changelog\n\
\n\
## [1.2.0] - 2025-01-15\n\
\n\
- Added subtraction\n\
- Fixed rounding\n\
\n\
## [1.1.0] - 2024-12-01\n\
- Initial release\n";

  #[test]
  fn test_latest_section_only() {
    let notes = extract_section_notes(CHANGELOG, None).unwrap();
    assert_eq!(notes, vec!["- Added subtraction", "- Fixed rounding"]);
  }

  #[test]
  fn test_empty_unreleased_section_is_skipped() {
    let content = CHANGELOG.replacen("# Changelog\n", "# Changelog\n\n## [Unreleased]\n", 1);
    assert_eq!(parse_sections(&content)[0].caption, "[Unreleased]");
    let notes = extract_section_notes(&content, None).unwrap();
    assert_eq!(notes, vec!["- Added subtraction", "- Fixed rounding"]);
  }

  #[test]
  fn test_section_by_tag() {
    let notes = extract_section_notes(CHANGELOG, Some("v1.1.0")).unwrap();
    assert_eq!(notes, vec!["- Initial release"]);
  }

  #[test]
  fn test_unknown_tag_is_an_error() {
    assert!(extract_section_notes(CHANGELOG, Some("9.9.9")).is_err());
  }

  #[test]
  fn test_no_sections_is_an_error() {
    assert!(extract_section_notes("# Changelog\n\nnothing here\n", None).is_err());
  }

  #[test]
  fn test_title_line_is_not_a_section() {
    let sections = parse_sections(CHANGELOG);
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].caption, "[1.2.0] - 2025-01-15");
  }

  #[test]
  fn test_latest_release_notes_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("CHANGELOG.md");
    std::fs::write(&path, CHANGELOG).unwrap();
    assert_eq!(
      latest_release_notes(&path).unwrap(),
      "- Added subtraction\n- Fixed rounding"
    );
  }
}
