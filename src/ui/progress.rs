//! Progress indicators for multi-artifact operations
//!
//! Uses `linya` bars; one bar per batch of artifacts (pushes, uploads).

use linya::{Bar, Progress};

/// Progress bar counting artifacts through a batch operation
pub struct ArtifactProgress {
  progress: Progress,
  bar: Bar,
}

impl ArtifactProgress {
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Mark one artifact as done
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
