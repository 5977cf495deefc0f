//! Sample library the pipeline builds, packs and publishes

/// Integer arithmetic
#[derive(Debug, Default, Clone, Copy)]
pub struct Calculator;

impl Calculator {
  pub fn new() -> Self {
    Self
  }

  /// Sum of `a` and `b`, wrapping on overflow
  pub fn add(&self, a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
  }
}
