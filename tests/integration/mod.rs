//! Integration tests for pack-rail
//!
//! Each test builds a throwaway git repository and runs the real binary in it.

mod helpers;
mod test_gating;
mod test_pipeline;
mod test_plan;
