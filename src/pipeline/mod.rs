//! Target model, planning and execution
//!
//! - **target**: The closed set of targets and their declarations
//! - **graph**: petgraph DAG and deterministic ordering
//! - **plan**: Gate and requirement evaluation before anything runs
//! - **runner**: Sequential execution with a summary report

pub mod graph;
pub mod plan;
pub mod runner;
pub mod target;

pub use plan::ExecutionPlan;
pub use runner::execute;
pub use target::Target;
