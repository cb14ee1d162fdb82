//! CLI commands for runlens

pub mod analyze;
pub mod dispatch;
pub mod format;
pub mod gate;
pub mod pipeline;
pub mod trend;
pub mod validate;
