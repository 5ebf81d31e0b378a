//! Per-action execution units consumed by the executor.
pub mod file;

pub use file::FileActionHandler;
