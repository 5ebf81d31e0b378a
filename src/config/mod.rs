//! Configuration documents: YAML parsing and include-tree merging.
//!
//! A run starts from one or more top-level documents. Each document may
//! declare `includes`, whose actions are folded into a single accumulated
//! configuration with last-writer-wins semantics per action name. Source
//! and destination paths are rebased against the directory of the document
//! that declared them during the merge.
pub mod document;
pub mod merge;

pub use document::{ConfigDocument, ConfigWrapper, FileAction, PackageAction, load};
pub use merge::Merger;
