//! Morphology Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors while building or loading neurons
#[derive(Debug, Error)]
pub enum MorphologyError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed SWC line
    #[error("SWC parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Two nodes share an id
    #[error("Duplicate node id {0}")]
    DuplicateNode(i64),

    /// Node refers to a parent that is not in the skeleton
    #[error("Node {node} refers to unknown parent {parent}")]
    UnknownParent { node: i64, parent: i64 },

    /// Following parents from this node never reaches a root
    #[error("Cycle in skeleton through node {0}")]
    Cycle(i64),

    /// Directory holds no SWC files
    #[error("No SWC files found in {}", .0.display())]
    EmptyDirectory(PathBuf),
}
