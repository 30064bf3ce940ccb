//! Unified error types for mkconfig using thiserror

use thiserror::Error;

/// Top-level error type for mkconfig operations
///
/// Every variant is a boundary failure (arguments, paths, I/O). Resolving a
/// configuration never fails: the rule pass is total over any symbol table.
#[derive(Error, Debug)]
pub enum MkconfigError {
    #[error("failed to build configuration file path: {0}")]
    Path(String),

    #[error("open {path} failed: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("code generation error: {0}")]
    Codegen(#[from] CodegenError),
}

impl MkconfigError {
    /// Process exit code reported for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            MkconfigError::Path(_) => 2,
            MkconfigError::Open { .. } => 3,
            MkconfigError::Io(_) => 3,
            MkconfigError::Codegen(_) => 3,
        }
    }
}

/// Code generation errors
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}
