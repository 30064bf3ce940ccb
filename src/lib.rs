//! mkconfig - NuttX configuration header generator, Rust implementation
//!
//! Reads a line-oriented `.config` symbol file, resolves it into an
//! internally consistent configuration through an ordered rule catalogue,
//! and renders the result as a C header.

pub mod codegen;
pub mod engine;
pub mod error;
pub mod loader;
pub mod symbols;

// Re-export main types
pub use codegen::generate_header;
pub use engine::{resolve, Rule, CATALOGUE};
pub use error::{CodegenError, MkconfigError};
pub use loader::{config_file_path, load_config, parse_config, DEFCONFIG};
pub use symbols::{ConfigTable, SymbolState, Value};
