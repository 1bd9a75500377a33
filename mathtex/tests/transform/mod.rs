//! Content transformer tests
//!
//! Stored markup into the editor (import) and back out (export).

mod export;
mod import;
