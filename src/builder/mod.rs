//! Builder API for transition tables.
//!
//! Tables are declared row by row with fluent builders. Validation happens
//! at build time so the engine can assume every row is well formed.

pub mod error;
pub mod table;
pub mod transition;

pub use error::BuildError;
pub use table::TableBuilder;
pub use transition::TransitionBuilder;
