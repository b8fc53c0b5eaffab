//! Command implementations, one module per binary.

pub mod append;
pub mod extract;
pub mod update;
