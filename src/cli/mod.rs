//! CLI command handling

pub mod check;
pub mod hook;
pub mod output;

pub use check::*;
pub use hook::*;
pub use output::*;
