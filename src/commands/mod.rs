//! CLI command implementations.

pub mod check;
pub mod resolve;
pub mod tracked;

pub use check::CheckCommand;
pub use resolve::ResolveCommand;
pub use tracked::TrackedCommand;
