//! CLI command handling

pub mod actions;
pub mod list;
pub mod output;
pub mod route;

pub use actions::*;
pub use list::*;
pub use output::*;
pub use route::*;
