//! Command handlers for CLI subcommands
//!
//! Each subcommand lives in its own module under `handlers/`.

mod completions;
mod config;
mod validate;

pub use completions::handle_completions;
pub use config::handle_config;
pub use validate::handle_validate;
