//! `aep-cli`: command-line front end for the flow-service client.

pub mod cli;
pub mod commands;
pub mod output;

pub use cli::{Cli, Commands};
pub use commands::run;
