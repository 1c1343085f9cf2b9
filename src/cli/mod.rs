pub mod commands;
pub mod serve;
pub mod check;

pub use commands::{Cli, Commands};
