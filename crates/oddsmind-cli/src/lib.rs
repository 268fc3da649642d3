// Library interface for oddsmind-cli
// This allows integration tests to access internal modules

// commands.rs is also declared in main.rs, so reference the same source file
// through a path attribute.

#[path = "commands.rs"]
pub mod commands;

pub use commands::{run, Cli, Command};
