// Application layer: CLI command handlers on top of the client.

pub mod commands;

pub use commands::run_command;
