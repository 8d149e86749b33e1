//! Command-line interface for `cascader-gen`.
//!
//! Three subcommands:
//!
//! - `compile`: scaffold (for directory input), load, walk, emit.
//! - `inspect`: print the compiled route table with stage tags.
//! - `scaffold`: run only the idempotent scaffold pass.

mod commands;

pub use commands::{run_cli, Cli, Commands, ParamStyleArg};
