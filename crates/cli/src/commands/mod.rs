//! CLI subcommands.

pub mod deploy;
