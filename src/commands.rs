//! Subcommand implementations for the `jb` binary.
pub mod generate;
