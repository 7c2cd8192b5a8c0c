//! Development-environment config linker.
//!
//! Makes a fresh machine's dotfiles match the repository: every entry in
//! `conf/links.toml` either becomes a symlink from a path under `$HOME` to a
//! file or directory under `configs/`, or appends a line to an existing
//! shell profile. Entries are filtered by platform, pre-existing files are
//! moved into a timestamped backup directory instead of being overwritten,
//! and repeated runs change nothing.
//!
//! The public API is organised into three layers:
//!
//! - **[`config`]**: load the mapping file and resolve [`config::Settings`]
//! - **[`linker`]**: [`linker::link_all`] and the per-entry report it returns
//! - **[`commands`]**: top-level subcommand orchestration (`link`, `link-bin`, `ensure-path`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod linker;
pub mod logging;
pub mod platform;
