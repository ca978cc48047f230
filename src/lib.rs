//! declextract - merge per-file kernel declarations into one syscall description
//!
//! Runs an external declaration extraction tool over every translation unit
//! of a kernel build, renames the extracted syscalls after the names the
//! architecture syscall tables expose, merges everything into a sorted,
//! deduplicated set and adds a netlink dispatch union for policies no
//! observed call site reaches.

pub mod cli;
pub mod collector;
pub mod compile_db;
pub mod description;
pub mod dispatcher;
pub mod error;
pub mod merge;
pub mod netlink;
pub mod output;
pub mod pipeline;
pub mod rename;
pub mod syscall_table;

pub use error::{DeclExtractError, Result};
