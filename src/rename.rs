//! Syscall renaming
//!
//! The extraction tool names a syscall after its kernel entry point, which
//! is not always what the architecture tables call it: `SYSCALL_DEFINE1(setuid16, ...)`
//! is exposed as `setuid`. Each declaration is replaced by one copy per name
//! the rename table lists for its entry point.

use crate::description::Call;
use crate::syscall_table::RenameTable;

/// Netlink send primitive; its declarations are kept per policy
pub const SENDMSG: &str = "sendmsg";

/// Generic netlink family lookup pseudo-syscall
pub const GENETLINK_GET_FAMILY_ID: &str = "syz_genetlink_get_family_id";

/// Suffix marking automatically generated declarations
pub const AUTO_SUFFIX: &str = "$auto";

/// Entry points that are never renamed
pub fn is_exempt(call_name: &str) -> bool {
    matches!(call_name, SENDMSG | GENETLINK_GET_FAMILY_ID)
}

/// Names that are not available on every architecture
pub fn is_prohibited(name: &str) -> bool {
    matches!(name, "reboot" | "utimesat")
}

/// Expand one declaration into its architecture-visible variants
///
/// Returns nothing when no supported architecture exposes the entry point.
pub fn rename_syscall(syscall: Call, table: &RenameTable) -> Vec<Call> {
    if is_exempt(&syscall.call_name) {
        return vec![syscall];
    }
    let Some(names) = table.lookup(&syscall.call_name) else {
        tracing::debug!("Dropping {}: no syscall table entry", syscall.name);
        return Vec::new();
    };

    names
        .iter()
        .filter(|name| !is_prohibited(name))
        .map(|name| Call {
            name: format!("{}{}", name, AUTO_SUFFIX),
            // Set explicitly so later comparisons never see the old entry point
            call_name: name.clone(),
            ..syscall.clone()
        })
        .collect()
}

/// Rename every collected declaration
pub fn rename_all(syscalls: Vec<Call>, table: &RenameTable) -> Vec<Call> {
    let before = syscalls.len();
    let renamed: Vec<Call> = syscalls
        .into_iter()
        .flat_map(|call| rename_syscall(call, table))
        .collect();
    tracing::info!("Renamed {} syscall declarations into {}", before, renamed.len());
    renamed
}
