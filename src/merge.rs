//! Deterministic merging of declarations from all translation units
//!
//! Every bucket is sorted by a kind-specific key with a structural
//! tie-break, so the result does not depend on the order in which files
//! were listed or workers finished.

use crate::collector::Declarations;
use crate::description::{Call, Include, Resource, Struct, TypeDef};
use crate::rename::SENDMSG;
use std::cmp::Ordering;

/// Policy named by a send declaration's message argument
///
/// Matches `sendmsg$x(fd sock, msg ptr[in, msghdr_x[CMD, POLICY]], f flags)`.
pub fn policy_of(call: &Call) -> Option<&str> {
    let msg = &call.args.get(1)?.ty;
    if msg.args.len() != 2 {
        return None;
    }
    Some(msg.args[1].args.get(1)?.value.as_str())
}

/// Whether a declaration is a netlink send variant
pub fn is_sendmsg(call: &Call) -> bool {
    call.call_name == SENDMSG
}

fn compare_syscalls(a: &Call, b: &Call) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| {
            if is_sendmsg(a) {
                policy_of(a).cmp(&policy_of(b))
            } else {
                // Same name with different parameter names: keep the same one every run
                let a_names = a.args.iter().map(|f| &f.name);
                let b_names = b.args.iter().map(|f| &f.name);
                a_names.cmp(b_names)
            }
        })
        .then_with(|| a.cmp(b))
}

/// Sort, number send variants, then deduplicate by exposed name
///
/// Only names are compared when deduplicating, so declarations of the same
/// syscall with different parameter names collapse to the first one.
pub fn merge_syscalls(mut syscalls: Vec<Call>) -> Vec<Call> {
    syscalls.sort_by(compare_syscalls);

    // One send declaration per policy; the suffix keeps dedup from collapsing them
    let mut sendmsg_no = 0usize;
    for call in syscalls.iter_mut().filter(|c| is_sendmsg(c)) {
        call.name.push_str(&sendmsg_no.to_string());
        sendmsg_no += 1;
    }

    syscalls.dedup_by(|a, b| a.name == b.name);
    syscalls
}

/// Sort by path and drop repeated includes
pub fn merge_includes(mut includes: Vec<Include>) -> Vec<Include> {
    includes.sort_by(|a, b| a.file.cmp(&b.file));
    includes.dedup_by(|a, b| a.file == b.file);
    includes
}

pub fn merge_netlinks(mut netlinks: Vec<Struct>) -> Vec<Struct> {
    netlinks.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.cmp(b)));
    netlinks
}

pub fn merge_resources(mut resources: Vec<Resource>) -> Vec<Resource> {
    resources.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.cmp(b)));
    resources
}

pub fn merge_type_defs(mut type_defs: Vec<TypeDef>) -> Vec<TypeDef> {
    type_defs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.cmp(b)));
    type_defs
}

/// Merge every bucket
pub fn merge(decls: Declarations) -> Declarations {
    let merged = Declarations {
        syscalls: merge_syscalls(decls.syscalls),
        netlinks: merge_netlinks(decls.netlinks),
        includes: merge_includes(decls.includes),
        type_defs: merge_type_defs(decls.type_defs),
        resources: merge_resources(decls.resources),
    };
    tracing::info!(
        "Merged: {} syscalls, {} netlink policies, {} includes, {} types, {} resources",
        merged.syscalls.len(),
        merged.netlinks.len(),
        merged.includes.len(),
        merged.type_defs.len(),
        merged.resources.len()
    );
    merged
}
