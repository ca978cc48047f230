//! Netlink dispatch union synthesis
//!
//! Send declarations observed in the kernel cover only the policies some
//! call site actually used. Every other collected policy becomes one arm of
//! `auto_union`, reachable through `sendmsg$autorun`.

use crate::description::{self, Call, Description, Struct};
use crate::error::Result;
use crate::merge::{is_sendmsg, policy_of};
use std::collections::HashSet;

/// Policies referenced by send declarations, and the declarations worth keeping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetlinkUsage {
    /// Syscalls minus send declarations whose policy was never collected
    pub syscalls: Vec<Call>,
    /// Every policy name a send declaration referenced
    pub used: HashSet<String>,
}

/// Record used policies and drop send declarations with dangling policies
///
/// `netlinks` must be sorted by name.
pub fn resolve_usage(syscalls: Vec<Call>, netlinks: &[Struct]) -> NetlinkUsage {
    let mut used = HashSet::new();
    let mut kept = Vec::with_capacity(syscalls.len());
    for call in syscalls {
        if is_sendmsg(&call) {
            if let Some(policy) = policy_of(&call) {
                used.insert(policy.to_string());
                let defined = netlinks
                    .binary_search_by(|s| s.name.as_str().cmp(policy))
                    .is_ok();
                if !defined {
                    tracing::warn!("Dropping {}: policy {} is not defined", call.name, policy);
                    continue;
                }
            }
        }
        kept.push(call);
    }
    NetlinkUsage {
        syscalls: kept,
        used,
    }
}

/// Build the dispatch union over every policy not in `used`
pub fn synthesize_union(netlinks: &[Struct], used: &HashSet<String>) -> Result<Description> {
    let arms: String = netlinks
        .iter()
        .filter(|s| !used.contains(&s.name))
        .enumerate()
        .map(|(i, s)| format!("\tpolicy{} msghdr_auto[{}]\n", i, s.name))
        .collect();
    tracing::info!("Synthesized {} netlink union arms", arms.lines().count());

    let text = format!(
        "type msghdr_auto[POLICY] msghdr_netlink[netlink_msg_t[autogenerated_netlink, genlmsghdr, POLICY]]\n\
         resource autogenerated_netlink[int16]\n\
         syz_genetlink_get_family_id$auto(name ptr[in, string], fd sock_nl_generic) autogenerated_netlink\n\
         sendmsg$autorun(fd sock_nl_generic, msg ptr[in, auto_union], f flags[send_flags])\n\
         auto_union [\n{}]\n",
        arms
    );
    description::parse(&text)
}
