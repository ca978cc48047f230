//! Assembly and serialization of the generated description file

use crate::collector::Declarations;
use crate::description::{self, Description, Node};
use crate::error::{DeclExtractError, Result};
use crate::netlink;
use std::fs;
use std::path::Path;

const AUTO_GENERATED_NOTICE: &str = "# Code generated by syz-declextract. DO NOT EDIT.\n";

const COMMON_KERNEL_HEADERS: &str = "include <include/vdso/bits.h>\ninclude <include/linux/types.h>\n";

/// Syscall number referenced by some architectures but defined by none of the sources
const MMAP2_COMPAT: &str = "_ = __NR_mmap2\n";

/// Build the final description from merged declarations
///
/// Order: notice, common headers, includes, resources, types, syscalls,
/// compatibility declaration, netlink policies, dispatch union.
pub fn assemble(merged: Declarations) -> Result<Description> {
    let Declarations {
        syscalls,
        netlinks,
        includes,
        type_defs,
        resources,
    } = merged;

    let usage = netlink::resolve_usage(syscalls, &netlinks);
    let union = netlink::synthesize_union(&netlinks, &usage.used)?;

    let mut desc =
        description::parse(&format!("{}{}", AUTO_GENERATED_NOTICE, COMMON_KERNEL_HEADERS))?;
    desc.nodes.extend(includes.into_iter().map(Node::Include));
    desc.nodes.extend(resources.into_iter().map(Node::Resource));
    desc.nodes.extend(type_defs.into_iter().map(Node::TypeDef));
    desc.nodes.extend(usage.syscalls.into_iter().map(Node::Call));
    desc.nodes.extend(description::parse(MMAP2_COMPAT)?.nodes);
    desc.nodes.extend(netlinks.into_iter().map(Node::Struct));
    desc.nodes.extend(union.nodes);
    Ok(desc)
}

/// Serialize to the canonical text form
///
/// Formatting inserts blank lines that only appear as nodes after a
/// re-parse, so the text is formatted, parsed and formatted again.
pub fn render(desc: &Description) -> Result<String> {
    let first = description::format(desc);
    Ok(description::format(&description::parse(&first)?))
}

/// Write the rendered description to `path`
pub fn write<P: AsRef<Path>>(path: P, text: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, text).map_err(|source| DeclExtractError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}
