//! Architecture syscall table reader
//!
//! Builds the rename table: kernel entry point (e.g. `setuid16`) to the set
//! of syscall names that architectures expose for it (e.g. `setuid`). The
//! data comes from the `*.tbl` files under each architecture's header
//! directory, whose lines look like:
//!
//! ```text
//! # <number> <abi> <name> <entry point> [<compat entry point>]
//! 105	common	setuid			sys_setuid
//! ```

use crate::error::{DeclExtractError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use walkdir::WalkDir;

/// Kernel `arch/` subdirectories of the supported Linux targets
pub const ARCH_HEADER_DIRS: &[&str] = &["x86", "arm64", "arm", "mips", "powerpc", "riscv", "s390"];

const TABLE_EXTENSION: &str = "tbl";
const ENTRY_PREFIX: &str = "sys_";

/// Entry point to sorted, deduplicated syscall names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameTable {
    names: HashMap<String, Vec<String>>,
}

impl RenameTable {
    /// Scan `<kernel_dir>/arch/<arch>` for every supported architecture
    pub fn from_kernel_dir<P: AsRef<Path>>(kernel_dir: P) -> Result<Self> {
        let arch_dir = kernel_dir.as_ref().join("arch");
        let mut table = Self::default();
        for arch in ARCH_HEADER_DIRS {
            table.scan_dir(&arch_dir.join(arch))?;
        }
        table.finalize();
        tracing::info!("Rename table holds {} entry points", table.len());
        Ok(table)
    }

    /// Read every non-symlinked `.tbl` file below `dir`
    fn scan_dir(&mut self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            tracing::debug!("Skipping missing architecture directory {}", dir.display());
            return Ok(());
        }

        for entry in WalkDir::new(dir).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                // Unreadable parts of the tree only matter when they are tables
                Err(e) if !e.path().is_some_and(is_table) => {
                    tracing::debug!("Ignoring walk error below {}: {}", dir.display(), e);
                    continue;
                }
                Err(e) => {
                    return Err(DeclExtractError::TableIo {
                        path: e.path().unwrap_or(dir).to_path_buf(),
                        source: e.into(),
                    })
                }
            };
            let path = entry.path();
            if !is_table(path) {
                continue;
            }
            // Some tables are symlinks to files outside the architecture directory
            if entry.path_is_symlink() {
                tracing::debug!("Skipping symlinked table {}", path.display());
                continue;
            }
            self.read_table(path)?;
        }
        Ok(())
    }

    fn read_table(&mut self, path: &Path) -> Result<()> {
        let table_error = |source| DeclExtractError::TableIo {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(table_error)?;
        for line in BufReader::new(file).lines() {
            self.add_line(&line.map_err(table_error)?);
        }
        tracing::debug!("Read syscall table {}", path.display());
        Ok(())
    }

    /// Record one table line, ignoring lines that name no usable entry point
    pub fn add_line(&mut self, line: &str) {
        if let Some((entry, name)) = parse_line(line) {
            self.names
                .entry(entry.to_string())
                .or_default()
                .push(name.to_string());
        }
    }

    /// Sort and deduplicate every name set
    pub fn finalize(&mut self) {
        for names in self.names.values_mut() {
            names.sort();
            names.dedup();
        }
    }

    /// Names an entry point is exposed under, if any architecture exposes it
    pub fn lookup(&self, entry: &str) -> Option<&[String]> {
        self.names.get(entry).map(Vec::as_slice)
    }

    /// Number of distinct entry points
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for RenameTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (entry, name) in iter {
            table
                .names
                .entry(entry.to_string())
                .or_default()
                .push(name.to_string());
        }
        table.finalize();
        table
    }
}

fn is_table(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(TABLE_EXTENSION)
}

/// Extract `(entry point, syscall name)` from a table line
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 || fields[0].starts_with('#') {
        return None;
    }
    let (name, entry) = (fields[2], fields[3]);
    // 32-bit compat entry points conflict with their 64-bit counterparts
    if name.starts_with("unused")
        || entry == "-"
        || entry.starts_with("compat")
        || entry.starts_with("sys_ia32")
        || entry == "sys_ni_syscall"
    {
        return None;
    }
    Some((entry.strip_prefix(ENTRY_PREFIX).unwrap_or(entry), name))
}
