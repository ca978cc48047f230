//! Compilation database loading
//!
//! Reads the `compile_commands.json` list that records how every translation
//! unit of the kernel build was compiled. No filtering happens here; the
//! dispatcher decides which files are worth analyzing.

use crate::error::{DeclExtractError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One translation unit of the build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    /// Compiler invocation, when recorded as an argument list
    #[serde(default)]
    pub arguments: Vec<String>,

    /// Working directory of the compiler invocation
    pub directory: String,

    /// Source file that was compiled
    pub file: String,

    /// Object file that was produced
    #[serde(default)]
    pub output: String,
}

/// Load all compile commands from a JSON compilation database
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<CompileCommand>> {
    let path = path.as_ref();
    let config_error = |reason: String| DeclExtractError::Config {
        path: path.to_path_buf(),
        reason,
    };

    let contents = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
    let commands: Vec<CompileCommand> =
        serde_json::from_str(&contents).map_err(|e| config_error(e.to_string()))?;

    tracing::info!(
        "Loaded {} compile commands from {}",
        commands.len(),
        path.display()
    );
    Ok(commands)
}
