//! End-to-end pipeline: catalog, table, dispatch, collect, rename, merge,
//! synthesize, assemble, write
//!
//! The coordinator drains results on the calling thread and is the only
//! owner of the collected declarations. Any error stops the run before
//! the output file is touched.

use crate::collector::Declarations;
use crate::compile_db::{self, CompileCommand};
use crate::dispatcher::{self, AnalysisTool, Extractor};
use crate::error::{DeclExtractError, Result};
use crate::merge;
use crate::output;
use crate::rename;
use crate::syscall_table::RenameTable;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a run needs, resolved from the command line
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub compile_commands: PathBuf,
    pub binary: PathBuf,
    pub output: PathBuf,
    pub kernel_dir: PathBuf,
    /// Worker threads running the analysis tool
    pub jobs: NonZeroUsize,
}

/// Run the whole pipeline and write the description file
pub fn run(config: &PipelineConfig) -> Result<()> {
    let units = compile_db::load(&config.compile_commands)?;
    // Built before any worker starts; read-only afterwards
    let table = RenameTable::from_kernel_dir(&config.kernel_dir)?;
    let tool = Arc::new(AnalysisTool::new(&config.binary, &config.compile_commands));

    let text = generate(&units, tool, &table, config.jobs)?;
    output::write(&config.output, &text)
}

/// Produce the description text for `units` using `extractor`
pub fn generate<E>(
    units: &[CompileCommand],
    extractor: Arc<E>,
    table: &RenameTable,
    jobs: NonZeroUsize,
) -> Result<String>
where
    E: Extractor + 'static,
{
    let files: Vec<String> = units.iter().map(|u| u.file.clone()).collect();
    let results = dispatcher::dispatch(extractor, files, jobs);

    let mut decls = Declarations::new();
    for _ in units {
        let result = results.recv().map_err(|_| {
            DeclExtractError::Subprocess("extraction workers exited early".to_string())
        })?;
        decls.collect(result)?;
    }
    tracing::info!("Collected {} declarations from {} units", decls.len(), units.len());

    decls.syscalls = rename::rename_all(std::mem::take(&mut decls.syscalls), table);
    let merged = merge::merge(decls);
    let desc = output::assemble(merged)?;
    output::render(&desc)
}
