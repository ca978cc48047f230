//! Extraction dispatcher
//!
//! Runs the external analysis tool once per source file on a fixed pool of
//! worker threads. Work and results travel over two bounded channels sized
//! to the number of units, so neither the coordinator nor any worker blocks
//! on a full queue.

use crossbeam::channel::{self, Receiver};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use std::thread;

/// Only C translation units carry syscall definitions
const SOURCE_SUFFIX: &str = ".c";

/// Output of one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Description text emitted by the tool
    pub stdout: String,
    /// Failure text; non-empty means the run failed
    pub stderr: String,
}

impl ExtractionResult {
    pub fn failed(&self) -> bool {
        !self.stderr.is_empty()
    }
}

/// Produces declaration text for one source file
pub trait Extractor: Send + Sync {
    fn extract(&self, file: &str) -> ExtractionResult;
}

/// The external analysis binary, invoked as `<binary> -p <database> <file>`
#[derive(Debug, Clone)]
pub struct AnalysisTool {
    binary: PathBuf,
    compile_commands: PathBuf,
}

impl AnalysisTool {
    pub fn new(binary: impl Into<PathBuf>, compile_commands: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            compile_commands: compile_commands.into(),
        }
    }
}

impl Extractor for AnalysisTool {
    fn extract(&self, file: &str) -> ExtractionResult {
        tracing::debug!("Analyzing {}", file);
        let output = match Command::new(&self.binary)
            .arg("-p")
            .arg(&self.compile_commands)
            .arg(file)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                return ExtractionResult {
                    stdout: String::new(),
                    stderr: format!("{}: {}", self.binary.display(), e),
                }
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = if output.status.success() {
            String::new()
        } else if !output.stderr.is_empty() {
            String::from_utf8_lossy(&output.stderr).into_owned()
        } else {
            format!("{}: {}", file, output.status)
        };
        ExtractionResult { stdout, stderr }
    }
}

/// Start `workers` threads analyzing `files`
///
/// Returns the result channel; exactly one result arrives per file, in
/// completion order. Dropping the receiver makes idle workers exit once
/// their current invocation finishes.
pub fn dispatch<E>(
    extractor: Arc<E>,
    files: Vec<String>,
    workers: NonZeroUsize,
) -> Receiver<ExtractionResult>
where
    E: Extractor + 'static,
{
    let capacity = files.len().max(1);
    let (work_tx, work_rx) = channel::bounded::<String>(capacity);
    let (result_tx, result_rx) = channel::bounded::<ExtractionResult>(capacity);

    for _ in 0..workers.get() {
        let work_rx = work_rx.clone();
        let result_tx = result_tx.clone();
        let extractor = Arc::clone(&extractor);
        thread::spawn(move || {
            for file in work_rx {
                let result = if file.ends_with(SOURCE_SUFFIX) {
                    extractor.extract(&file)
                } else {
                    ExtractionResult::default()
                };
                if result_tx.send(result).is_err() {
                    // Coordinator gave up
                    break;
                }
            }
        });
    }

    tracing::info!("Dispatching {} files to {} workers", files.len(), workers);
    for file in files {
        // Capacity matches the file count, so this never blocks
        let _ = work_tx.send(file);
    }
    result_rx
}
