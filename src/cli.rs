//! CLI argument parsing for declextract

use crate::pipeline::PipelineConfig;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "declextract")]
#[command(version)]
#[command(about = "Merge extracted kernel declarations into one syscall description", long_about = None)]
pub struct Cli {
    /// Path to the compilation database
    #[arg(long = "compile-commands", value_name = "PATH", default_value = "compile_commands.json")]
    pub compile_commands: PathBuf,

    /// Path to the declaration extraction binary
    #[arg(long = "binary", value_name = "PATH", default_value = "syz-declextract")]
    pub binary: PathBuf,

    /// Output description file
    #[arg(short = 'o', long = "output", value_name = "PATH", default_value = "out.txt")]
    pub output: PathBuf,

    /// Kernel source directory (required)
    #[arg(long = "kernel", value_name = "DIR")]
    pub kernel: Option<PathBuf>,

    /// Number of parallel extraction workers (default: number of CPUs)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<NonZeroUsize>,

    /// Enable debug tracing output on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Resolve the pipeline configuration, or `None` when no kernel directory was given
    pub fn pipeline_config(&self) -> Option<PipelineConfig> {
        Some(PipelineConfig {
            compile_commands: self.compile_commands.clone(),
            binary: self.binary.clone(),
            output: self.output.clone(),
            kernel_dir: self.kernel.clone()?,
            jobs: self
                .jobs
                .or_else(|| NonZeroUsize::new(num_cpus::get()))
                .unwrap_or(NonZeroUsize::MIN),
        })
    }
}
