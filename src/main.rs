use anyhow::Result;
use clap::Parser;
use declextract::{cli::Cli, pipeline, DeclExtractError};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let Some(config) = args.pipeline_config() else {
        anyhow::bail!("path to kernel directory is required");
    };

    match pipeline::run(&config) {
        Ok(()) => Ok(()),
        Err(err) => {
            if let DeclExtractError::Parse { text, .. } = &err {
                // Echo the unparsable declarations for diagnosis
                println!("{}", text);
            }
            Err(anyhow::Error::new(err)
                .context(format!("Failed to generate {}", config.output.display())))
        }
    }
}
