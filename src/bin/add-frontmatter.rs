use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use jobs_crm_assistant::frontmatter::{self, DEFAULT_FRONTMATTER, DEFAULT_TARGET, PatchOutcome};
use jobs_crm_assistant::logging::{self, LogFormat};

/// Prepend a frontmatter header to a rules document, once.
#[derive(Debug, Parser)]
#[command(name = "add-frontmatter", version)]
struct Cli {
    /// Document to patch
    #[arg(default_value = DEFAULT_TARGET)]
    path: PathBuf,

    /// Read the header block from this file instead of the built-in one
    #[arg(long)]
    header_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::setup_logging("info", LogFormat::Text)?;

    let header = match &cli.header_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read header file {}", path.display()))?,
        None => DEFAULT_FRONTMATTER.to_string(),
    };

    match frontmatter::patch_file(&cli.path, &header)? {
        PatchOutcome::Added {
            bytes_before,
            bytes_after,
        } => tracing::info!(bytes_before, bytes_after, "frontmatter added"),
        PatchOutcome::AlreadyPresent => tracing::info!("nothing to do"),
    }

    Ok(())
}
