use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use proposal_pdf::{ProposalAssets, ProposalRecord, generate_to_file};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate an investment proposal PDF from a JSON record")]
struct Args {
    /// Path to the proposal record (JSON, camelCase fields)
    proposal: PathBuf,

    /// Output PDF path
    #[arg(short, long, default_value = "proposal.pdf")]
    output: PathBuf,

    /// Full-page cover art (PNG or JPEG)
    #[arg(long)]
    cover: Option<PathBuf>,

    /// Header logo placed top-right on every content page
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Signature image for the closing block
    #[arg(long)]
    signature: Option<PathBuf>,
}

/// A missing or unreadable image file is a warning, not a failure; the
/// document falls back to its text-only variants.
fn read_optional_image(path: Option<&PathBuf>, role: &str) -> Option<Vec<u8>> {
    let path = path?;
    match std::fs::read(path) {
        Ok(data) => Some(data),
        Err(e) => {
            log::warn!("could not read {role} image {}: {e}", path.display());
            None
        }
    }
}

fn run(args: &Args) -> Result<usize, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&args.proposal)?;
    let record: ProposalRecord = serde_json::from_str(&raw)?;

    let assets = ProposalAssets {
        cover: read_optional_image(args.cover.as_ref(), "cover"),
        logo: read_optional_image(args.logo.as_ref(), "logo"),
        signature: read_optional_image(args.signature.as_ref(), "signature"),
    };

    let page_count = generate_to_file(&record, &assets, &args.output)?;
    Ok(page_count)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(page_count) => {
            println!("{} ({page_count} pages)", args.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
