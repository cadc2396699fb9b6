mod error;
mod fonts;
mod model;
mod pdf;
mod projection;
mod template;

pub use error::Error;
pub use model::{GeneratedDocument, ProposalAssets, ProposalRecord};
pub use projection::{ProjectionFigures, SHARE_PRICE};

use std::path::Path;
use std::time::Instant;

/// Build the proposal document for one validated record. Optional images
/// (cover art, logo, signature) degrade gracefully when absent or unreadable.
pub fn generate(
    record: &ProposalRecord,
    assets: &ProposalAssets,
) -> Result<GeneratedDocument, Error> {
    let t0 = Instant::now();

    record.validate()?;
    let figures = ProjectionFigures::compute(record);
    let blocks = template::build_blocks(record, &figures);
    let t_template = t0.elapsed();

    let (bytes, page_count) = pdf::render(record, &blocks, assets)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: template={:.1}ms, render={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_template.as_secs_f64() * 1000.0,
        (t_total - t_template).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        page_count,
        bytes.len(),
    );

    Ok(GeneratedDocument { bytes, page_count })
}

/// Convenience wrapper: generate and write to `output`, returning the page
/// count.
pub fn generate_to_file(
    record: &ProposalRecord,
    assets: &ProposalAssets,
    output: &Path,
) -> Result<usize, Error> {
    let doc = generate(record, assets)?;
    std::fs::write(output, &doc.bytes).map_err(Error::Io)?;
    Ok(doc.page_count)
}
