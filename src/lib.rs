pub mod docx;
mod error;
pub mod model;
pub mod report;

pub use error::Error;
pub use model::{
    EventRecord, EventType, ImageResource, ReportImages, Warning,
};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// MIME type of the produced artifact.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A finished assembly: the serialized DOCX, its canonical file name, and
/// any recoverable conditions collected along the way.
pub struct Report {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub warnings: Vec<Warning>,
}

/// One-shot transformation: template + validated record + attachments →
/// document bytes. Fatal errors abort before any bytes are produced.
pub fn generate_report(
    template: &Path,
    record: &EventRecord,
    images: &ReportImages,
) -> Result<Report, Error> {
    let pkg = docx::Package::load(template)?;
    build(pkg, record, images)
}

pub fn generate_report_bytes(
    template: &[u8],
    record: &EventRecord,
    images: &ReportImages,
) -> Result<Report, Error> {
    let pkg = docx::Package::load_bytes(template)?;
    build(pkg, record, images)
}

fn build(
    mut pkg: docx::Package,
    record: &EventRecord,
    images: &ReportImages,
) -> Result<Report, Error> {
    let t0 = Instant::now();

    for name in ["Heading 1", "Heading 2"] {
        docx::styles::ensure_style(
            &mut pkg,
            name,
            report::HEADING_STYLE_FONT,
            report::HEADING_STYLE_SIZE,
            report::HEADING_STYLE_COLOR,
        )?;
    }

    let mut warnings = Vec::new();
    let blocks = report::assemble(record, images, &mut warnings)?;
    let t_assemble = t0.elapsed();

    let body = pkg.render_blocks(&blocks)?;
    pkg.splice_body(&body)?;
    let bytes = pkg.save()?;
    let t_total = t0.elapsed();

    for warning in &warnings {
        log::warn!("{warning}");
    }
    log::info!(
        "Timing: assemble={:.1}ms, serialize={:.1}ms, total={:.1}ms (output {} bytes)",
        t_assemble.as_secs_f64() * 1000.0,
        (t_total - t_assemble).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(Report {
        bytes,
        filename: record.output_filename(),
        warnings,
    })
}

/// Write the report into `dir` under its canonical file name, going through
/// a temporary sibling so a failed write never leaves a half-written
/// artifact. A cleanup failure after a failed rename is logged as a
/// warning rather than masking the original error.
pub fn write_report(report: &Report, dir: &Path) -> Result<PathBuf, Error> {
    let path = dir.join(&report.filename);
    let tmp = dir.join(format!("{}.tmp", report.filename));

    std::fs::write(&tmp, &report.bytes).map_err(Error::Io)?;
    match std::fs::rename(&tmp, &path) {
        Ok(()) => Ok(path),
        Err(e) => {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                log::warn!(
                    "could not clean up temporary file {}: {cleanup}",
                    tmp.display()
                );
            }
            Err(Error::Io(e))
        }
    }
}
