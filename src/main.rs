use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use eventdocx::{EventRecord, ImageResource, ReportImages};

#[derive(Parser)]
#[command(name = "eventdocx", about = "Generate an event-report DOCX from a JSON record")]
struct Args {
    /// Record JSON (event fields plus image path lists)
    record: PathBuf,
    /// Base template DOCX
    #[arg(long, default_value = "workshop_template.docx")]
    template: PathBuf,
    /// Directory the report is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Deserialize)]
struct RecordFile {
    #[serde(flatten)]
    record: EventRecord,
    #[serde(default)]
    images: ImageManifest,
}

#[derive(Deserialize, Default)]
struct ImageManifest {
    invite: Option<PathBuf>,
    #[serde(default)]
    action: Vec<PathBuf>,
    #[serde(default)]
    attendance: Vec<PathBuf>,
    #[serde(default)]
    analysis: Vec<PathBuf>,
}

fn load_resource(path: &Path) -> std::io::Result<ImageResource> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ImageResource {
        name,
        data: std::fs::read(path)?,
    })
}

fn load_resources(paths: &[PathBuf]) -> std::io::Result<Vec<ImageResource>> {
    paths.iter().map(|p| load_resource(p)).collect()
}

fn run(args: &Args) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let manifest = std::fs::read_to_string(&args.record)?;
    let RecordFile { record, images } = serde_json::from_str(&manifest)?;

    let images = ReportImages {
        invite: images.invite.as_deref().map(load_resource).transpose()?,
        action: load_resources(&images.action)?,
        attendance: load_resources(&images.attendance)?,
        analysis: load_resources(&images.analysis)?,
    };

    let report = eventdocx::generate_report(&args.template, &record, &images)?;
    for warning in &report.warnings {
        eprintln!("Warning: {warning}");
    }
    Ok(eventdocx::write_report(&report, &args.out_dir)?)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if !args.record.is_file() {
        eprintln!("Error: record not found: {}", args.record.display());
        std::process::exit(1);
    }
    if !args.template.is_file() {
        eprintln!("Error: template not found: {}", args.template.display());
        std::process::exit(1);
    }

    match run(&args) {
        Ok(path) => println!("{}", path.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
