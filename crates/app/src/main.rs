use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

const ANNOTATIONS_HELP: &str = "\
The annotations CSV (a VGG Image Annotator export works as-is) must have:
  region_shape_attributes  JSON object with integer 'x', 'y', 'width', 'height'
  region_attributes        JSON object with 'type' and 'label'
Other columns are ignored.

Region types:
  text, num   OCR as a block of text; blank results become 'no text detected'
  checkbox    'yes' if an X mark is recognized, else 'no'
  image       skipped, no output row
  anything    else 'unrecognized region type'

The output CSV has two columns, Label and Content, one row per region in
annotation order.

Example:
  formscan image.png annotations.csv output.csv";

/// Extract text and checkbox states from annotated regions of a scanned form.
#[derive(Parser, Debug)]
#[command(name = "formscan", version)]
#[command(after_long_help = ANNOTATIONS_HELP)]
pub struct Args {
    #[arg(help = "Scanned form image (PNG or any format the decoder supports)")]
    pub image: PathBuf,

    #[arg(help = "Annotations CSV with region_shape_attributes and region_attributes")]
    pub annotations: PathBuf,

    #[arg(help = "Where to write the Label,Content CSV (overwritten)")]
    pub output: PathBuf,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Skip malformed or out-of-bounds rows instead of aborting")]
    pub skip_invalid_rows: bool,

    #[arg(long, value_name = "DIR", help = "Tesseract data directory")]
    pub tessdata: Option<String>,

    #[arg(long, value_name = "LANG", help = "Tesseract language [default: eng]")]
    pub lang: Option<String>,
}

fn main() -> ExitCode {
    // A bare invocation is a request for usage, not an error.
    if std::env::args_os().len() <= 1 {
        if Args::command().print_long_help().is_err() {
            return ExitCode::FAILURE;
        }
        println!();
        return ExitCode::SUCCESS;
    }

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match commands::extract(&args) {
        Ok(summary) => {
            tracing::info!(
                records = summary.records,
                skipped = summary.skipped,
                "Extraction complete"
            );
            println!("Output saved to {}", args.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
