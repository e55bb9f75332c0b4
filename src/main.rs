//! # docket CLI
//!
//! ```bash
//! # Lay out an invoice from JSON
//! docket invoice data.json -o invoice.pdf --config export.json
//!
//! # Slice an already-captured bitmap onto pages
//! docket image screenshot.png -o report.pdf --margin-mm 12
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use docket::{
    BitmapHost, DEFAULT_INVOICE_FILE_NAME, DEFAULT_REGION_FILE_NAME, DirectorySink, ExportConfig,
    ExportError, Invoice, RegionRef, export_invoice_to_file, export_region_to_file,
};

/// docket - export invoices and captured regions to PDF
#[derive(Parser, Debug)]
#[command(name = "docket")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render an invoice record to PDF
    Invoice {
        /// Invoice data as JSON
        data: PathBuf,

        /// Output file (defaults to ./invoice.pdf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Export configuration as JSON
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Slice a captured bitmap onto pages
    Image {
        /// PNG bitmap
        bitmap: PathBuf,

        /// Output file (defaults to ./document.pdf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page margin in millimetres
        #[arg(long)]
        margin_mm: Option<f32>,

        /// Export configuration as JSON
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ExportError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Invoice { data, output, config } => {
            let config = load_config(config.as_deref())?;
            let invoice: Invoice = serde_json::from_str(&tokio::fs::read_to_string(&data).await?)?;
            let (sink, file_name) = split_output(output.as_deref(), DEFAULT_INVOICE_FILE_NAME)?;

            let saved = export_invoice_to_file(&invoice, Some(&file_name), &config, &sink).await?;
            println!("Saved {}", sink.dir().join(saved).display());
        }
        Commands::Image { bitmap, output, margin_mm, config } => {
            let config = load_config(config.as_deref())?;
            let mut options = config.region_options();
            if let Some(margin_mm) = margin_mm {
                options.margin_mm = margin_mm;
            }

            let image = image::open(&bitmap)?.to_rgba8();
            let mut host = BitmapHost::new();
            host.insert("bitmap", image);
            let (sink, file_name) = split_output(output.as_deref(), DEFAULT_REGION_FILE_NAME)?;

            let saved = export_region_to_file(
                &mut host,
                &RegionRef::from("bitmap"),
                Some(&file_name),
                &options,
                &sink,
            )
            .await?;
            println!("Saved {}", sink.dir().join(saved).display());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ExportConfig, ExportError> {
    match path {
        Some(path) => ExportConfig::from_file(path),
        None => Ok(ExportConfig::default()),
    }
}

/// Splits an output path into the sink directory and the file name.
fn split_output(
    output: Option<&Path>,
    default_name: &str,
) -> Result<(DirectorySink, String), ExportError> {
    let Some(output) = output else {
        return Ok((DirectorySink::new("."), default_name.to_string()));
    };
    let file_name = output
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ExportError::Config(format!("'{}' is not a file path", output.display())))?;
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((DirectorySink::new(dir), file_name.to_string()))
}
