use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use rentslip::{ChargeBreakdown, ExportConfig, Exporter, ReceiptDocument, ReceiptRecord};

/// Generate the monthly rent slip for a room and export it as an A4 PDF.
#[derive(Parser, Debug)]
#[command(
    name = "rentslip",
    version,
    about = "Monthly rent-slip generator for Rungsaeng Apartment"
)]
struct Args {
    /// Receipt record as JSON (camelCase keys, one room per file)
    record: PathBuf,

    /// Directory the PDF is written into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// TTF font with Thai coverage (falls back to RENTSLIP_FONT, then system fonts)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Print the slip preview without exporting
    #[arg(long)]
    preview_only: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let record = match load_record(&args.record) {
        Ok(record) => record,
        Err(err) => {
            eprintln!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    let breakdown = ChargeBreakdown::compute(&record);
    let document = rentslip::render(&record, &breakdown);
    println!("{}", document.to_text());

    if args.preview_only {
        return ExitCode::SUCCESS;
    }

    let config = ExportConfig {
        out_dir: args.out_dir,
        font_path: args.font,
        ..Default::default()
    };
    match export(document, config).await {
        Ok(path) => {
            println!("saved {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Full cause for the log, generic notice for the clerk.
            log::error!("export failed: {err}");
            eprintln!("เกิดข้อผิดพลาดในการสร้าง PDF");
            ExitCode::FAILURE
        }
    }
}

fn load_record(path: &Path) -> anyhow::Result<ReceiptRecord> {
    let data =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let record: ReceiptRecord =
        serde_json::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(record)
}

async fn export(document: ReceiptDocument, config: ExportConfig) -> rentslip::Result<PathBuf> {
    let exporter = Exporter::new(config).await?;
    let path = exporter.export(&document).await?;
    exporter.close().await?;
    Ok(path)
}
