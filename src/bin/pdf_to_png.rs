//! Converte cada página de um PDF em um arquivo PNG (`page_0.png`, `page_1.png`, ...)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use iracema::export::export_pages;
use iracema::page_source::PageSource;
use iracema::pdf_processor::PdfProcessor;

#[derive(Parser, Debug)]
#[command(name = "pdf_to_png", about = "Salva as páginas de um PDF como imagens PNG")]
struct Args {
    /// PDF de entrada
    input: PathBuf,

    /// Diretório de saída
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Ampliação (1.0 = 72 dpi)
    #[arg(short, long, default_value_t = 1.0)]
    zoom: f32,
}

/// Zoom aceito: finito e positivo
fn valid_zoom(zoom: f32) -> bool {
    zoom.is_finite() && zoom > 0.0
}

fn main() -> Result<()> {
    let args = Args::parse();

    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    if !valid_zoom(args.zoom) {
        anyhow::bail!("O zoom deve ser um número positivo (recebido {})", args.zoom);
    }

    let processor = PdfProcessor::new()?;
    let book = processor
        .open_book(&args.input)
        .with_context(|| format!("Falha ao abrir {}", args.input.display()))?;

    info!("Convertendo {} páginas de {}", book.page_count(), args.input.display());
    let written = export_pages(&book, &args.out_dir, args.zoom)?;
    info!("✓ {} imagens salvas em {}", written.len(), args.out_dir.display());

    Ok(())
}
