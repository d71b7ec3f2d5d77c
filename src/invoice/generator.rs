use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{load_config, resolve_path, Config};
use crate::error::Result;
use crate::invoice::numeric::format_currency;
use crate::invoice::{load_invoice_input, validate_invoice, InvoiceData};
use crate::pdf::{render_invoice, Assets};

/// Load and validate an invoice input file against the loaded config.
pub fn prepare_invoice(config: &Config, input_path: &Path) -> Result<InvoiceData> {
    let data = load_invoice_input(input_path)?.into_data();
    validate_invoice(&data, &config.invoice.currency_symbol)?;
    Ok(data)
}

/// Generate an invoice PDF from an input file. Returns where it was saved.
pub fn generate_invoice(
    cfg_dir: &Path,
    input_path: &Path,
    output_path: Option<PathBuf>,
) -> Result<PathBuf> {
    let config = load_config(cfg_dir)?;
    let mut data = prepare_invoice(&config, input_path)?;

    // Assets load before rendering so a bad font aborts without output.
    let assets = Assets::load(&config.assets, cfg_dir)?;
    let rendered = render_invoice(&mut data, &config, &assets)?;

    let pdf_path = match output_path {
        Some(path) => path,
        None => {
            let output_dir = resolve_path(&config.pdf.output_dir, cfg_dir);
            fs::create_dir_all(&output_dir)?;
            output_dir.join(&rendered.file_name)
        }
    };
    if let Some(parent) = pdf_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&pdf_path, &rendered.bytes)?;
    log::info!(
        "Wrote {} bytes of {} to {}",
        rendered.bytes.len(),
        rendered.mime_type,
        pdf_path.display()
    );

    let totals = data.totals();
    let symbol = &config.invoice.currency_symbol;
    println!("Generated invoice {}", data.number);
    println!("  Client: {}", data.client.name);
    println!("  Total:  {}", format_currency(totals.final_total, symbol));
    println!("  Saved:  {}", pdf_path.display());

    Ok(pdf_path)
}
