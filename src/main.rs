mod config;
mod error;
mod invoice;
mod pdf;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use crate::config::{config_dir, load_config, CONFIG_TEMPLATE, INVOICE_TEMPLATE};
use crate::error::{InvoiceError, Result};
use crate::invoice::numeric::{format_currency, format_grouped_int};
use crate::invoice::{derive_payments, format_payment_date, generate_invoice, prepare_invoice};

#[derive(Parser)]
#[command(name = "ashi-invoice")]
#[command(version, about = "Ashi Studio invoice generator", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.ashi-invoice)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Render an invoice input file to PDF
    Generate {
        /// Invoice input file (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        input: PathBuf,

        /// Custom output file path (default: output_dir/<prefix><number>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },

    /// Check an invoice input file without rendering it
    Validate {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show items, totals and the resolved payment schedule
    Summary {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Generate {
            input,
            output,
            open,
        } => cmd_generate(&cfg_dir, &input, output, open),
        Commands::Validate { input } => cmd_validate(&cfg_dir, &input),
        Commands::Summary { input } => cmd_summary(&cfg_dir, &input),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(InvoiceError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("invoice.toml"), INVOICE_TEMPLATE)?;

    println!("Initialized invoice config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Check the letterhead and assets:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Fill in an invoice:               $EDITOR {}/invoice.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then render it:");
    println!(
        "  ashi-invoice generate --input {}/invoice.toml",
        cfg_dir.display()
    );

    Ok(())
}

fn ensure_initialized(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(InvoiceError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    Ok(())
}

fn cmd_generate(cfg_dir: &Path, input: &Path, output: Option<PathBuf>, open: bool) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let pdf_path = generate_invoice(cfg_dir, input, output)?;
    if open {
        open_path(&pdf_path)?;
    }
    Ok(())
}

fn cmd_validate(cfg_dir: &Path, input: &Path) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let data = prepare_invoice(&config, input)?;
    println!(
        "Invoice {} is valid ({} item(s), {} payment(s))",
        data.number,
        data.items.len(),
        data.payments.len()
    );
    Ok(())
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "TOTAL PRICE")]
    price: String,
    #[tabled(rename = "TO BE PAID")]
    paid: String,
}

#[derive(Tabled)]
struct PaymentRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "PAYMENT")]
    name: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "PERCENTAGE")]
    percentage: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

fn cmd_summary(cfg_dir: &Path, input: &Path) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let mut data = prepare_invoice(&config, input)?;
    let base_price = data.base_price();
    derive_payments(&mut data.payments, base_price)?;

    let symbol = &config.invoice.currency_symbol;
    let totals = data.totals();

    println!("Invoice {}  ({})", data.number, data.formatted_date());
    println!("Client:  {}", data.client.name);
    println!();

    let rows: Vec<ItemRow> = data
        .items
        .iter()
        .map(|item| ItemRow {
            description: item.description.clone(),
            price: format_currency(item.price, symbol),
            paid: format_currency(item.paid, symbol),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    println!("  Total price:  {}", format_currency(totals.sum_price, symbol));
    println!("  To be paid:   {}", format_currency(totals.sum_paid, symbol));
    println!("  VAT:          {}", format_currency(totals.vat, symbol));
    println!("  Final total:  {}", format_currency(totals.final_total, symbol));
    println!();

    let rows: Vec<PaymentRow> = data
        .payments
        .iter()
        .enumerate()
        .map(|(i, p)| PaymentRow {
            index: i + 1,
            name: p.name.map(|n| n.to_string()).unwrap_or_else(|| "N/A".to_string()),
            date: format_payment_date(p.date),
            percentage: format!("{}%", format_grouped_int(p.percentage)),
            amount: format_currency(p.amount, symbol),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    Ok(())
}

fn open_path(pdf_path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(pdf_path)
            .spawn()
            .map_err(InvoiceError::Io)?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(pdf_path)
            .spawn()
            .map_err(InvoiceError::Io)?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(pdf_path)
            .spawn()
            .map_err(InvoiceError::Io)?;
    }
    Ok(())
}
