mod bank;
mod company;
mod terms;

pub use bank::{BankColumn, BankDetails, BankField};
pub use company::{AssetSettings, Company, Config, InvoiceSettings, PdfSettings};
pub use terms::Terms;

use crate::error::{InvoiceError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.ashi-invoice/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "ashi-invoice") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        InvoiceError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".ashi-invoice"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve a configured path: `~` is expanded, relative paths hang off the config dir.
pub fn resolve_path(path: &str, config_dir: &Path) -> PathBuf {
    let expanded = expand_path(path);
    if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(InvoiceError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| InvoiceError::ConfigParse { path, source: e })
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[company]
name = "ASHI STUDIO SAS"
address_lines = ["9 AVENUE HOCHE", "75008 PARIS, FRANCE"]
closing_line = "THANK YOU FOR CHOOSING ASHI STUDIO"
website = "WWW.ASHISTUDIO.COM"

[invoice]
currency_symbol = "€"
file_prefix = "ashi_invoice_"

[assets]
# Paths are relative to this directory. Without fonts the built-in
# Helvetica faces are used; a configured font that cannot be loaded
# is an error.
# regular_font = "BOOKOS.TTF"
# bold_font = "BOOKOSB.TTF"
logo = "ashi_logo.jpg"    # skipped with a warning when missing

[pdf]
output_dir = "output"
compress = true

# Bank details and terms default to the built-in business constants.
# Override them with [bank] / [[bank.columns]] and [terms] tables.
"#;

/// Template content for a sample invoice input
pub const INVOICE_TEMPLATE: &str = r#"# Numbers may be written with thousands separators ("12,300").
# Anything that is not a number counts as 0.

invoice_number = "369/2025"
# invoice_date = "2025-03-01"   # defaults to today
vat = "0"

[client]
name = "Pr Noura Abdullah Faisal"
country = "Kuwait"
phone = "+965 1234 5678"

[[items]]
description = "Item 1"
price = "6,000"
paid = "3,000"

[[items]]
description = "Item 2"
price = "4,000"
paid = "2,000"

# Payment names: "down payment", "fitting payment", "closing payment", "full payment".
# Give either a percentage or an amount; the other one is derived.
[[payments]]
name = "down payment"
date = "2025-03-01"
percentage = "50"

[[payments]]
name = "fitting payment"
percentage = "30"

[[payments]]
name = "closing payment"
percentage = "20"
"#;
