use serde::{Deserialize, Serialize};

use super::bank::BankDetails;
use super::terms::Terms;

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub invoice: InvoiceSettings,
    #[serde(default)]
    pub assets: AssetSettings,
    #[serde(default)]
    pub pdf: PdfSettings,
    #[serde(default)]
    pub bank: BankDetails,
    #[serde(default)]
    pub terms: Terms,
}

/// Letterhead printed in the invoice header and footer.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Company {
    pub name: String,
    pub address_lines: Vec<String>,
    pub closing_line: String,
    pub website: String,
}

impl Default for Company {
    fn default() -> Self {
        Self {
            name: "ASHI STUDIO SAS".to_string(),
            address_lines: vec![
                "9 AVENUE HOCHE".to_string(),
                "75008 PARIS, FRANCE".to_string(),
            ],
            closing_line: "THANK YOU FOR CHOOSING ASHI STUDIO".to_string(),
            website: "WWW.ASHISTUDIO.COM".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InvoiceSettings {
    pub currency_symbol: String,
    /// Prepended to the sanitized invoice number to build the PDF file name.
    pub file_prefix: String,
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "€".to_string(),
            file_prefix: "ashi_invoice_".to_string(),
        }
    }
}

/// Paths are resolved relative to the config directory.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AssetSettings {
    #[serde(default)]
    pub regular_font: Option<String>,
    #[serde(default)]
    pub bold_font: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PdfSettings {
    pub output_dir: String,
    #[serde(default = "default_compress")]
    pub compress: bool,
}

fn default_compress() -> bool {
    true
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            compress: true,
        }
    }
}
