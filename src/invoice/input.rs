use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

use crate::error::{InvoiceError, Result};
use crate::invoice::numeric::parse_int_with_commas;
use crate::invoice::{Client, InvoiceData, LineItem, PaymentName, PaymentPlanEntry};

/// Invoice as entered by a user: numbers may be formatted strings, dates may be blank.
#[derive(Debug, Deserialize)]
pub struct InvoiceInput {
    pub invoice_number: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub vat: u64,
    pub client: Client,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub payments: Vec<PaymentInput>,
}

#[derive(Debug, Deserialize)]
pub struct LineItemInput {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub price: u64,
    #[serde(default, deserialize_with = "lenient_int")]
    pub paid: u64,
}

#[derive(Debug, Deserialize)]
pub struct PaymentInput {
    #[serde(default)]
    pub name: Option<PaymentName>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub percentage: u64,
    #[serde(default, deserialize_with = "lenient_int")]
    pub amount: u64,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(u64),
    Text(String),
}

fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawNumber::deserialize(deserializer) {
        Ok(RawNumber::Int(n)) => n,
        Ok(RawNumber::Text(s)) => parse_int_with_commas(&s),
        Err(_) => 0,
    })
}

fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid date '{s}', expected YYYY-MM-DD"))),
    }
}

impl InvoiceInput {
    pub fn into_data(self) -> InvoiceData {
        InvoiceData {
            number: self.invoice_number,
            date: self
                .invoice_date
                .unwrap_or_else(|| Local::now().date_naive()),
            client: self.client,
            vat: self.vat,
            items: self
                .items
                .into_iter()
                .map(|i| LineItem {
                    description: i.description,
                    price: i.price,
                    paid: i.paid,
                })
                .collect(),
            payments: self
                .payments
                .into_iter()
                .map(|p| PaymentPlanEntry {
                    name: p.name,
                    date: p.date,
                    percentage: p.percentage,
                    amount: p.amount,
                    description: p.description,
                })
                .collect(),
        }
    }
}

/// Load an invoice input file; `.json` files are read as JSON, anything else as TOML.
pub fn load_invoice_input(path: &Path) -> Result<InvoiceInput> {
    if !path.exists() {
        return Err(InvoiceError::InputNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        toml::from_str(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| InvoiceError::InputParse {
        path: path.to_path_buf(),
        reason,
    })
}
