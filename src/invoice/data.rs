use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
}

/// A line item on the invoice
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineItem {
    pub description: String,
    pub price: u64,
    pub paid: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentName {
    #[serde(rename = "down payment")]
    DownPayment,
    #[serde(rename = "fitting payment")]
    FittingPayment,
    #[serde(rename = "closing payment")]
    ClosingPayment,
    #[serde(rename = "full payment")]
    FullPayment,
}

impl PaymentName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentName::DownPayment => "down payment",
            PaymentName::FittingPayment => "fitting payment",
            PaymentName::ClosingPayment => "closing payment",
            PaymentName::FullPayment => "full payment",
        }
    }
}

impl fmt::Display for PaymentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One installment of the payment schedule. Either `percentage` or `amount`
/// may be left at 0 and filled in by derivation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentPlanEntry {
    pub name: Option<PaymentName>,
    pub date: Option<NaiveDate>,
    pub percentage: u64,
    pub amount: u64,
    pub description: String,
}

impl PaymentPlanEntry {
    pub fn new(name: Option<PaymentName>, percentage: u64, amount: u64) -> Self {
        Self {
            name,
            date: None,
            percentage,
            amount,
            description: String::new(),
        }
    }
}

/// Complete invoice data for PDF generation
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceData {
    pub number: String,
    pub date: NaiveDate,
    pub client: Client,
    pub vat: u64,
    pub items: Vec<LineItem>,
    pub payments: Vec<PaymentPlanEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTotals {
    pub sum_price: u64,
    pub sum_paid: u64,
    pub vat: u64,
    pub final_total: u64,
}

impl InvoiceData {
    /// Sum of item prices; payment plans are measured against this, not the paid total.
    /// Saturates at `u64::MAX`; `checked_totals` reports the overflow instead.
    pub fn base_price(&self) -> u64 {
        self.items.iter().fold(0, |acc, i| acc.saturating_add(i.price))
    }

    /// Totals with saturating sums. Validation rejects invoices whose exact
    /// totals do not fit, so rendered numbers never saturate.
    pub fn totals(&self) -> ItemTotals {
        let sum_price = self.base_price();
        let sum_paid = self.items.iter().fold(0u64, |acc, i| acc.saturating_add(i.paid));
        ItemTotals {
            sum_price,
            sum_paid,
            vat: self.vat,
            final_total: sum_paid.saturating_add(self.vat),
        }
    }

    /// Exact totals, or `None` when any sum overflows `u64`.
    pub fn checked_totals(&self) -> Option<ItemTotals> {
        let sum_price = checked_sum(self.items.iter().map(|i| i.price))?;
        let sum_paid = checked_sum(self.items.iter().map(|i| i.paid))?;
        Some(ItemTotals {
            sum_price,
            sum_paid,
            vat: self.vat,
            final_total: sum_paid.checked_add(self.vat)?,
        })
    }

    pub fn formatted_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }

    /// Download name: `<prefix><number>.pdf` with `/` replaced by `_`.
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}{}.pdf", prefix, self.number.replace('/', "_"))
    }
}

pub(crate) fn checked_sum(values: impl IntoIterator<Item = u64>) -> Option<u64> {
    values.into_iter().try_fold(0u64, |acc, v| acc.checked_add(v))
}

pub fn format_payment_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d-%m-%Y").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InvoiceData {
        InvoiceData {
            number: "369/2025".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            client: Client {
                name: "Client".to_string(),
                country: "Kuwait".to_string(),
                phone: "+965".to_string(),
            },
            vat: 150,
            items: vec![
                LineItem {
                    description: "Dress".to_string(),
                    price: 1000,
                    paid: 500,
                },
                LineItem {
                    description: "Veil".to_string(),
                    price: 2000,
                    paid: 1000,
                },
            ],
            payments: vec![],
        }
    }

    #[test]
    fn totals_add_vat_to_paid_sum() {
        let totals = sample().totals();
        assert_eq!(totals.sum_price, 3000);
        assert_eq!(totals.sum_paid, 1500);
        assert_eq!(totals.vat, 150);
        assert_eq!(totals.final_total, 1650);
    }

    #[test]
    fn oversized_amounts_saturate_instead_of_overflowing() {
        let mut data = sample();
        data.items[0].price = u64::MAX / 2 + 1;
        data.items[1].price = u64::MAX / 2 + 1;
        data.items[0].paid = u64::MAX;

        let totals = data.totals();
        assert_eq!(totals.sum_price, u64::MAX);
        assert_eq!(totals.final_total, u64::MAX);
        assert_eq!(data.base_price(), u64::MAX);
        assert!(data.checked_totals().is_none());
        assert_eq!(sample().checked_totals(), Some(sample().totals()));
    }

    #[test]
    fn file_name_replaces_slashes() {
        assert_eq!(sample().file_name("ashi_invoice_"), "ashi_invoice_369_2025.pdf");
    }

    #[test]
    fn dates_use_distinct_formats() {
        let data = sample();
        assert_eq!(data.formatted_date(), "07/03/2025");
        assert_eq!(format_payment_date(Some(data.date)), "07-03-2025");
        assert_eq!(format_payment_date(None), "");
    }

    #[test]
    fn payment_names_round_trip_through_serde() {
        let name: PaymentName = serde_json::from_str("\"fitting payment\"").unwrap();
        assert_eq!(name, PaymentName::FittingPayment);
        assert_eq!(name.to_string(), "fitting payment");
    }
}
