use crate::error::{InvoiceError, Result};
use crate::invoice::numeric::format_currency;
use crate::invoice::data::checked_sum;
use crate::invoice::InvoiceData;

/// Check the payment plan against the items before anything is rendered.
///
/// Works on the values as entered (before derivation). Every violated rule is
/// reported.
pub fn validate_invoice(data: &InvoiceData, currency_symbol: &str) -> Result<()> {
    let mut errors = Vec::new();

    if data.items.is_empty() {
        errors.push("At least one invoice item is required.".to_string());
    }
    if data.payments.is_empty() {
        errors.push("At least one payment is required.".to_string());
    }

    let base_price = data.base_price();
    if data.checked_totals().is_none() {
        errors.push("Item amounts are too large to total.".to_string());
    }

    let total_percent = checked_sum(data.payments.iter().map(|p| p.percentage));
    let total_amount = checked_sum(data.payments.iter().map(|p| p.amount));
    let plan_matches = total_percent == Some(100) || total_amount == Some(base_price);

    if !data.payments.is_empty() && !plan_matches {
        errors.push(format!(
            "Either sum of payment percentages must be 100%, or sum of payment amounts must equal total price ({}).",
            format_currency(base_price, currency_symbol)
        ));
    }

    if data
        .payments
        .iter()
        .any(|p| p.percentage == 0 && p.amount == 0)
    {
        errors.push("Each payment must have a non-zero percentage or a non-zero amount.".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(InvoiceError::Validation(errors))
    }
}
