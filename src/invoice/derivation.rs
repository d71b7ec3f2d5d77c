use crate::error::{InvoiceError, Result};
use crate::invoice::PaymentPlanEntry;

/// Fill in whichever of percentage/amount is missing, in place.
///
/// Entries with both values set (or both zero) are left alone, so running this
/// twice is a no-op. Rounding is half-to-even for both directions.
pub fn derive_payments(entries: &mut [PaymentPlanEntry], base_price: u64) -> Result<()> {
    for (index, entry) in entries.iter_mut().enumerate() {
        if entry.percentage == 0 && entry.amount != 0 {
            if base_price == 0 {
                return Err(InvoiceError::ZeroBasePrice { index: index + 1 });
            }
            entry.percentage = round_div(u128::from(entry.amount) * 100, u128::from(base_price));
        } else if entry.amount == 0 && entry.percentage != 0 {
            entry.amount = round_div(u128::from(entry.percentage) * u128::from(base_price), 100);
        }
    }
    Ok(())
}

/// `num / den` rounded to the nearest integer, ties to even.
fn round_div(num: u128, den: u128) -> u64 {
    let quotient = num / den;
    let remainder = num % den;
    let rounded = match (remainder * 2).cmp(&den) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient & 1),
    };
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::PaymentName;

    #[test]
    fn derives_percentage_from_amount() {
        let mut entries = vec![PaymentPlanEntry::new(None, 0, 300)];
        derive_payments(&mut entries, 1000).unwrap();
        assert_eq!(entries[0].percentage, 30);
        assert_eq!(entries[0].amount, 300);
    }

    #[test]
    fn derives_amount_from_percentage() {
        let mut entries = vec![PaymentPlanEntry::new(Some(PaymentName::DownPayment), 25, 0)];
        derive_payments(&mut entries, 1000).unwrap();
        assert_eq!(entries[0].amount, 250);
        assert_eq!(entries[0].percentage, 25);
    }

    #[test]
    fn trusts_values_given_together() {
        let mut entries = vec![
            PaymentPlanEntry::new(None, 10, 999),
            PaymentPlanEntry::new(None, 0, 0),
        ];
        derive_payments(&mut entries, 1000).unwrap();
        assert_eq!((entries[0].percentage, entries[0].amount), (10, 999));
        assert_eq!((entries[1].percentage, entries[1].amount), (0, 0));
    }

    #[test]
    fn second_pass_changes_nothing() {
        let mut entries = vec![
            PaymentPlanEntry::new(None, 50, 0),
            PaymentPlanEntry::new(None, 0, 333),
        ];
        derive_payments(&mut entries, 1000).unwrap();
        let resolved = entries.clone();
        derive_payments(&mut entries, 1000).unwrap();
        assert_eq!(entries, resolved);
    }

    #[test]
    fn ties_round_to_even() {
        // 125 / 1000 = 12.5% -> 12, 135 / 1000 = 13.5% -> 14
        let mut entries = vec![
            PaymentPlanEntry::new(None, 0, 125),
            PaymentPlanEntry::new(None, 0, 135),
        ];
        derive_payments(&mut entries, 1000).unwrap();
        assert_eq!(entries[0].percentage, 12);
        assert_eq!(entries[1].percentage, 14);

        // 50% of 5 = 2.5 -> 2, 50% of 7 = 3.5 -> 4
        let mut entries = vec![PaymentPlanEntry::new(None, 50, 0)];
        derive_payments(&mut entries, 5).unwrap();
        assert_eq!(entries[0].amount, 2);
        let mut entries = vec![PaymentPlanEntry::new(None, 50, 0)];
        derive_payments(&mut entries, 7).unwrap();
        assert_eq!(entries[0].amount, 4);
    }

    #[test]
    fn zero_base_price_cannot_yield_percentage() {
        let mut entries = vec![PaymentPlanEntry::new(None, 100, 0), PaymentPlanEntry::new(None, 0, 5)];
        let err = derive_payments(&mut entries, 0).unwrap_err();
        assert!(matches!(err, InvoiceError::ZeroBasePrice { index: 2 }));
    }
}
