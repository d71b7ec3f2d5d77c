use std::fmt;

use crate::invoice::PaymentPlanEntry;

const ORDINALS: [&str; 10] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth", "tenth",
];

/// Ordinal word for a 0-based index. Past "tenth" this falls back to
/// `"{n+1}th"`, which gives "11th" but also "21th"; kept as is.
pub fn ordinal(index: usize) -> String {
    match ORDINALS.get(index) {
        Some(word) => word.to_string(),
        None => format!("{}th", index + 1),
    }
}

/// The sentence describing one payment in the terms section, split around the
/// percentage so it can be emphasized.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTerm {
    pub lead: String,
    pub percentage: String,
    pub tail: String,
}

impl PaymentTerm {
    pub fn new(index: usize, entry: &PaymentPlanEntry) -> Self {
        let mut tail = " of the total price is required".to_string();
        if let Some(name) = entry.name {
            tail.push_str(&format!(" as {}", name));
        }
        if !entry.description.is_empty() {
            tail.push_str(&format!(" ({})", entry.description));
        }

        Self {
            lead: format!("A {} payment of ", ordinal(index)),
            percentage: format!("{}%", entry.percentage),
            tail,
        }
    }
}

impl fmt::Display for PaymentTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.lead, self.percentage, self.tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::PaymentName;

    #[test]
    fn ordinal_words_then_numeric_fallback() {
        assert_eq!(ordinal(0), "first");
        assert_eq!(ordinal(2), "third");
        assert_eq!(ordinal(9), "tenth");
        assert_eq!(ordinal(10), "11th");
        assert_eq!(ordinal(20), "21th");
    }

    #[test]
    fn sentence_with_name_and_description() {
        let mut entry = PaymentPlanEntry::new(Some(PaymentName::DownPayment), 50, 500);
        entry.description = "on signature".to_string();
        let term = PaymentTerm::new(0, &entry);
        assert_eq!(term.percentage, "50%");
        assert_eq!(
            term.to_string(),
            "A first payment of 50% of the total price is required as down payment (on signature)"
        );
    }

    #[test]
    fn sentence_without_optional_parts() {
        let entry = PaymentPlanEntry::new(None, 30, 0);
        assert_eq!(
            PaymentTerm::new(1, &entry).to_string(),
            "A second payment of 30% of the total price is required"
        );
    }
}
