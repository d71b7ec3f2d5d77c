/// Parse a string like "12,300" into 12300.
///
/// Separators and surrounding whitespace are stripped; anything that is not a
/// plain run of decimal digits afterwards (including the empty string) is 0.
pub fn parse_int_with_commas(text: &str) -> u64 {
    let cleaned: String = text.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    cleaned.parse().unwrap_or(0)
}

pub fn format_grouped_int(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// "1,000 €"
pub fn format_currency(value: u64, currency_symbol: &str) -> String {
    format!("{} {}", format_grouped_int(value), currency_symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grouped_numbers() {
        assert_eq!(parse_int_with_commas("12,300"), 12300);
        assert_eq!(parse_int_with_commas("  1,000,000 "), 1_000_000);
        assert_eq!(parse_int_with_commas("1,2,3"), 123);
    }

    #[test]
    fn junk_parses_as_zero() {
        assert_eq!(parse_int_with_commas(""), 0);
        assert_eq!(parse_int_with_commas("   "), 0);
        assert_eq!(parse_int_with_commas("abc"), 0);
        assert_eq!(parse_int_with_commas("-5"), 0);
        assert_eq!(parse_int_with_commas("12.5"), 0);
        assert_eq!(parse_int_with_commas("99999999999999999999999"), 0);
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_grouped_int(0), "0");
        assert_eq!(format_grouped_int(999), "999");
        assert_eq!(format_grouped_int(1000), "1,000");
        assert_eq!(format_grouped_int(1234567), "1,234,567");
        assert_eq!(format_currency(12300, "€"), "12,300 €");
    }
}
