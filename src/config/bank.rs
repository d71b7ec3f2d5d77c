use serde::{Deserialize, Serialize};

/// A label/value pair in the bank transfer grid. Values may span several lines.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BankField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BankColumn {
    pub fields: Vec<BankField>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BankDetails {
    pub title: String,
    pub columns: Vec<BankColumn>,
}

const BANK_COLUMNS: [&[(&str, &str)]; 4] = [
    &[
        (
            "BENEFICIARY:",
            "ASHI STUDIO SAS\n9 AVENUE HOCHE\n75008 PARIS, FRANCE",
        ),
        ("REGISTRATION number:", "922 266 788 00012"),
        ("VAT:", "FR21922266788"),
    ],
    &[
        ("BANK NAME:", "BNP PARIBAS"),
        ("AGENCY ADDRESS:", "Agency Paris Turenne"),
        ("AGENCY CODE:", "00823"),
    ],
    &[
        ("ACCOUNT CURRENCY:", "EUR (Euro)"),
        ("IBAN:", "FR76 3000 4008 2300 0108 9656 803"),
        ("RIB:", "03"),
    ],
    &[
        ("SWIFT:", "BNPAFRPPXXX"),
        ("ACCOUNT N°:", "00010896568"),
        ("BANK CODE:", "30004"),
    ],
];

impl Default for BankDetails {
    fn default() -> Self {
        let columns = BANK_COLUMNS
            .iter()
            .map(|fields| BankColumn {
                fields: fields
                    .iter()
                    .map(|(label, value)| BankField {
                        label: label.to_string(),
                        value: value.to_string(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: "Bank Transfer Details:".to_string(),
            columns,
        }
    }
}
