use serde::{Deserialize, Serialize};

/// Boilerplate clauses printed after the payment terms.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Terms {
    pub title: String,
    pub clauses: Vec<String>,
    /// The first `emphasized` clauses are printed in bold.
    pub emphasized: usize,
}

const STANDARD_CLAUSES: [&str; 6] = [
    "As per the company policy, once a dress is purchased, it is not subject to return or refund",
    "Once the purchase details and samples are approved by the client, the dress is not subject to any changes",
    "The delivery date is scheduled as per the agreement with the sales team upon order confirmation; in case of any date change or event cancellation, Ashi Studio will be working according to the initial date provided",
    "Any addition to the dress, requested by the client, will be charged separately",
    "After doing the final fitting and dress adjustments, once the dress is received, any changes requested are not covered by Ashi Studio and are subject to additional payments",
    "Fittings and delivery will be in the client country of origin or in AshI STUDIO showroom in Paris; any changes in the destination will be at the cost of the client",
];

impl Default for Terms {
    fn default() -> Self {
        Self {
            title: "Terms & Conditions".to_string(),
            clauses: STANDARD_CLAUSES.iter().map(|c| c.to_string()).collect(),
            emphasized: 2,
        }
    }
}

impl Terms {
    pub fn is_emphasized(&self, index: usize) -> bool {
        index < self.emphasized
    }
}
