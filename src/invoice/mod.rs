mod data;
mod derivation;
mod generator;
mod input;
pub mod numeric;
mod terms;
mod validation;

pub use data::{format_payment_date, Client, InvoiceData, ItemTotals, LineItem, PaymentName, PaymentPlanEntry};
pub use derivation::derive_payments;
pub use generator::{generate_invoice, prepare_invoice};
pub use input::{load_invoice_input, InvoiceInput};
pub use terms::{ordinal, PaymentTerm};
pub use validation::validate_invoice;
