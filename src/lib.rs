pub mod config;
pub mod error;
pub mod invoice;
pub mod pdf;

pub use config::{BankDetails, Company, Config, Terms};
pub use error::{InvoiceError, Result};
pub use invoice::{
    derive_payments, generate_invoice, validate_invoice, Client, InvoiceData, LineItem,
    PaymentName, PaymentPlanEntry,
};
pub use pdf::{render_invoice, Assets, RenderedDocument};
