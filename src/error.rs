use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Config directory not found at {0}. Run 'ashi-invoice init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invoice input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Failed to parse invoice input {path}: {reason}")]
    InputParse { path: PathBuf, reason: String },

    #[error("Invalid invoice:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),

    #[error("Cannot derive percentage for payment {index}: total price is zero")]
    ZeroBasePrice { index: usize },

    #[error("Font file not found: {0}")]
    FontNotFound(PathBuf),

    #[error("Failed to load font {path}: {reason}")]
    FontParse { path: PathBuf, reason: String },

    #[error("Failed to load image {path}: {reason}")]
    Image { path: PathBuf, reason: String },

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
