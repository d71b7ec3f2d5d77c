mod composer;
pub mod font;
pub mod image;
pub mod layout;
mod metrics;
mod writer;

pub use self::composer::InvoiceComposer;
pub use self::font::{FontFace, FontSet, FontWeight};
pub use self::image::{load_image, LoadedImage};
pub use self::layout::{Document, LayoutEngine, PageSettings};
pub use self::writer::{DocumentInfo, PdfWriter};

use std::path::{Path, PathBuf};

use crate::config::{resolve_path, AssetSettings, Config};
use crate::error::Result;
use crate::invoice::InvoiceData;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Fonts and logo, loaded once and shared read-only by every generation.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    pub fonts: FontSet,
    pub logo: Option<LoadedImage>,
    /// Where the logo was looked for, kept for the missing-logo warning.
    pub logo_path: Option<PathBuf>,
}

impl Assets {
    /// Fonts must load when configured. A logo file that does not exist is
    /// left out; one that exists but cannot be decoded is an error.
    pub fn load(settings: &AssetSettings, config_dir: &Path) -> Result<Self> {
        let regular = settings
            .regular_font
            .as_deref()
            .map(|p| resolve_path(p, config_dir));
        let bold = settings
            .bold_font
            .as_deref()
            .map(|p| resolve_path(p, config_dir));
        let fonts = FontSet::load(regular.as_deref(), bold.as_deref())?;

        let logo_path = settings.logo.as_deref().map(|p| resolve_path(p, config_dir));
        let logo = match &logo_path {
            Some(path) if path.exists() => Some(load_image(path)?),
            _ => None,
        };

        Ok(Self {
            fonts,
            logo,
            logo_path,
        })
    }
}

/// A finished invoice ready to be saved or served.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// Derive payments, lay out and serialize one invoice.
///
/// `data.payments` holds the resolved percentages and amounts afterwards.
pub fn render_invoice(
    data: &mut InvoiceData,
    config: &Config,
    assets: &Assets,
) -> Result<RenderedDocument> {
    let doc = InvoiceComposer::new(config, assets).compose(data)?;

    let info = DocumentInfo {
        title: Some(format!("Invoice {}", data.number)),
        author: Some(config.company.name.clone()),
    };
    let bytes = PdfWriter::new()
        .compress(config.pdf.compress)
        .write(&doc, &assets.fonts, &info)?;

    Ok(RenderedDocument {
        bytes,
        file_name: data.file_name(&config.invoice.file_prefix),
        mime_type: PDF_MIME_TYPE,
    })
}
