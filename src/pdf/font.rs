//! Font loading and text measurement.
//!
//! Configured TrueType files are parsed once with ttf-parser and embedded in
//! every generated PDF. Without a configured file the built-in Helvetica faces
//! are used, which need no embedding.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{InvoiceError, Result};
use crate::pdf::metrics::helvetica_width;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }
}

/// Parsed metrics of a TrueType font plus its raw bytes for embedding.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    pub name: String,
    pub data: Vec<u8>,
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub cap_height: i16,
    pub bbox: [i16; 4],
    glyph_ids: HashMap<char, u16>,
    advances: HashMap<u16, u16>,
    default_advance: u16,
}

impl TrueTypeFont {
    pub fn from_bytes(name: &str, data: Vec<u8>) -> std::result::Result<Self, String> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| e.to_string())?;

        let units_per_em = face.units_per_em();
        let ascender = face.ascender();
        let descender = face.descender();
        let cap_height = face.capital_height().unwrap_or(ascender);
        let rect = face.global_bounding_box();

        let mut glyph_ids = HashMap::new();
        let mut advances = HashMap::new();
        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(gid) = face.glyph_index(ch) {
                    glyph_ids.insert(ch, gid.0);
                    advances
                        .entry(gid.0)
                        .or_insert_with(|| face.glyph_hor_advance(gid).unwrap_or(0));
                }
            }
        }

        let default_advance = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .filter(|w| *w > 0)
            .unwrap_or(units_per_em / 2);

        Ok(Self {
            name: sanitize_font_name(name),
            units_per_em,
            ascender,
            descender,
            cap_height,
            bbox: [rect.x_min, rect.y_min, rect.x_max, rect.y_max],
            glyph_ids,
            advances,
            default_advance,
            data,
        })
    }

    /// Glyph id for a character; unmapped characters use .notdef (0).
    pub fn glyph_id(&self, ch: char) -> u16 {
        self.glyph_ids.get(&ch).copied().unwrap_or(0)
    }

    pub fn glyph_advance(&self, gid: u16) -> u16 {
        self.advances.get(&gid).copied().unwrap_or(self.default_advance)
    }

    /// Scale a font-unit value to 1/1000 em.
    pub fn to_thousandths(&self, units: i32) -> i32 {
        (f64::from(units) * 1000.0 / f64::from(self.units_per_em)) as i32
    }
}

#[derive(Debug, Clone)]
pub enum FontFace {
    Standard(StandardFont),
    TrueType(TrueTypeFont),
}

impl FontFace {
    /// Advance of a character in 1/1000 em.
    pub fn char_width(&self, ch: char) -> f64 {
        match self {
            FontFace::Standard(font) => {
                f64::from(helvetica_width(ch, *font == StandardFont::HelveticaBold))
            }
            FontFace::TrueType(font) => {
                let advance = font.glyph_advance(font.glyph_id(ch));
                f64::from(advance) * 1000.0 / f64::from(font.units_per_em)
            }
        }
    }

    /// Width of `text` in points at `size` points.
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch)).sum::<f64>() * size / 1000.0
    }

    pub fn pdf_name(&self) -> &str {
        match self {
            FontFace::Standard(font) => font.pdf_name(),
            FontFace::TrueType(font) => &font.name,
        }
    }
}

/// The regular and bold faces every invoice is set in.
#[derive(Debug, Clone)]
pub struct FontSet {
    regular: FontFace,
    bold: FontFace,
}

impl Default for FontSet {
    fn default() -> Self {
        Self {
            regular: FontFace::Standard(StandardFont::Helvetica),
            bold: FontFace::Standard(StandardFont::HelveticaBold),
        }
    }
}

impl FontSet {
    pub fn new(regular: FontFace, bold: FontFace) -> Self {
        Self { regular, bold }
    }

    /// Load configured font files. A missing or unparseable file is an error;
    /// `None` selects the built-in face for that weight.
    pub fn load(regular: Option<&Path>, bold: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let regular = match regular {
            Some(path) => FontFace::TrueType(load_truetype(path)?),
            None => defaults.regular,
        };
        let bold = match bold {
            Some(path) => FontFace::TrueType(load_truetype(path)?),
            None => defaults.bold,
        };
        Ok(Self { regular, bold })
    }

    pub fn face(&self, weight: FontWeight) -> &FontFace {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

fn load_truetype(path: &Path) -> Result<TrueTypeFont> {
    if !path.exists() {
        return Err(InvoiceError::FontNotFound(path.to_path_buf()));
    }
    let data = std::fs::read(path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("CustomFont");
    let font = TrueTypeFont::from_bytes(name, data).map_err(|reason| InvoiceError::FontParse {
        path: path.to_path_buf(),
        reason,
    })?;
    log::debug!("Loaded font {} from {}", font.name, path.display());
    Ok(font)
}

fn sanitize_font_name(name: &str) -> String {
    let name: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if name.is_empty() {
        "CustomFont".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_faces_measure_text() {
        let fonts = FontSet::default();
        let regular = fonts.face(FontWeight::Regular);
        // "Hi" = 722 + 222
        assert!((regular.text_width("Hi", 10.0) - 9.44).abs() < 1e-9);
        assert_eq!(fonts.face(FontWeight::Bold).pdf_name(), "Helvetica-Bold");
    }

    #[test]
    fn no_configured_fonts_falls_back_to_builtin() {
        let fonts = FontSet::load(None, None).unwrap();
        assert!(matches!(
            fonts.face(FontWeight::Regular),
            FontFace::Standard(StandardFont::Helvetica)
        ));
    }

    #[test]
    fn missing_font_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = FontSet::load(Some(&dir.path().join("BOOKOS.TTF")), None).unwrap_err();
        assert!(matches!(err, InvoiceError::FontNotFound(_)));
    }

    #[test]
    fn corrupt_font_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("BOOKOSB.TTF");
        std::fs::write(&path, b"definitely not a font").unwrap();
        let err = FontSet::load(None, Some(&path)).unwrap_err();
        assert!(matches!(err, InvoiceError::FontParse { .. }));
    }

    #[test]
    fn font_names_are_sanitized() {
        assert_eq!(sanitize_font_name("Bookman Old (Style)"), "BookmanOldStyle");
        assert_eq!(sanitize_font_name("  "), "CustomFont");
    }
}
