//! # PDF Serializer
//!
//! Writes laid-out pages as a PDF 1.7 file.
//!
//! ```text
//! %PDF-1.7
//! 1 0 obj Catalog      2 0 obj Pages
//! fonts, images, then one content stream + page object per page
//! xref / trailer / %%EOF
//! ```
//!
//! Built-in faces are referenced as Type1 fonts with WinAnsiEncoding.
//! TrueType faces are embedded whole as CIDFontType2 with Identity-H encoding
//! (FontFile2, FontDescriptor, CIDFont, ToUnicode and the Type0 root).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::{InvoiceError, Result};
use crate::pdf::font::{FontFace, FontSet, FontWeight, TrueTypeFont};
use crate::pdf::image::{ImagePixelData, LoadedImage};
use crate::pdf::layout::{Document, DrawOp, MM_TO_PT};
use crate::pdf::metrics::unicode_to_winansi;

const WEIGHTS: [FontWeight; 2] = [FontWeight::Regular, FontWeight::Bold];

/// Document information dictionary entries.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
}

pub struct PdfWriter {
    compress: bool,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

struct PdfBuilder {
    /// Index 0 is the free-list placeholder.
    objects: Vec<Vec<u8>>,
    /// Object id per weight, referenced as /F1 (regular) and /F2 (bold).
    font_objects: Vec<usize>,
    image_objects: Vec<usize>,
}

impl PdfBuilder {
    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }
}

fn font_resource(weight: FontWeight) -> &'static str {
    match weight {
        FontWeight::Regular => "F1",
        FontWeight::Bold => "F2",
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self { compress: true }
    }

    /// Flate-compress content, font and image streams (on by default).
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn write(&self, doc: &Document<'_>, fonts: &FontSet, info: &DocumentInfo) -> Result<Vec<u8>> {
        if doc.pages.is_empty() {
            return Err(InvoiceError::PdfGeneration("document has no pages".to_string()));
        }

        let mut builder = PdfBuilder {
            objects: vec![Vec::new(), Vec::new(), Vec::new()],
            font_objects: Vec::new(),
            image_objects: Vec::new(),
        };

        let used_chars = collect_used_chars(doc);
        for weight in WEIGHTS {
            let chars = used_chars.get(&weight).cloned().unwrap_or_default();
            let id = self.write_font(&mut builder, fonts.face(weight), &chars)?;
            builder.font_objects.push(id);
        }

        for image in &doc.images {
            let id = self.write_image(&mut builder, image);
            builder.image_objects.push(id);
        }

        let width_pt = doc.settings.width * MM_TO_PT;
        let height_pt = doc.settings.height * MM_TO_PT;
        let font_dict = format!(
            "/F1 {} 0 R /F2 {} 0 R",
            builder.font_objects[0], builder.font_objects[1]
        );

        let mut page_ids = Vec::with_capacity(doc.pages.len());
        for page in &doc.pages {
            let mut content = String::new();
            let mut page_images = BTreeSet::new();
            for op in &page.ops {
                if let DrawOp::Image { index, .. } = op {
                    page_images.insert(*index);
                }
                write_op(&mut content, op, doc.settings.height, fonts)?;
            }

            let content_id = self.push_stream(&mut builder, content.as_bytes(), "");

            let mut resources = format!("/Font << {} >>", font_dict);
            if !page_images.is_empty() {
                let xobjects: Vec<String> = page_images
                    .iter()
                    .map(|i| format!("/Im{} {} 0 R", i, builder.image_objects[*i]))
                    .collect();
                let _ = write!(resources, " /XObject << {} >>", xobjects.join(" "));
            }

            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                width_pt, height_pt, content_id, resources
            );
            page_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();
        let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
        builder.objects[2] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_ids.len()
        )
        .into_bytes();

        let mut info_dict = String::from("<< ");
        if let Some(title) = &info.title {
            let _ = write!(info_dict, "/Title {} ", pdf_text_string(title));
        }
        if let Some(author) = &info.author {
            let _ = write!(info_dict, "/Author {} ", pdf_text_string(author));
        }
        info_dict.push_str("/Producer (ashi-invoice) >>");
        let info_id = builder.push(info_dict.into_bytes());

        log::debug!(
            "Serialized {} page(s) into {} PDF objects",
            page_ids.len(),
            builder.objects.len() - 1
        );
        Ok(serialize(&builder, info_id))
    }

    fn encode_stream(&self, data: &[u8]) -> (Vec<u8>, &'static str) {
        if self.compress {
            (compress_to_vec_zlib(data, 6), " /Filter /FlateDecode")
        } else {
            (data.to_vec(), "")
        }
    }

    /// Push a stream object; `extra` holds additional dictionary entries.
    fn push_stream(&self, builder: &mut PdfBuilder, data: &[u8], extra: &str) -> usize {
        let (encoded, filter) = self.encode_stream(data);
        let mut obj: Vec<u8> = Vec::new();
        let _ = write!(obj, "<< /Length {}{}{} >>\nstream\n", encoded.len(), filter, extra);
        obj.extend_from_slice(&encoded);
        obj.extend_from_slice(b"\nendstream");
        builder.push(obj)
    }

    fn write_font(
        &self,
        builder: &mut PdfBuilder,
        face: &FontFace,
        used_chars: &BTreeSet<char>,
    ) -> Result<usize> {
        match face {
            FontFace::Standard(font) => {
                let dict = format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font.pdf_name()
                );
                Ok(builder.push(dict.into_bytes()))
            }
            FontFace::TrueType(font) => Ok(self.write_truetype(builder, font, used_chars)),
        }
    }

    fn write_truetype(
        &self,
        builder: &mut PdfBuilder,
        font: &TrueTypeFont,
        used_chars: &BTreeSet<char>,
    ) -> usize {
        let fontfile_id = self.push_stream(
            builder,
            &font.data,
            &format!(" /Length1 {}", font.data.len()),
        );

        let [x_min, y_min, x_max, y_max] = font.bbox;
        let descriptor = format!(
            "<< /Type /FontDescriptor /FontName /{} /Flags 4 \
             /FontBBox [{} {} {} {}] /ItalicAngle 0 \
             /Ascent {} /Descent {} /CapHeight {} /StemV 80 \
             /FontFile2 {} 0 R >>",
            font.name,
            font.to_thousandths(x_min.into()),
            font.to_thousandths(y_min.into()),
            font.to_thousandths(x_max.into()),
            font.to_thousandths(y_max.into()),
            font.to_thousandths(font.ascender.into()),
            font.to_thousandths(font.descender.into()),
            font.to_thousandths(font.cap_height.into()),
            fontfile_id,
        );
        let descriptor_id = builder.push(descriptor.into_bytes());

        let glyphs: BTreeMap<u16, char> = used_chars
            .iter()
            .map(|&ch| (font.glyph_id(ch), ch))
            .collect();

        let mut widths = String::from("[");
        for gid in glyphs.keys() {
            let w = font.to_thousandths(font.glyph_advance(*gid).into());
            let _ = write!(widths, " {} [{}]", gid, w);
        }
        widths.push_str(" ]");

        let cidfont = format!(
            "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
             /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
             /FontDescriptor {} 0 R /DW {} /W {} /CIDToGIDMap /Identity >>",
            font.name,
            descriptor_id,
            font.to_thousandths(font.glyph_advance(0).into()),
            widths,
        );
        let cidfont_id = builder.push(cidfont.into_bytes());

        let cmap = build_tounicode_cmap(&glyphs);
        let tounicode_id = self.push_stream(builder, cmap.as_bytes(), "");

        let type0 = format!(
            "<< /Type /Font /Subtype /Type0 /BaseFont /{} /Encoding /Identity-H \
             /DescendantFonts [{} 0 R] /ToUnicode {} 0 R >>",
            font.name, cidfont_id, tounicode_id
        );
        builder.push(type0.into_bytes())
    }

    fn write_image(&self, builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let mut obj: Vec<u8> = Vec::new();
                let _ = write!(
                    obj,
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace {} /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    color_space.pdf_name(),
                    data.len()
                );
                obj.extend_from_slice(data);
                obj.extend_from_slice(b"\nendstream");
                builder.push(obj)
            }
            ImagePixelData::Decoded { rgb, alpha } => {
                let smask = alpha.as_ref().map(|alpha| {
                    let entries = format!(
                        " /Type /XObject /Subtype /Image /Width {} /Height {} \
                         /ColorSpace /DeviceGray /BitsPerComponent 8",
                        image.width_px, image.height_px
                    );
                    self.push_stream(builder, alpha, &entries)
                });
                let smask_ref = smask
                    .map(|id| format!(" /SMask {} 0 R", id))
                    .unwrap_or_default();
                let entries = format!(
                    " /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace /DeviceRGB /BitsPerComponent 8{}",
                    image.width_px, image.height_px, smask_ref
                );
                self.push_stream(builder, rgb, &entries)
            }
        }
    }
}

fn collect_used_chars(doc: &Document<'_>) -> BTreeMap<FontWeight, BTreeSet<char>> {
    let mut used: BTreeMap<FontWeight, BTreeSet<char>> = BTreeMap::new();
    for page in &doc.pages {
        for op in &page.ops {
            if let DrawOp::Text { weight, text, .. } = op {
                used.entry(*weight).or_default().extend(text.chars());
            }
        }
    }
    used
}

/// Append the operators for one draw op. Layout y runs down from the top in
/// millimetres; PDF y runs up from the bottom in points.
fn write_op(stream: &mut String, op: &DrawOp, page_height: f64, fonts: &FontSet) -> Result<()> {
    let pt = |mm: f64| mm * MM_TO_PT;
    let flip = |y: f64| (page_height - y) * MM_TO_PT;

    match op {
        DrawOp::Text {
            x,
            y,
            weight,
            size,
            text,
        } => {
            let encoded = encode_text(fonts.face(*weight), text)?;
            let _ = writeln!(
                stream,
                "BT /{} {:.2} Tf {:.2} {:.2} Td {} Tj ET",
                font_resource(*weight),
                size,
                pt(*x),
                flip(*y),
                encoded
            );
        }
        DrawOp::Rect {
            x,
            y,
            w,
            h,
            stroke,
            fill,
            line_width,
        } => {
            let paint = match (*stroke, fill.is_some()) {
                (true, true) => "B",
                (false, true) => "f",
                (true, false) => "S",
                (false, false) => return Ok(()),
            };
            stream.push_str("q\n");
            if let Some(gray) = fill {
                let _ = writeln!(stream, "{:.3} g", gray);
            }
            let _ = writeln!(
                stream,
                "{:.2} w {:.2} {:.2} {:.2} {:.2} re {}\nQ",
                pt(*line_width),
                pt(*x),
                flip(y + h),
                pt(*w),
                pt(*h),
                paint
            );
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
        } => {
            let _ = writeln!(
                stream,
                "{:.2} w {:.2} {:.2} m {:.2} {:.2} l S",
                pt(*width),
                pt(*x1),
                flip(*y1),
                pt(*x2),
                flip(*y2)
            );
        }
        DrawOp::Image { index, x, y, w, h } => {
            let _ = writeln!(
                stream,
                "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /Im{} Do Q",
                pt(*w),
                pt(*h),
                pt(*x),
                flip(y + h),
                index
            );
        }
    }
    Ok(())
}

/// Encode a text run as a PDF string operand for the given face.
fn encode_text(face: &FontFace, text: &str) -> Result<String> {
    match face {
        FontFace::Standard(_) => {
            let mut out = String::from("(");
            for ch in text.chars() {
                let b = unicode_to_winansi(ch).unwrap_or(b'?');
                match b {
                    b'\\' => out.push_str("\\\\"),
                    b'(' => out.push_str("\\("),
                    b')' => out.push_str("\\)"),
                    0x20..=0x7E => out.push(b as char),
                    _ => {
                        let _ = write!(out, "\\{:03o}", b);
                    }
                }
            }
            out.push(')');
            Ok(out)
        }
        FontFace::TrueType(font) => {
            let mut out = String::from("<");
            for ch in text.chars() {
                write!(out, "{:04X}", font.glyph_id(ch))
                    .map_err(|e| InvoiceError::PdfGeneration(e.to_string()))?;
            }
            out.push('>');
            Ok(out)
        }
    }
}

fn build_tounicode_cmap(glyphs: &BTreeMap<u16, char>) -> String {
    let mut cmap = String::new();
    cmap.push_str("/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n");
    cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
    cmap.push_str("/CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n");
    cmap.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

    let entries: Vec<(&u16, &char)> = glyphs.iter().filter(|(gid, _)| **gid != 0).collect();
    for chunk in entries.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (gid, ch) in chunk {
            let mut utf16 = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut utf16)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", gid, hex);
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}

/// Text string for the document info dictionary: a literal string when the
/// value is plain ASCII, otherwise UTF-16BE with a byte order mark.
fn pdf_text_string(s: &str) -> String {
    if s.is_ascii() {
        let escaped = s
            .replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)");
        return format!("({})", escaped);
    }

    let mut hex = String::from("<FEFF");
    for unit in s.encode_utf16() {
        let _ = write!(hex, "{:04X}", unit);
    }
    hex.push('>');
    hex
}

fn serialize(builder: &PdfBuilder, info_id: usize) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    let mut offsets = vec![0usize; builder.objects.len()];

    output.extend_from_slice(b"%PDF-1.7\n");
    output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

    for (i, obj) in builder.objects.iter().enumerate().skip(1) {
        offsets[i] = output.len();
        let _ = write!(output, "{} 0 obj\n", i);
        output.extend_from_slice(obj);
        output.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = output.len();
    let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
    output.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        let _ = write!(output, "{:010} 00000 n \n", offset);
    }
    let _ = write!(
        output,
        "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        builder.objects.len(),
        info_id,
        xref_offset
    );
    output
}
