//! # Layout Engine
//!
//! Positional layout onto fixed-size pages. Units are millimetres measured from
//! the top-left corner; font sizes are points. The engine owns an explicit
//! [`Cursor`] (page, x, y) that every drawing call reads and advances.
//!
//! Vertical flow that would cross the bottom break line continues on the next
//! page. When an earlier column already created that page it is reused, so
//! side-by-side columns can each overflow independently and the caller picks
//! the lowest end position with [`Cursor::lowest`].

use crate::pdf::font::{FontSet, FontWeight};
use crate::pdf::image::LoadedImage;

/// Points per millimetre.
pub const MM_TO_PT: f64 = 72.0 / 25.4;

/// Grey level of filled cells (0 black, 1 white).
const FILL_GRAY: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSettings {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    /// Distance from the bottom edge at which flow breaks to a new page.
    pub break_margin: f64,
    pub auto_page_break: bool,
    /// Horizontal padding inside cells.
    pub cell_margin: f64,
}

impl Default for PageSettings {
    /// A4 portrait with 10 mm margins.
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin_left: 10.0,
            margin_top: 10.0,
            margin_right: 10.0,
            break_margin: 10.0,
            auto_page_break: true,
            cell_margin: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// How a single cell is drawn and where the cursor goes afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub border: bool,
    pub align: Align,
    pub fill: bool,
    pub new_line: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            border: false,
            align: Align::Left,
            fill: false,
            new_line: false,
        }
    }
}

impl CellStyle {
    pub fn bordered() -> Self {
        Self {
            border: true,
            ..Self::default()
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn filled(mut self) -> Self {
        self.fill = true;
        self
    }

    /// Move to the left margin of the next line after drawing.
    pub fn new_line(mut self) -> Self {
        self.new_line = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub weight: FontWeight,
    pub underline: bool,
    pub size: f64,
}

impl FontSpec {
    pub fn regular(size: f64) -> Self {
        Self {
            weight: FontWeight::Regular,
            underline: false,
            size,
        }
    }

    pub fn bold(size: f64) -> Self {
        Self {
            weight: FontWeight::Bold,
            underline: false,
            size,
        }
    }

    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }

    fn size_mm(&self) -> f64 {
        self.size / MM_TO_PT
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub page: usize,
    pub x: f64,
    pub y: f64,
}

impl Cursor {
    /// Whichever position is further down the document.
    pub fn lowest(self, other: Cursor) -> Cursor {
        if (other.page, other.y) > (self.page, self.y) {
            other
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the baseline.
    Text {
        x: f64,
        y: f64,
        weight: FontWeight,
        size: f64,
        text: String,
    },
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        stroke: bool,
        fill: Option<f64>,
        line_width: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
    },
    Image {
        index: usize,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Laid-out pages ready for serialization.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    pub settings: PageSettings,
    pub pages: Vec<Page>,
    pub images: Vec<&'a LoadedImage>,
}

impl Document<'_> {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every text run in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| p.texts())
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }
}

pub struct LayoutEngine<'a> {
    fonts: &'a FontSet,
    settings: PageSettings,
    pages: Vec<Page>,
    images: Vec<&'a LoadedImage>,
    cursor: Cursor,
    font: FontSpec,
    line_width: f64,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(fonts: &'a FontSet, settings: PageSettings) -> Self {
        Self {
            fonts,
            settings,
            pages: vec![Page::default()],
            images: Vec::new(),
            cursor: Cursor {
                page: 0,
                x: settings.margin_left,
                y: settings.margin_top,
            },
            font: FontSpec::regular(10.0),
            line_width: 0.2,
        }
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    pub fn x(&self) -> f64 {
        self.cursor.x
    }

    pub fn y(&self) -> f64 {
        self.cursor.y
    }

    pub fn set_x(&mut self, x: f64) {
        self.cursor.x = x;
    }

    /// Move to `y` and back to the left margin.
    pub fn set_y(&mut self, y: f64) {
        self.cursor.x = self.settings.margin_left;
        self.cursor.y = y;
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.cursor.x = x;
        self.cursor.y = y;
    }

    /// Line break of height `h` back to the left margin.
    pub fn ln(&mut self, h: f64) {
        self.cursor.x = self.settings.margin_left;
        self.cursor.y += h;
    }

    fn right_edge(&self) -> f64 {
        self.settings.width - self.settings.margin_right
    }

    fn break_line(&self) -> f64 {
        self.settings.height - self.settings.break_margin
    }

    /// Width of `text` in the current font, in millimetres.
    pub fn string_width(&self, text: &str) -> f64 {
        self.fonts
            .face(self.font.weight)
            .text_width(text, self.font.size)
            / MM_TO_PT
    }

    /// Continue on the following page, keeping x.
    fn next_page(&mut self) {
        self.cursor.page += 1;
        if self.cursor.page == self.pages.len() {
            self.pages.push(Page::default());
            log::debug!("Started page {}", self.pages.len());
        }
        self.cursor.y = self.settings.margin_top;
    }

    /// Break to the next page if `h` more millimetres would cross the break line.
    /// Content taller than a whole page is placed anyway rather than looping.
    fn ensure_space(&mut self, h: f64) {
        if self.settings.auto_page_break
            && self.cursor.y + h > self.break_line()
            && self.cursor.y > self.settings.margin_top
        {
            self.next_page();
        }
    }

    fn push(&mut self, op: DrawOp) {
        self.pages[self.cursor.page].ops.push(op);
    }

    fn push_text(&mut self, x: f64, baseline: f64, text: &str) {
        self.push(DrawOp::Text {
            x,
            y: baseline,
            weight: self.font.weight,
            size: self.font.size,
            text: text.to_string(),
        });
        if self.font.underline {
            let size_mm = self.font.size_mm();
            let y = baseline + 0.1 * size_mm;
            let width = self.string_width(text);
            self.push(DrawOp::Line {
                x1: x,
                y1: y,
                x2: x + width,
                y2: y,
                width: 0.05 * size_mm,
            });
        }
    }

    fn baseline(&self, h: f64) -> f64 {
        self.cursor.y + 0.5 * h + 0.3 * self.font.size_mm()
    }

    /// Draw one cell of width `w` (0 = up to the right margin) and height `h`.
    pub fn cell(&mut self, w: f64, h: f64, text: &str, style: CellStyle) {
        self.ensure_space(h);

        let w = if w == 0.0 {
            self.right_edge() - self.cursor.x
        } else {
            w
        };
        let Cursor { x, y, .. } = self.cursor;

        if style.border || style.fill {
            self.push(DrawOp::Rect {
                x,
                y,
                w,
                h,
                stroke: style.border,
                fill: style.fill.then_some(FILL_GRAY),
                line_width: self.line_width,
            });
        }

        if !text.is_empty() {
            let margin = self.settings.cell_margin;
            let tx = match style.align {
                Align::Left => x + margin,
                Align::Right => x + w - margin - self.string_width(text),
                Align::Center => x + (w - self.string_width(text)) / 2.0,
            };
            let baseline = self.baseline(h);
            self.push_text(tx, baseline, text);
        }

        if style.new_line {
            self.cursor.x = self.settings.margin_left;
            self.cursor.y += h;
        } else {
            self.cursor.x += w;
        }
    }

    /// Wrapped text inside a column of width `w`, one `h`-high line per row.
    /// Leaves the cursor right of the block on its last line's bottom and
    /// returns that y.
    pub fn multi_cell(&mut self, w: f64, h: f64, text: &str, align: Align) -> f64 {
        let start_x = self.cursor.x;
        let w = if w == 0.0 {
            self.right_edge() - start_x
        } else {
            w
        };

        let lines = self.wrap(text, w - 2.0 * self.settings.cell_margin);
        for line in &lines {
            self.cursor.x = start_x;
            self.cell(w, h, line, CellStyle::default().align(align).new_line());
        }
        self.cursor.x = start_x + w;
        self.cursor.y
    }

    /// Inline text from the cursor, wrapping at the right margin. Font changes
    /// between calls continue on the same line; `\n` starts a new line.
    pub fn write(&mut self, h: f64, text: &str) {
        for (i, paragraph) in text.split('\n').enumerate() {
            if i > 0 {
                self.ln(h);
            }
            for token in split_words(paragraph) {
                self.write_token(h, token);
            }
        }
    }

    fn write_token(&mut self, h: f64, token: &str) {
        let left = self.settings.margin_left;
        let line_width = self.right_edge() - left;
        let mut token = token;
        let mut width = self.string_width(token);

        if self.cursor.x + width > self.right_edge() && self.cursor.x > left + 1e-6 {
            self.ln(h);
            token = token.trim_start();
            width = self.string_width(token);
        }
        if token.is_empty() {
            return;
        }

        if width > line_width {
            for chunk in self.break_word(token, line_width) {
                if self.cursor.x > left + 1e-6 {
                    self.ln(h);
                }
                self.place_inline(h, &chunk);
            }
            return;
        }

        self.place_inline(h, token);
    }

    fn place_inline(&mut self, h: f64, text: &str) {
        self.ensure_space(h);
        let baseline = self.baseline(h);
        let x = self.cursor.x;
        self.push_text(x, baseline, text);
        self.cursor.x += self.string_width(text);
    }

    /// Horizontal or arbitrary rule on the current page.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width: self.line_width,
        });
    }

    /// Rule across the printable width at the cursor's y. A cursor already past
    /// the break line moves to the next page first.
    pub fn rule(&mut self) {
        self.ensure_space(0.0);
        let y = self.cursor.y;
        let (left, right) = (self.settings.margin_left, self.right_edge());
        self.line(left, y, right, y);
    }

    /// Place an image at an absolute position; height follows the aspect ratio.
    /// The cursor does not move.
    pub fn image(&mut self, image: &'a LoadedImage, x: f64, y: f64, w: f64) -> f64 {
        let h = image.height_for_width(w);
        let index = self.images.len();
        self.images.push(image);
        self.push(DrawOp::Image { index, x, y, w, h });
        h
    }

    /// Split text into lines no wider than `max_width`.
    pub fn wrap(&self, text: &str, max_width: f64) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut current = String::new();
            for word in paragraph.split(' ') {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if self.string_width(&candidate) <= max_width {
                    current = candidate;
                    continue;
                }
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                if self.string_width(word) > max_width {
                    let mut chunks = self.break_word(word, max_width);
                    current = chunks.pop().unwrap_or_default();
                    lines.extend(chunks);
                } else {
                    current = word.to_string();
                }
            }
            lines.push(current);
        }
        lines
    }

    /// Break a word that is wider than a line into pieces, at least one
    /// character each.
    fn break_word(&self, word: &str, max_width: f64) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        for ch in word.chars() {
            current.push(ch);
            if self.string_width(&current) > max_width && current.chars().count() > 1 {
                current.pop();
                chunks.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    pub fn finish(self) -> Document<'a> {
        Document {
            settings: self.settings,
            pages: self.pages,
            images: self.images,
        }
    }
}

/// Words with their trailing spaces attached, so spacing survives font changes.
fn split_words(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = false;
    for (i, ch) in text.char_indices() {
        if ch == ' ' {
            in_space = true;
        } else if in_space {
            tokens.push(&text[start..i]);
            start = i;
            in_space = false;
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::image::decode_image_bytes;
    use crate::pdf::image::tests::jpeg_bytes;

    fn engine(fonts: &FontSet) -> LayoutEngine<'_> {
        LayoutEngine::new(fonts, PageSettings::default())
    }

    fn text_ops(doc: &Document<'_>, page: usize) -> Vec<(f64, f64, String)> {
        doc.pages[page]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, y, text, .. } => Some((*x, *y, text.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn cell_advances_right_then_wraps_to_margin() {
        let fonts = FontSet::default();
        let mut layout = engine(&fonts);
        layout.cell(70.0, 6.0, "A", CellStyle::bordered());
        assert_eq!(layout.x(), 80.0);
        layout.cell(50.0, 6.0, "B", CellStyle::bordered().new_line());
        assert_eq!((layout.x(), layout.y()), (10.0, 16.0));

        let doc = layout.finish();
        let rects = doc.pages[0]
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { stroke: true, .. }))
            .count();
        assert_eq!(rects, 2);
    }

    #[test]
    fn zero_width_cell_reaches_right_margin() {
        let fonts = FontSet::default();
        let mut layout = engine(&fonts);
        layout.set_x(50.0);
        layout.cell(0.0, 5.0, "", CellStyle::default());
        assert_eq!(layout.x(), 200.0);
    }

    #[test]
    fn alignment_positions_text() {
        let fonts = FontSet::default();
        let mut layout = engine(&fonts);
        let width = layout.string_width("1,000 €");
        layout.cell(60.0, 6.0, "1,000 €", CellStyle::default().align(Align::Right));
        layout.cell(60.0, 6.0, "X", CellStyle::default().align(Align::Center).filled());
        let doc = layout.finish();
        let texts = text_ops(&doc, 0);
        assert!((texts[0].0 - (10.0 + 60.0 - 1.0 - width)).abs() < 1e-9);
        assert!(texts[1].0 > 70.0 + 25.0 && texts[1].0 < 70.0 + 30.0);
        assert!(doc.pages[0]
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Rect { fill: Some(_), stroke: false, .. })));
    }

    #[test]
    fn filled_cells_use_light_grey() {
        let fonts = FontSet::default();
        let mut layout = engine(&fonts);
        layout.cell(20.0, 6.0, "", CellStyle::bordered().filled());
        let doc = layout.finish();
        assert!(matches!(
            doc.pages[0].ops[0],
            DrawOp::Rect { fill: Some(g), stroke: true, .. } if g == FILL_GRAY
        ));
    }

    #[test]
    fn rule_past_break_line_moves_to_next_page() {
        let fonts = FontSet::default();
        let mut layout = engine(&fonts);
        layout.set_y(291.0);
        layout.rule();
        assert_eq!(layout.cursor().page, 1);
        assert_eq!(layout.y(), 10.0);

        layout.set_y(150.0);
        layout.rule();
        let doc = layout.finish();
        assert!(doc.pages[0].ops.is_empty());
        assert!(matches!(
            doc.pages[1].ops[0],
            DrawOp::Line { y1, y2, .. } if y1 == 10.0 && y2 == 10.0
        ));
        assert_eq!(doc.pages[1].ops.len(), 2);
    }

    #[test]
    fn multi_cell_wraps_and_reports_bottom() {
        let fonts = FontSet::default();
        let mut layout = engine(&fonts);
        layout.set_font(FontSpec::regular(8.0));
        layout.set_xy(10.0, 50.0);
        let end = layout.multi_cell(45.0, 5.0, "ASHI STUDIO SAS\n9 AVENUE HOCHE\n75008 PARIS, FRANCE", Align::Left);
        assert_eq!(end, 65.0);
        assert_eq!(layout.x(), 55.0);
    }

    #[test]
    fn wrap_breaks_on_words_and_long_words() {
        let fonts = FontSet::default();
        let layout = engine(&fonts);
        let lines = layout.wrap("aaaa bbbb cccc", layout.string_width("aaaa bbbb"));
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);

        let long = "FR7630004008230001089656803";
        let lines = layout.wrap(long, 20.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), long);
        assert!(lines.iter().all(|l| layout.string_width(l) <= 20.0));

        assert_eq!(layout.wrap("a\n\nb", 50.0), vec!["a", "", "b"]);
    }

    #[test]
    fn flow_past_bottom_starts_new_page() {
        let fonts = FontSet::default();
        let mut layout = engine(&fonts);
        layout.set_y(284.0);
        layout.cell(0.0, 5.0, "kept", CellStyle::default().new_line());
        let cursor = layout.cursor();
        assert_eq!(cursor.page, 1);
        assert_eq!(cursor.y, 15.0);

        let doc = layout.finish();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].texts().count(), 0);
        assert_eq!(doc.pages[1].texts().collect::<Vec<_>>(), vec!["kept"]);
    }

    #[test]
    fn columns_overflowing_reuse_next_page() {
        let fonts = FontSet::default();
        let mut layout = engine(&fonts);
        let start = Cursor { page: 0, x: 10.0, y: 270.0 };

        layout.set_cursor(start);
        layout.multi_cell(45.0, 5.0, "a\nb\nc\nd\ne", Align::Left);
        let first = layout.cursor();

        layout.set_cursor(Cursor { x: 65.0, ..start });
        layout.multi_cell(45.0, 5.0, "a\nb\nc\nd\ne\nf", Align::Left);
        let second = layout.cursor();

        assert_eq!(first.page, 1);
        assert_eq!(second.page, 1);
        assert_eq!(first.lowest(second), second);
        assert_eq!(layout.finish().page_count(), 2);
    }

    #[test]
    fn lowest_compares_page_before_y() {
        let a = Cursor { page: 0, x: 0.0, y: 250.0 };
        let b = Cursor { page: 1, x: 0.0, y: 20.0 };
        assert_eq!(a.lowest(b), b);
        assert_eq!(b.lowest(a), b);
    }

    #[test]
    fn write_flows_across_font_changes_and_wraps() {
        let fonts = FontSet::default();
        let mut layout = engine(&fonts);
        layout.set_font(FontSpec::regular(8.0));
        layout.write(5.0, "• A first payment of ");
        let x_before = layout.x();
        layout.set_font(FontSpec::bold(8.0));
        layout.write(5.0, "50%");
        assert_eq!(layout.y(), 10.0);
        assert!(layout.x() > x_before);

        layout.set_font(FontSpec::regular(8.0));
        layout.write(5.0, &"word ".repeat(80));
        assert!(layout.y() > 10.0);
        layout.write(5.0, "\n");
        assert_eq!(layout.x(), 10.0);

        let doc = layout.finish();
        let texts = text_ops(&doc, 0);
        assert_eq!(texts[0].2, "• ");
        assert!(texts.iter().any(|(_, _, t)| t == "50%"));
        assert!(texts.iter().all(|(x, _, _)| *x < 200.0));
    }

    #[test]
    fn underline_adds_rule_under_text() {
        let fonts = FontSet::default();
        let mut layout = engine(&fonts);
        layout.set_font(FontSpec::bold(8.0).underlined());
        layout.cell(40.0, 5.0, "IBAN:", CellStyle::default());
        let doc = layout.finish();
        assert!(doc.pages[0].ops.iter().any(|op| matches!(op, DrawOp::Line { .. })));
    }

    #[test]
    fn image_keeps_aspect_ratio_and_cursor() {
        let fonts = FontSet::default();
        let logo = decode_image_bytes(&jpeg_bytes(60, 30)).unwrap();
        let mut layout = engine(&fonts);
        let h = layout.image(&logo, 90.0, 10.0, 30.0);
        assert_eq!(h, 15.0);
        assert_eq!((layout.x(), layout.y()), (10.0, 10.0));
        let doc = layout.finish();
        assert_eq!(doc.images.len(), 1);
    }

    #[test]
    fn split_words_keeps_trailing_spaces() {
        assert_eq!(split_words("A first  payment"), vec!["A ", "first  ", "payment"]);
        assert_eq!(split_words(" lead"), vec![" ", "lead"]);
        assert!(split_words("").is_empty());
    }
}
