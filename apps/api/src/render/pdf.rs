//! PDF backend built on `printpdf` with the built-in Helvetica faces.
//!
//! Built-in fonts need no font files but only cover WinAnsi text, so every
//! string is folded through [`pdf_safe`] before it is measured or drawn.
//! The document handle is not `Send`; build it entirely on one thread.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};

use super::font_metrics::{get_metrics, FontFace};
use super::layout::Block;
use super::RenderError;

/// Page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageStyle {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl Default for PageStyle {
    /// A4 with the resume margins.
    fn default() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_left: 40.0,
            margin_right: 40.0,
            margin_top: 54.0,
            margin_bottom: 40.0,
        }
    }
}

impl PageStyle {
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    face: FontFace,
    size: f32,
    leading: f32,
    color: (u8, u8, u8),
    align: Align,
    indent: f32,
    space_before: f32,
    space_after: f32,
}

const INK: (u8, u8, u8) = (0x11, 0x18, 0x27);
const MUTED: (u8, u8, u8) = (0x37, 0x41, 0x51);
const GREY: (u8, u8, u8) = (0x6B, 0x72, 0x80);
const ACCENT: (u8, u8, u8) = (0x0D, 0x47, 0xA1);
const RULE: (u8, u8, u8) = (0xE5, 0xE7, 0xEB);

const BODY: TextStyle = TextStyle {
    face: FontFace::Helvetica,
    size: 10.0,
    leading: 14.0,
    color: INK,
    align: Align::Left,
    indent: 0.0,
    space_before: 0.0,
    space_after: 0.0,
};

const BULLET_INDENT: f32 = 12.0;
const BULLET_MARKER: &str = "-";
const RULE_THICKNESS: f32 = 1.0;

fn style_for(block: &Block) -> TextStyle {
    match block {
        Block::Name(_) => TextStyle {
            face: FontFace::HelveticaBold,
            size: 18.0,
            leading: 22.0,
            align: Align::Center,
            ..BODY
        },
        Block::Role(_) => TextStyle {
            size: 12.0,
            leading: 16.0,
            color: MUTED,
            align: Align::Center,
            ..BODY
        },
        Block::Contact(_) => TextStyle {
            color: GREY,
            align: Align::Center,
            ..BODY
        },
        Block::Heading(_) => TextStyle {
            face: FontFace::HelveticaBold,
            size: 11.0,
            color: ACCENT,
            space_before: 12.0,
            space_after: 6.0,
            ..BODY
        },
        Block::EntryHeader(_) => TextStyle {
            face: FontFace::HelveticaBold,
            ..BODY
        },
        Block::Bullet(_) => TextStyle {
            indent: BULLET_INDENT,
            ..BODY
        },
        _ => BODY,
    }
}

/// Folds text into what the built-in WinAnsi fonts can show.
/// Dashes, bullets and smart quotes become ASCII; other non-Latin-1 chars become `?`.
pub fn pdf_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2014}' | '\u{2013}' | '\u{2012}' | '\u{2212}' => out.push('-'),
            '\u{2022}' | '\u{00B7}' | '\u{25AA}' | '\u{2023}' | '\u{25CF}' => out.push('-'),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\u{2009}' | '\u{202F}' | '\t' => out.push(' '),
            c if c.is_control() => {}
            c if (c as u32) < 0x100 => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn pdf_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(e.to_string())
}

/// Cursor over the pages of one document. `cursor` is the distance from the page top.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    page: PageStyle,
    cursor: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str, page: PageStyle) -> Result<Self, RenderError> {
        let (doc, page_idx, layer_idx) =
            PdfDocument::new(title, mm(page.width), mm(page.height), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            page,
            cursor: page.margin_top,
            pages: 1,
        })
    }

    fn bottom(&self) -> f32 {
        self.page.height - self.page.margin_bottom
    }

    fn new_page(&mut self) {
        let (page_idx, layer_idx) =
            self.doc
                .add_page(mm(self.page.width), mm(self.page.height), "Layer 1");
        self.layer = self.doc.get_page(page_idx).get_layer(layer_idx);
        self.cursor = self.page.margin_top;
        self.pages += 1;
    }

    /// Breaks the page unless `height` more points fit. A fresh page always accepts.
    fn ensure_space(&mut self, height: f32) {
        if self.cursor + height > self.bottom() && self.cursor > self.page.margin_top {
            self.new_page();
        }
    }

    fn skip(&mut self, height: f32) {
        // Gaps never carry over to the next page.
        self.cursor = (self.cursor + height).min(self.bottom());
    }

    fn font(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Helvetica => &self.regular,
            FontFace::HelveticaBold => &self.bold,
        }
    }

    fn draw_line_of_text(&self, text: &str, x: f32, style: &TextStyle) {
        let baseline = self.page.height - (self.cursor + style.size);
        self.layer.set_fill_color(rgb(style.color));
        self.layer
            .use_text(text, style.size, mm(x), mm(baseline), self.font(style.face));
    }

    fn write_text(&mut self, text: &str, style: &TextStyle, bullet: bool) {
        let metrics = get_metrics(style.face);
        let text = pdf_safe(text);
        let width = self.page.content_width() - style.indent;
        let lines = metrics.wrap(&text, style.size, width);
        if lines.is_empty() {
            return;
        }

        if style.space_before > 0.0 {
            self.skip(style.space_before);
        }
        // Keep a heading together with at least one following line.
        let keep = if style.space_after > 0.0 {
            style.leading + style.space_after + BODY.leading
        } else {
            style.leading
        };
        self.ensure_space(keep);

        for (i, line) in lines.iter().enumerate() {
            self.ensure_space(style.leading);
            let x = match style.align {
                Align::Left => self.page.margin_left + style.indent,
                Align::Center => {
                    let line_w = metrics.measure(line, style.size);
                    self.page.margin_left + ((self.page.content_width() - line_w) / 2.0).max(0.0)
                }
            };
            if bullet && i == 0 {
                self.draw_line_of_text(BULLET_MARKER, self.page.margin_left + 2.0, style);
            }
            self.draw_line_of_text(line, x, style);
            self.cursor += style.leading;
        }

        if style.space_after > 0.0 {
            self.skip(style.space_after);
        }
    }

    fn write_rule(&mut self) {
        self.ensure_space(RULE_THICKNESS);
        let y = self.page.height - self.cursor;
        let rule = Line {
            points: vec![
                (Point::new(mm(self.page.margin_left), mm(y)), false),
                (
                    Point::new(mm(self.page.width - self.page.margin_right), mm(y)),
                    false,
                ),
            ],
            is_closed: false,
        };
        self.layer.set_outline_color(rgb(RULE));
        self.layer.set_outline_thickness(RULE_THICKNESS);
        self.layer.add_line(rule);
        self.cursor += RULE_THICKNESS;
    }

    fn write_block(&mut self, block: &Block) {
        let style = style_for(block);
        match block {
            Block::Divider => self.write_rule(),
            Block::Spacer(height) => self.skip(*height),
            Block::Bullet(text) => self.write_text(text, &style, true),
            Block::Name(text)
            | Block::Role(text)
            | Block::Contact(text)
            | Block::Heading(text)
            | Block::EntryHeader(text)
            | Block::Paragraph(text) => self.write_text(text, &style, false),
        }
    }

    fn finish(self) -> Result<(Vec<u8>, usize), RenderError> {
        let Self {
            doc, layer, pages, ..
        } = self;
        drop(layer);
        let bytes = doc.save_to_bytes().map_err(pdf_err)?;
        Ok((bytes, pages))
    }
}

/// Renders blocks to PDF bytes. An empty block list yields a blank single page.
pub fn render_pdf(blocks: &[Block], style: &PageStyle) -> Result<Vec<u8>, RenderError> {
    build_pdf(blocks, style).map(|(bytes, _)| bytes)
}

fn build_pdf(blocks: &[Block], style: &PageStyle) -> Result<(Vec<u8>, usize), RenderError> {
    let mut writer = PageWriter::new("Resume", *style)?;
    for block in blocks {
        writer.write_block(block);
    }
    writer.finish()
}
