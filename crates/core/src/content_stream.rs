//! PDF content-stream generation for exported draw commands
//!
//! Produces one operator stream per page that a PDF writer can append to the
//! page's existing contents. Document space has its origin at the top-left
//! with y growing downward; PDF space has its origin at the bottom-left, so
//! every y coordinate is flipped against the page height.

use crate::export::{DocumentWriter, DrawCommand};
use crate::geometry::{Bounds, PageSize, RgbF};
use crate::renderer::PageRenderer;
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

/// Bezier control distance for a quarter circle
const KAPPA: f32 = 0.552_284_8;

/// Resource name of the text font inside the page's font dictionary
pub const TEXT_FONT_RESOURCE: &str = "Helv";

/// Inset of the first text baseline from the box's left edge
const TEXT_INSET: f32 = 2.0;

#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("no page size known for page {0}")]
    UnknownPage(usize),
    #[error("content stream formatting failed")]
    Format(#[from] std::fmt::Error),
}

/// [`DocumentWriter`] that renders commands to PDF operator text
#[derive(Debug, Clone, Default)]
pub struct ContentStreamWriter {
    page_sizes: Vec<PageSize>,
    streams: BTreeMap<usize, String>,
}

impl ContentStreamWriter {
    pub fn new(page_sizes: Vec<PageSize>) -> Self {
        Self {
            page_sizes,
            streams: BTreeMap::new(),
        }
    }

    /// Take page sizes from a page renderer, stopping at the first page
    /// whose size is unknown
    pub fn from_renderer(renderer: &dyn PageRenderer) -> Self {
        let mut page_sizes = Vec::with_capacity(renderer.page_count());
        for page in 0..renderer.page_count() {
            match renderer.page_size(page) {
                Some(size) => page_sizes.push(size),
                None => break,
            }
        }
        Self::new(page_sizes)
    }

    /// Stream text for a page, if anything was written to it
    pub fn stream(&self, page: usize) -> Option<&str> {
        self.streams.get(&page).map(String::as_str)
    }

    /// All written streams, ascending by page
    pub fn into_streams(self) -> BTreeMap<usize, String> {
        self.streams
    }
}

impl DocumentWriter for ContentStreamWriter {
    type Error = WriterError;

    fn write_page(&mut self, page: usize, commands: &[DrawCommand]) -> Result<(), WriterError> {
        let size = self
            .page_sizes
            .get(page)
            .copied()
            .ok_or(WriterError::UnknownPage(page))?;

        let stream = self.streams.entry(page).or_default();
        for command in commands {
            write_command(stream, command, size.height)?;
        }
        Ok(())
    }
}

fn write_command(out: &mut String, command: &DrawCommand, page_height: f32) -> Result<(), WriterError> {
    writeln!(out, "q")?;
    match command {
        DrawCommand::StrokeLine {
            start,
            end,
            stroke,
            width,
        } => {
            write_stroke(out, stroke, *width)?;
            writeln!(out, "{} {} m", start.x, page_height - start.y)?;
            writeln!(out, "{} {} l", end.x, page_height - end.y)?;
            writeln!(out, "S")?;
        }
        DrawCommand::StrokeRect {
            bounds,
            stroke,
            width,
        } => {
            write_stroke(out, stroke, *width)?;
            write_rect(out, bounds, page_height)?;
            writeln!(out, "S")?;
        }
        DrawCommand::StrokeEllipse {
            bounds,
            stroke,
            width,
        } => {
            write_stroke(out, stroke, *width)?;
            write_ellipse(out, bounds, page_height)?;
            writeln!(out, "s")?;
        }
        DrawCommand::TextBox {
            bounds,
            stroke,
            width,
            fill,
            text,
            font_size,
            text_color,
        } => {
            write_stroke(out, stroke, *width)?;
            write_rect(out, bounds, page_height)?;
            match fill {
                Some(fill) => {
                    writeln!(out, "{} {} {} rg", fill.r, fill.g, fill.b)?;
                    writeln!(out, "B")?;
                }
                None => writeln!(out, "S")?,
            }
            write_text(out, bounds, text, *font_size, text_color, page_height)?;
        }
    }
    writeln!(out, "Q")?;
    Ok(())
}

fn write_stroke(out: &mut String, stroke: &RgbF, width: f32) -> Result<(), WriterError> {
    writeln!(out, "{} {} {} RG", stroke.r, stroke.g, stroke.b)?;
    writeln!(out, "{} w", width)?;
    Ok(())
}

fn write_rect(out: &mut String, bounds: &Bounds, page_height: f32) -> Result<(), WriterError> {
    writeln!(
        out,
        "{} {} {} {} re",
        bounds.left(),
        page_height - bounds.bottom(),
        bounds.width(),
        bounds.height()
    )?;
    Ok(())
}

fn write_ellipse(out: &mut String, bounds: &Bounds, page_height: f32) -> Result<(), WriterError> {
    let center = bounds.center();
    let cx = center.x;
    let cy = page_height - center.y;
    let rx = bounds.width() / 2.0;
    let ry = bounds.height() / 2.0;
    let kx = rx * KAPPA;
    let ky = ry * KAPPA;

    writeln!(out, "{} {} m", cx + rx, cy)?;
    writeln!(out, "{} {} {} {} {} {} c", cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry)?;
    writeln!(out, "{} {} {} {} {} {} c", cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy)?;
    writeln!(out, "{} {} {} {} {} {} c", cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry)?;
    writeln!(out, "{} {} {} {} {} {} c", cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy)?;
    Ok(())
}

fn write_text(
    out: &mut String,
    bounds: &Bounds,
    text: &str,
    font_size: f32,
    color: &RgbF,
    page_height: f32,
) -> Result<(), WriterError> {
    if text.is_empty() {
        return Ok(());
    }

    let baseline = page_height - bounds.top() - font_size;
    writeln!(out, "BT")?;
    writeln!(out, "/{} {} Tf", TEXT_FONT_RESOURCE, font_size)?;
    writeln!(out, "{} TL", font_size * 1.2)?;
    writeln!(out, "{} {} {} rg", color.r, color.g, color.b)?;
    writeln!(out, "{} {} Td", bounds.left() + TEXT_INSET, baseline)?;
    for (index, line) in text.lines().enumerate() {
        if index > 0 {
            writeln!(out, "T*")?;
        }
        writeln!(out, "({}) Tj", escape_pdf_string(line))?;
    }
    writeln!(out, "ET")?;
    Ok(())
}

/// Escape a string for use inside a PDF literal string `( ... )`
///
/// The text font is expected to use `WinAnsiEncoding`. Characters outside
/// ASCII are written as octal escapes of their WinAnsi code, and characters
/// WinAnsi cannot represent become `?`.
pub fn escape_pdf_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            ' '..='~' => escaped.push(ch),
            _ => match win_ansi_code(ch) {
                Some(code) => escaped.push_str(&format!("\\{code:03o}")),
                None => escaped.push('?'),
            },
        }
    }
    escaped
}

/// WinAnsi byte for a non-ASCII character
fn win_ansi_code(ch: char) -> Option<u8> {
    let code = match ch {
        '\u{a0}'..='\u{ff}' => ch as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DocPoint;
    use crate::renderer::StaticPages;

    const RED: RgbF = RgbF { r: 1.0, g: 0.0, b: 0.0 };

    fn bounds() -> Bounds {
        Bounds::from_corners(DocPoint::new(10.0, 10.0), DocPoint::new(110.0, 60.0))
    }

    fn letter_writer() -> ContentStreamWriter {
        ContentStreamWriter::new(vec![PageSize::default()])
    }

    #[test]
    fn test_rect_flips_y() {
        let mut writer = letter_writer();
        writer
            .write_page(
                0,
                &[DrawCommand::StrokeRect {
                    bounds: bounds(),
                    stroke: RED,
                    width: 2.0,
                }],
            )
            .unwrap();

        let stream = writer.stream(0).unwrap();
        assert_eq!(stream, "q\n1 0 0 RG\n2 w\n10 732 100 50 re\nS\nQ\n");
    }

    #[test]
    fn test_line_flips_endpoints() {
        let mut writer = letter_writer();
        writer
            .write_page(
                0,
                &[DrawCommand::StrokeLine {
                    start: DocPoint::new(0.0, 0.0),
                    end: DocPoint::new(100.0, 92.0),
                    stroke: RED,
                    width: 2.0,
                }],
            )
            .unwrap();

        let stream = writer.stream(0).unwrap();
        assert!(stream.contains("0 792 m\n"));
        assert!(stream.contains("100 700 l\n"));
    }

    #[test]
    fn test_ellipse_uses_four_curves() {
        let mut writer = letter_writer();
        writer
            .write_page(
                0,
                &[DrawCommand::StrokeEllipse {
                    bounds: bounds(),
                    stroke: RED,
                    width: 2.0,
                }],
            )
            .unwrap();

        let stream = writer.stream(0).unwrap();
        assert!(stream.contains("110 757 m\n"));
        assert_eq!(stream.lines().filter(|line| line.ends_with(" c")).count(), 4);
        assert!(stream.contains("\ns\n"));
    }

    #[test]
    fn test_text_box_with_fill() {
        let mut writer = letter_writer();
        writer
            .write_page(
                0,
                &[DrawCommand::TextBox {
                    bounds: bounds(),
                    stroke: RED,
                    width: 2.0,
                    fill: Some(RgbF { r: 1.0, g: 1.0, b: 0.0 }),
                    text: "Exit (north)\nStairs".to_string(),
                    font_size: 12.0,
                    text_color: RgbF { r: 0.0, g: 0.0, b: 0.0 },
                }],
            )
            .unwrap();

        let stream = writer.stream(0).unwrap();
        assert!(stream.contains("1 1 0 rg\nB\n"));
        assert!(stream.contains("/Helv 12 Tf\n"));
        assert!(stream.contains("12 770 Td\n"));
        assert!(stream.contains("(Exit \\(north\\)) Tj\nT*\n(Stairs) Tj\n"));
        assert!(stream.ends_with("ET\nQ\n"));
    }

    #[test]
    fn test_unknown_page_fails() {
        let mut writer = letter_writer();
        let result = writer.write_page(3, &[]);
        assert!(matches!(result, Err(WriterError::UnknownPage(3))));
    }

    #[test]
    fn test_from_renderer() {
        let pages = StaticPages::uniform(2, PageSize::new(100.0, 100.0));
        let mut writer = ContentStreamWriter::from_renderer(&pages);
        assert!(writer.write_page(1, &[]).is_ok());
        assert!(writer.write_page(2, &[]).is_err());
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(escape_pdf_string("a\\b(c)"), "a\\\\b\\(c\\)");
        assert_eq!(escape_pdf_string("plain"), "plain");
    }

    #[test]
    fn test_escape_non_ascii_uses_win_ansi() {
        assert_eq!(escape_pdf_string("Café"), "Caf\\351");
        assert_eq!(escape_pdf_string("5€ – “ok”"), "5\\200 \\226 \\223ok\\224");
        assert_eq!(escape_pdf_string("日本"), "??");
        assert_eq!(escape_pdf_string("a\u{7}b"), "a?b");
    }

    #[test]
    fn test_text_box_output_is_ascii() {
        let mut writer = letter_writer();
        writer
            .write_page(
                0,
                &[DrawCommand::TextBox {
                    bounds: bounds(),
                    stroke: RED,
                    width: 2.0,
                    fill: None,
                    text: "Größe".to_string(),
                    font_size: 12.0,
                    text_color: RgbF { r: 0.0, g: 0.0, b: 0.0 },
                }],
            )
            .unwrap();

        let stream = writer.stream(0).unwrap();
        assert!(stream.is_ascii());
        assert!(stream.contains("(Gr\\366\\337e) Tj\n"));
    }
}
