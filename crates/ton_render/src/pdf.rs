//! Paginated PDF magazine rendering.
//!
//! Layout is a simple top-down cursor on A4 pages with the builtin fonts:
//! a cover page, one page per section, and a closing puzzle page with both
//! Sudoku grids set in Courier so the columns line up.

use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex, PdfPageIndex};
use tracing::instrument;

use ton_content::{MagazineContent, PostSummary};
use ton_error::{RenderError, RenderErrorKind, TonResult};

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 6.0;
const WRAP_COLUMNS: usize = 90;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

/// A top-down text cursor on one page.
struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(doc: &'a PdfDocumentReference, page: PdfPageIndex, layer: PdfLayerIndex) -> Self {
        Self {
            doc,
            page,
            layer,
            y: PAGE_HEIGHT.0 - MARGIN,
        }
    }

    /// Write one line and advance. Overflowing the bottom margin starts a
    /// fresh page.
    fn line(&mut self, text: &str, font: &IndirectFontRef, size: f32) {
        if self.y < MARGIN {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "content");
            self.page = page;
            self.layer = layer;
            self.y = PAGE_HEIGHT.0 - MARGIN;
        }
        let layer = self.doc.get_page(self.page).get_layer(self.layer);
        layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT * (size / 10.0).max(1.0);
    }

    fn paragraph(&mut self, text: &str, font: &IndirectFontRef, size: f32) {
        for line in wrap(text, WRAP_COLUMNS) {
            self.line(&line, font, size);
        }
        self.gap(0.5);
    }

    fn gap(&mut self, lines: f32) {
        self.y -= LINE_HEIGHT * lines;
    }
}

/// Greedy word wrap by character count; the builtin fonts are close enough
/// to uniform for body text at this column width.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > columns {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn grid_lines(grid: &[Vec<u8>]) -> Vec<String> {
    grid.iter()
        .map(|row| {
            row.iter()
                .map(|&c| {
                    if c == 0 {
                        ".".to_string()
                    } else {
                        c.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect()
}

/// Render a magazine as a paginated A4 PDF and return its bytes.
#[instrument(skip(content, posts), fields(sections = content.sections.len()))]
pub fn render_pdf(content: &MagazineContent, posts: &[PostSummary]) -> TonResult<Vec<u8>> {
    let (doc, cover_page, cover_layer) =
        PdfDocument::new(&content.title, PAGE_WIDTH, PAGE_HEIGHT, "cover");
    let font_err = |e: printpdf::Error| RenderError::new(RenderErrorKind::Font(e.to_string()));
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(font_err)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(font_err)?,
        mono: doc.add_builtin_font(BuiltinFont::Courier).map_err(font_err)?,
    };

    // Cover: title, date, highlights, introduction.
    let mut cursor = Cursor::new(&doc, cover_page, cover_layer);
    cursor.line(&content.title, &fonts.bold, 24.0);
    cursor.line(&Utc::now().format("%-d %B %Y").to_string(), &fonts.regular, 11.0);
    cursor.gap(1.5);
    if !content.highlights.is_empty() {
        cursor.line("IN THIS ISSUE", &fonts.bold, 12.0);
        for highlight in &content.highlights {
            cursor.line(&format!("•  {highlight}"), &fonts.regular, 11.0);
        }
        cursor.gap(1.5);
    }
    for paragraph in &content.introduction {
        cursor.paragraph(paragraph, &fonts.regular, 11.0);
    }

    // One page per section.
    for section in &content.sections {
        let (page, layer) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "section");
        let mut cursor = Cursor::new(&doc, page, layer);
        cursor.line(&section.title, &fonts.bold, 18.0);
        cursor.gap(1.0);
        for paragraph in &section.summary {
            cursor.paragraph(paragraph, &fonts.regular, 11.0);
        }
        cursor.gap(1.0);
        for slug in &section.article_slugs {
            if let Some(post) = posts.iter().find(|p| &p.slug == slug) {
                cursor.line(&post.title, &fonts.bold, 12.0);
                if !post.tags.is_empty() {
                    cursor.line(&post.tags.join(" · "), &fonts.regular, 9.0);
                }
                if !post.cover_image.is_empty() {
                    cursor.line(&post.cover_image, &fonts.regular, 8.0);
                }
                cursor.paragraph(&post.excerpt, &fonts.regular, 10.0);
            }
        }
    }

    // Closing puzzle page.
    let (page, layer) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "puzzle");
    let mut cursor = Cursor::new(&doc, page, layer);
    cursor.line("Sudoku", &fonts.bold, 18.0);
    cursor.gap(1.0);
    cursor.line("Puzzle", &fonts.bold, 12.0);
    for row in grid_lines(&content.sudoku.puzzle) {
        cursor.line(&row, &fonts.mono, 11.0);
    }
    cursor.gap(1.5);
    cursor.line("Solution", &fonts.bold, 12.0);
    for row in grid_lines(&content.sudoku.solution) {
        cursor.line(&row, &fonts.mono, 11.0);
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::new(RenderErrorKind::Pdf(e.to_string())).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ton_content::{MagazineSection, SudokuPair};
    use uuid::Uuid;

    #[test]
    fn wrap_respects_the_column_budget() {
        let lines = wrap(&"word ".repeat(50), 20);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.join(" "), "word ".repeat(50).trim_end());
    }

    #[test]
    fn renders_a_nonempty_pdf() {
        let content = MagazineContent {
            title: "Talk of Nations Weekly".to_string(),
            introduction: vec!["A big week for Kenyan energy.".to_string()],
            sections: vec![MagazineSection {
                title: "Economy".to_string(),
                summary: vec!["Power and payments moved fast.".to_string()],
                article_slugs: vec!["geothermal-boom".to_string()],
            }],
            highlights: vec!["Geothermal hits 50%".to_string()],
            sudoku: SudokuPair {
                puzzle: vec![vec![0; 9]; 9],
                solution: vec![vec![5; 9]; 9],
            },
        };
        let posts = vec![PostSummary {
            id: Uuid::from_u128(1),
            title: "Geothermal Boom".to_string(),
            slug: "geothermal-boom".to_string(),
            excerpt: "Olkaria's steam fields now supply nearly half the grid.".to_string(),
            tags: vec!["Business".to_string()],
            cover_image: "https://example.com/a.jpg".to_string(),
        }];
        let bytes = render_pdf(&content, &posts).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }
}
