use pdf_writer::{Content, Name, Str};

use crate::fonts::{FontEntry, encode_as_gids};
use crate::layout::{
    CELL_PADDING, CardCanvas, CellRect, DASH_GAP, DASH_LENGTH, FONT_SIZE, LINE_HEIGHT, Point,
    SEPARATOR_GRAY, SEPARATOR_WIDTH, centered_block_top, centered_line_x, dash_segments,
};
use crate::text::wrap_lines;

/// Collects one content stream per page. Incoming coordinates have a top-left
/// origin and are flipped to PDF's bottom-left origin here.
pub(super) struct PdfCanvas<'a> {
    font: &'a FontEntry,
    page_height: f32,
    pages: Vec<Content>,
}

impl<'a> PdfCanvas<'a> {
    pub(super) fn new(font: &'a FontEntry, page_height: f32) -> Self {
        Self {
            font,
            page_height,
            pages: Vec::new(),
        }
    }

    pub(super) fn into_pages(self) -> Vec<Content> {
        self.pages
    }

    fn content(&mut self) -> &mut Content {
        if self.pages.is_empty() {
            self.pages.push(Content::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn flip(&self, y: f32) -> f32 {
        self.page_height - y
    }

    /// Baseline of a line whose box starts at `line_top`, centring the font's
    /// ascender..descender span in the line box.
    fn baseline(&self, line_top: f32) -> f32 {
        let span = (self.font.ascender_ratio - self.font.descender_ratio) * FONT_SIZE;
        line_top + (LINE_HEIGHT - span) / 2.0 + self.font.ascender_ratio * FONT_SIZE
    }
}

impl CardCanvas for PdfCanvas<'_> {
    fn begin_page(&mut self) {
        self.pages.push(Content::new());
    }

    fn set_separator_style(&mut self) {
        let c = self.content();
        c.set_line_width(SEPARATOR_WIDTH);
        c.set_stroke_gray(SEPARATOR_GRAY);
    }

    fn draw_dashed_segment(&mut self, from: Point, to: Point) {
        let segments = dash_segments(from, to, DASH_LENGTH, DASH_GAP);
        if segments.is_empty() {
            return;
        }
        let page_height = self.page_height;
        let c = self.content();
        for (a, b) in segments {
            c.move_to(a.x, page_height - a.y);
            c.line_to(b.x, page_height - b.y);
        }
        c.stroke();
    }

    fn reset_stroke_style(&mut self) {
        self.content().set_stroke_gray(0.0);
    }

    fn draw_text(&mut self, cell: &CellRect, text: &str) {
        let font = self.font;
        let max_width = cell.width - 2.0 * CELL_PADDING;
        let lines = wrap_lines(text, max_width, |s| font.text_width(s, FONT_SIZE));
        if lines.iter().all(|l| l.is_empty()) {
            return;
        }
        let top = centered_block_top(cell, lines.len(), LINE_HEIGHT);

        let placed: Vec<(f32, f32, Vec<u8>)> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(i, line)| {
                let x = centered_line_x(cell, font.text_width(line, FONT_SIZE));
                let y = self.flip(self.baseline(top + i as f32 * LINE_HEIGHT));
                (x, y, encode_as_gids(line, &font.char_to_gid))
            })
            .collect();

        let c = self.content();
        c.begin_text();
        c.set_fill_gray(0.0);
        c.set_font(Name(font.pdf_name.as_bytes()), FONT_SIZE);
        for (x, y, bytes) in &placed {
            c.set_text_matrix([1.0, 0.0, 0.0, 1.0, *x, *y]);
            c.show(Str(bytes));
        }
        c.end_text();
    }
}
