//! Card grid geometry and pagination.
//!
//! Coordinates here are PDF points with a top-left origin and `y` growing
//! downwards, which is how cells are naturally addressed (cell 0 is the
//! top-left card). Backends flip to their own coordinate system.

use crate::error::Error;
use crate::text;

/// One millimetre in PDF points.
pub const MM: f32 = 72.0 / 25.4;

pub const DEFAULT_GROUPS: u32 = 9;
pub const DEFAULT_COLUMNS: u32 = 3;
pub const DEFAULT_ROWS: u32 = 3;

pub const FONT_SIZE: f32 = 12.0;
pub const LINE_HEIGHT: f32 = 8.0 * MM;
pub const CELL_PADDING: f32 = 1.0 * MM;

pub const SEPARATOR_WIDTH: f32 = 0.1 * MM;
pub const SEPARATOR_GRAY: f32 = 180.0 / 255.0;
pub const DASH_LENGTH: f32 = 1.0 * MM;
pub const DASH_GAP: f32 = 1.0 * MM;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CellRect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// Portrait A4 with 10 mm margins on every side.
    pub fn a4() -> Self {
        Self {
            width: 210.0 * MM,
            height: 297.0 * MM,
            margin: 10.0 * MM,
        }
    }

    pub fn printable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn printable_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// How duplicates of different topics are allowed to mix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PagePolicy {
    /// Every topic starts on a fresh page; a partly filled last page is left
    /// partly empty rather than shared with the next topic.
    #[default]
    FreshPagePerTopic,
    /// The topic list is repeated `groups` times as one continuous card
    /// stream (t1, t2, .., tn, t1, t2, ..) with a page break every
    /// `columns * rows` cards.
    Packed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    pub groups: u32,
    pub columns: u32,
    pub rows: u32,
    pub policy: PagePolicy,
    pub geometry: PageGeometry,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GROUPS, DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}

impl LayoutConfig {
    pub fn new(groups: u32, columns: u32, rows: u32) -> Self {
        Self {
            groups,
            columns,
            rows,
            policy: PagePolicy::default(),
            geometry: PageGeometry::a4(),
        }
    }

    /// Build a config from user-supplied numbers, rejecting anything below 1.
    pub fn from_raw(groups: i64, columns: i64, rows: i64) -> Result<Self, Error> {
        Ok(Self::new(
            positive("groups", groups)?,
            positive("cols", columns)?,
            positive("rows", rows)?,
        ))
    }

    pub fn with_policy(mut self, policy: PagePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        positive("groups", i64::from(self.groups))?;
        positive("cols", i64::from(self.columns))?;
        positive("rows", i64::from(self.rows))?;
        Ok(())
    }

    pub fn cards_per_page(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn total_cards(&self, topic_count: usize) -> usize {
        topic_count * self.groups as usize
    }

    /// Number of pages [`paginate`] will emit for `topic_count` topics.
    pub fn expected_pages(&self, topic_count: usize) -> usize {
        let per_page = self.cards_per_page().max(1);
        match self.policy {
            PagePolicy::FreshPagePerTopic => {
                topic_count * (self.groups as usize).div_ceil(per_page)
            }
            PagePolicy::Packed => self.total_cards(topic_count).div_ceil(per_page),
        }
    }
}

fn positive(name: &'static str, value: i64) -> Result<u32, Error> {
    match u32::try_from(value) {
        Ok(v) if v >= 1 => Ok(v),
        _ => Err(Error::InvalidParameter { name, value }),
    }
}

/// A card slot on the page, with the crop marks it is responsible for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSlot {
    pub index: usize,
    pub column: usize,
    pub row: usize,
    pub rect: CellRect,
    pub separator_right: bool,
    pub separator_bottom: bool,
}

pub struct Grid {
    columns: usize,
    rows: usize,
    origin: Point,
    cell_width: f32,
    cell_height: f32,
}

impl Grid {
    pub fn new(config: &LayoutConfig) -> Self {
        let g = &config.geometry;
        Self {
            columns: config.columns as usize,
            rows: config.rows as usize,
            origin: Point {
                x: g.margin,
                y: g.margin,
            },
            cell_width: g.printable_width() / config.columns as f32,
            cell_height: g.printable_height() / config.rows as f32,
        }
    }

    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    /// Row-major slot: index 0 is top-left, then left to right, top to bottom.
    pub fn slot(&self, index: usize) -> CellSlot {
        let column = index % self.columns;
        let row = index / self.columns;
        CellSlot {
            index,
            column,
            row,
            rect: CellRect {
                x: self.origin.x + column as f32 * self.cell_width,
                y: self.origin.y + row as f32 * self.cell_height,
                width: self.cell_width,
                height: self.cell_height,
            },
            // Outer page edges never get a crop mark
            separator_right: column + 1 < self.columns,
            separator_bottom: row + 1 < self.rows,
        }
    }
}

/// Top edge of a block of `line_count` lines centred vertically in `cell`.
pub fn centered_block_top(cell: &CellRect, line_count: usize, line_height: f32) -> f32 {
    let block = line_count.max(1) as f32 * line_height;
    cell.y + (cell.height - block) / 2.0
}

/// Left edge of a line `line_width` wide centred horizontally in `cell`.
pub fn centered_line_x(cell: &CellRect, line_width: f32) -> f32 {
    cell.x + (cell.width - line_width) / 2.0
}

/// Split the segment `from -> to` into dashes of `dash` length separated by
/// `gap`. The last dash is clipped at `to`.
pub fn dash_segments(from: Point, to: Point, dash: f32, gap: f32) -> Vec<(Point, Point)> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = dx.hypot(dy);
    if len <= f32::EPSILON || dash <= 0.0 {
        return Vec::new();
    }
    let (ux, uy) = (dx / len, dy / len);
    let at = |d: f32| Point {
        x: from.x + ux * d,
        y: from.y + uy * d,
    };
    let step = dash + gap.max(0.0);
    let mut segments = Vec::new();
    let mut pos = 0.0f32;
    while len - pos > 1e-3 {
        segments.push((at(pos), at((pos + dash).min(len))));
        pos += step;
    }
    segments
}

/// Drawing capability the paginator renders cards through.
pub trait CardCanvas {
    /// Start a new, empty page; subsequent drawing goes there.
    fn begin_page(&mut self);
    /// Thin light-gray stroke for crop marks.
    fn set_separator_style(&mut self);
    fn draw_dashed_segment(&mut self, from: Point, to: Point);
    /// Back to the default black stroke.
    fn reset_stroke_style(&mut self);
    /// Draw already-normalized `text` centred in `cell`.
    fn draw_text(&mut self, cell: &CellRect, text: &str);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaginationSummary {
    pub pages: usize,
    pub cards: usize,
}

/// Lay every topic out `config.groups` times across as many pages as needed.
pub fn paginate<C: CardCanvas>(
    topics: &[String],
    config: &LayoutConfig,
    canvas: &mut C,
) -> Result<PaginationSummary, Error> {
    config.validate()?;
    let grid = Grid::new(config);
    let per_page = grid.capacity();
    let groups = config.groups as usize;
    let texts: Vec<String> = topics.iter().map(|t| text::normalize(t)).collect();

    let mut summary = PaginationSummary::default();
    match config.policy {
        PagePolicy::FreshPagePerTopic => {
            for (ti, text) in texts.iter().enumerate() {
                let mut remaining = groups;
                while remaining > 0 {
                    canvas.begin_page();
                    summary.pages += 1;
                    let placed = remaining.min(per_page);
                    log::debug!(
                        "Page {}: topic {} x{placed}",
                        summary.pages,
                        ti + 1
                    );
                    for index in 0..placed {
                        render_card(canvas, &grid.slot(index), text);
                    }
                    remaining -= placed;
                    summary.cards += placed;
                }
            }
        }
        PagePolicy::Packed => {
            let stream = (0..groups).flat_map(|_| texts.iter());
            for (i, text) in stream.enumerate() {
                if i % per_page == 0 {
                    canvas.begin_page();
                    summary.pages += 1;
                    log::debug!("Page {}", summary.pages);
                }
                render_card(canvas, &grid.slot(i % per_page), text);
                summary.cards += 1;
            }
        }
    }
    Ok(summary)
}

fn render_card<C: CardCanvas>(canvas: &mut C, slot: &CellSlot, text: &str) {
    let r = slot.rect;
    canvas.set_separator_style();
    if slot.separator_right {
        canvas.draw_dashed_segment(
            Point { x: r.right(), y: r.y },
            Point {
                x: r.right(),
                y: r.bottom(),
            },
        );
    }
    if slot.separator_bottom {
        canvas.draw_dashed_segment(
            Point {
                x: r.x,
                y: r.bottom(),
            },
            Point {
                x: r.right(),
                y: r.bottom(),
            },
        );
    }
    canvas.reset_stroke_style();
    canvas.draw_text(&r, text);
}
