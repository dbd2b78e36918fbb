//! Pagination. A vertical cursor walks down the page body; any block that
//! would cross the bottom margin goes onto a fresh page.
//!
//! Coordinates here are in points with the origin at the top-left corner of
//! the page and y growing downwards. The renderer flips them.

use super::assets::PreparedImage;
use super::story::{Align, Block, Table, TableKind, TABLE_TEXT};
use super::text::{text_width, wrap, Face, TextStyle};

const CELL_PAD_X: f32 = 6.0;
const CELL_PAD_Y: f32 = 4.0;
/// Widest an image may be drawn: 6.6 in.
pub const MAX_IMAGE_WIDTH: f32 = 475.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// A4 with 0.7 in margins.
    pub const A4: PageGeometry = PageGeometry {
        width: 595.28,
        height: 841.89,
        margin: 50.4,
    };

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn body_top(&self) -> f32 {
        self.margin
    }

    pub fn body_bottom(&self) -> f32 {
        self.height - self.margin
    }

    pub fn body_height(&self) -> f32 {
        self.body_bottom() - self.body_top()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub x: f32,
    pub baseline: f32,
    pub text: String,
    pub face: Face,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub table: TableKind,
    pub header: bool,
    /// Set on the second and later pieces of a row split across pages.
    pub continued: bool,
    pub cells: Vec<Frame>,
    pub texts: Vec<PlacedText>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(PlacedText),
    Row(PlacedRow),
    Image { index: usize, frame: Frame },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Every string drawn on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().flat_map(|op| {
            let items: Vec<&str> = match op {
                DrawOp::Text(t) => vec![t.text.as_str()],
                DrawOp::Row(r) => r.texts.iter().map(|t| t.text.as_str()).collect(),
                DrawOp::Image { .. } => Vec::new(),
            };
            items
        })
    }

    pub fn rows(&self, table: TableKind) -> impl Iterator<Item = &PlacedRow> {
        self.ops.iter().filter_map(move |op| match op {
            DrawOp::Row(r) if r.table == table => Some(r),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = (usize, &Frame)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Image { index, frame } => Some((*index, frame)),
            _ => None,
        })
    }
}

/// Baseline offset of a line within its leading box.
fn baseline_offset(style: &TextStyle) -> f32 {
    (style.leading - style.size) / 2.0 + style.size * 0.8
}

/// Drawn size of an image: pixels taken as points, capped to the maximum
/// width and then to the page body height, aspect ratio kept.
pub fn image_size(img: &PreparedImage, geo: &PageGeometry) -> (f32, f32) {
    let (mut w, mut h) = (img.width_px as f32, img.height_px as f32);
    let max_w = MAX_IMAGE_WIDTH.min(geo.content_width());
    if w > max_w {
        h *= max_w / w;
        w = max_w;
    }
    if h > geo.body_height() {
        w *= geo.body_height() / h;
        h = geo.body_height();
    }
    (w, h)
}

/// A table row with its cells already wrapped.
struct RowLines {
    cells: Vec<Vec<String>>,
    faces: Vec<Face>,
}

impl RowLines {
    fn line_count(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(1).max(1)
    }

    fn height(&self) -> f32 {
        self.line_count() as f32 * TABLE_TEXT.leading + 2.0 * CELL_PAD_Y
    }
}

struct Paginator<'a> {
    geo: &'a PageGeometry,
    images: &'a [PreparedImage],
    pages: Vec<Page>,
    ops: Vec<DrawOp>,
    cursor: f32,
}

impl<'a> Paginator<'a> {
    fn new(geo: &'a PageGeometry, images: &'a [PreparedImage]) -> Self {
        Self {
            geo,
            images,
            pages: Vec::new(),
            ops: Vec::new(),
            cursor: geo.body_top(),
        }
    }

    fn remaining(&self) -> f32 {
        self.geo.body_bottom() - self.cursor
    }

    fn at_top(&self) -> bool {
        self.cursor <= self.geo.body_top()
    }

    fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page {
            number,
            ops: std::mem::take(&mut self.ops),
        });
        self.cursor = self.geo.body_top();
    }

    /// Break the page unless `needed` fits below the cursor. A fresh page is
    /// never broken again, so oversize content cannot loop.
    fn ensure(&mut self, needed: f32) {
        if needed > self.remaining() + 0.01 && !self.at_top() {
            self.new_page();
        }
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }

    /// Height of the smallest piece of `block` that must sit on the same page
    /// as a heading placed directly above it.
    fn lead_height(&self, block: &Block) -> f32 {
        match block {
            Block::Text { style, space_before, .. } => space_before + style.leading,
            Block::Spacer(_) => 0.0,
            Block::Image(i) => self
                .images
                .get(*i)
                .map(|img| image_size(img, self.geo).1)
                .unwrap_or(0.0),
            Block::Table(t) => {
                let widths = self.column_widths(t);
                let header = t
                    .header
                    .as_ref()
                    .map(|h| self.wrap_row(h, &widths, true, false).height())
                    .unwrap_or(0.0);
                let first = t
                    .rows
                    .first()
                    .map(|r| self.wrap_row(r, &widths, false, t.bold_first_column).height())
                    .unwrap_or(0.0);
                header + first
            }
        }
    }

    fn place_text(
        &mut self,
        text: &str,
        style: &TextStyle,
        align: Align,
        space_before: f32,
        space_after: f32,
        keep_with: f32,
    ) {
        let width = self.geo.content_width();
        let lines = wrap(text, style.face, style.size, width);
        let before = if self.at_top() { 0.0 } else { space_before };

        // Keep short blocks and headings in one piece with what follows.
        let first_chunk = if keep_with > 0.0 {
            lines.len() as f32 * style.leading + keep_with
        } else {
            style.leading
        };
        self.ensure(before + first_chunk.min(self.geo.body_height()));
        if !self.at_top() {
            self.cursor += before;
        }

        for line in lines {
            self.ensure(style.leading);
            let x = match align {
                Align::Left => self.geo.margin,
                Align::Center => {
                    self.geo.margin + (width - text_width(&line, style.face, style.size)) / 2.0
                }
            };
            if !line.is_empty() {
                self.ops.push(DrawOp::Text(PlacedText {
                    x,
                    baseline: self.cursor + baseline_offset(style),
                    text: line,
                    face: style.face,
                    size: style.size,
                }));
            }
            self.cursor += style.leading;
        }
        self.cursor = (self.cursor + space_after).min(self.geo.body_bottom());
    }

    fn place_spacer(&mut self, height: f32) {
        if self.at_top() {
            return;
        }
        self.cursor = (self.cursor + height).min(self.geo.body_bottom());
    }

    fn place_image(&mut self, index: usize) {
        let Some(img) = self.images.get(index) else {
            return;
        };
        let (w, h) = image_size(img, self.geo);
        self.ensure(h);
        let x = self.geo.margin + (self.geo.content_width() - w) / 2.0;
        self.ops.push(DrawOp::Image {
            index,
            frame: Frame {
                x,
                y: self.cursor,
                width: w,
                height: h,
            },
        });
        self.cursor += h;
    }

    fn column_widths(&self, table: &Table) -> Vec<f32> {
        let width = self.geo.content_width();
        table.columns.iter().map(|f| f * width).collect()
    }

    fn wrap_row(&self, cells: &[String], widths: &[f32], header: bool, bold_first: bool) -> RowLines {
        let mut wrapped = Vec::with_capacity(widths.len());
        let mut faces = Vec::with_capacity(widths.len());
        for (i, width) in widths.iter().enumerate() {
            let face = if header || (bold_first && i == 0) {
                Face::Bold
            } else {
                Face::Regular
            };
            let value = cells.get(i).map(String::as_str).unwrap_or_default();
            wrapped.push(wrap(value, face, TABLE_TEXT.size, width - 2.0 * CELL_PAD_X));
            faces.push(face);
        }
        RowLines {
            cells: wrapped,
            faces,
        }
    }

    /// Emit one row, or the slice `lines` of it, at the cursor.
    fn emit_row(
        &mut self,
        kind: TableKind,
        header: bool,
        continued: bool,
        row: &RowLines,
        lines: std::ops::Range<usize>,
        widths: &[f32],
    ) {
        let height = lines.len().max(1) as f32 * TABLE_TEXT.leading + 2.0 * CELL_PAD_Y;
        let mut x = self.geo.margin;
        let mut cells = Vec::with_capacity(widths.len());
        let mut texts = Vec::new();
        for (i, width) in widths.iter().enumerate() {
            cells.push(Frame {
                x,
                y: self.cursor,
                width: *width,
                height,
            });
            let cell_lines = &row.cells[i];
            for (n, line) in cell_lines
                .iter()
                .enumerate()
                .skip(lines.start)
                .take(lines.len())
            {
                if line.is_empty() {
                    continue;
                }
                let top = self.cursor + CELL_PAD_Y + (n - lines.start) as f32 * TABLE_TEXT.leading;
                texts.push(PlacedText {
                    x: x + CELL_PAD_X,
                    baseline: top + baseline_offset(&TABLE_TEXT),
                    text: line.clone(),
                    face: row.faces[i],
                    size: TABLE_TEXT.size,
                });
            }
            x += width;
        }
        self.ops.push(DrawOp::Row(PlacedRow {
            table: kind,
            header,
            continued,
            cells,
            texts,
        }));
        self.cursor += height;
    }

    fn place_table(&mut self, table: &Table) {
        if table.rows.is_empty() && table.header.is_none() {
            return;
        }
        let widths = self.column_widths(table);
        let header = table
            .header
            .as_ref()
            .map(|h| self.wrap_row(h, &widths, true, false));
        let header_h = header.as_ref().map(RowLines::height).unwrap_or(0.0);
        // Only repeat a header that leaves room for at least one body line.
        let repeat = header
            .as_ref()
            .filter(|h| h.height() + 2.0 * CELL_PAD_Y + TABLE_TEXT.leading <= self.geo.body_height());
        let repeat_h = repeat.map(RowLines::height).unwrap_or(0.0);
        let rows: Vec<RowLines> = table
            .rows
            .iter()
            .map(|r| self.wrap_row(r, &widths, false, table.bold_first_column))
            .collect();

        let first_h = rows.first().map(RowLines::height).unwrap_or(0.0);
        self.ensure((header_h + first_h).min(self.geo.body_height()));
        if let Some(h) = &header {
            if h.height() <= self.remaining() + 0.01 {
                self.emit_row(table.kind, true, false, h, 0..h.line_count(), &widths);
            } else {
                self.emit_split(table.kind, true, h, &widths, None);
            }
        }

        for row in &rows {
            let row_h = row.height();
            if row_h > self.remaining() + 0.01 && row_h + repeat_h <= self.geo.body_height() {
                self.new_page();
                if let Some(h) = repeat {
                    self.emit_row(table.kind, true, false, h, 0..h.line_count(), &widths);
                }
            }

            if row_h <= self.remaining() + 0.01 {
                self.emit_row(table.kind, false, false, row, 0..row.line_count(), &widths);
                continue;
            }

            self.emit_split(table.kind, false, row, &widths, repeat);
        }
    }

    /// Hand out the lines of a row taller than the space left, page by page.
    /// A fresh page always takes at least one line.
    fn emit_split(
        &mut self,
        kind: TableKind,
        header: bool,
        row: &RowLines,
        widths: &[f32],
        repeat: Option<&RowLines>,
    ) {
        let total = row.line_count();
        let mut start = 0;
        let mut fresh = self.at_top();
        while start < total {
            let fit = ((self.remaining() - 2.0 * CELL_PAD_Y) / TABLE_TEXT.leading).floor();
            if fit < 1.0 && !fresh {
                self.new_page();
                if let Some(h) = repeat {
                    self.emit_row(kind, true, false, h, 0..h.line_count(), widths);
                }
                fresh = true;
                continue;
            }
            let end = (start + (fit.max(1.0) as usize)).min(total);
            self.emit_row(kind, header, start > 0, row, start..end, widths);
            start = end;
            fresh = false;
        }
    }
}

/// Paginate the story into pages of draw operations.
pub fn paginate(story: &[Block], images: &[PreparedImage], geo: &PageGeometry) -> Vec<Page> {
    let mut p = Paginator::new(geo, images);
    for (i, block) in story.iter().enumerate() {
        match block {
            Block::Text {
                text,
                style,
                align,
                space_before,
                space_after,
                keep_with_next,
            } => {
                let keep_with = if *keep_with_next {
                    story
                        .get(i + 1)
                        .map(|next| p.lead_height(next))
                        .unwrap_or(0.0)
                } else {
                    0.0
                };
                p.place_text(text, style, *align, *space_before, *space_after, keep_with);
            }
            Block::Spacer(h) => p.place_spacer(*h),
            Block::Image(index) => p.place_image(*index),
            Block::Table(table) => p.place_table(table),
        }
    }
    p.finish()
}
