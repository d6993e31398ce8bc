//! Text-to-brick layout
//!
//! Turns a flat run of résumé text into a grid of bricks:
//! 1. Every element is split on whitespace and the words are placed left to
//!    right with a greedy wrap at the right margin.
//! 2. Words landing below the vertical cutoff are dropped.
//! 3. Each row is fully justified: the gap left after its last brick is shared
//!    equally between the row's bricks so the row ends flush with the margin.
//!
//! Brick width is a length heuristic (`chars * base + padding`), not a glyph
//! measurement. Output depends only on the inputs.

use serde::{Deserialize, Serialize};

use crate::Viewport;
use crate::consts::*;

/// One paragraph or bullet block of the source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextElement {
    /// Source tag (`p`, `li`, ...) when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub text: String,
}

impl TextElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            tag: None,
            text: text.into(),
        }
    }

    pub fn with_tag(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            text: text.into(),
        }
    }

    /// Whitespace-separated words, empty fragments skipped
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

/// Geometry constants for the brick grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub margin_top: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub brick_height: f32,
    pub brick_padding: f32,
    /// Width contributed by each character of a word
    pub base_brick_width: f32,
    /// Fixed width added to every brick
    pub text_padding: f32,
    /// Fraction of the viewport height below which no brick may extend
    pub max_brick_height_ratio: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            margin_top: MARGIN_TOP,
            margin_left: MARGIN_LEFT,
            margin_right: MARGIN_RIGHT,
            brick_height: BRICK_HEIGHT,
            brick_padding: BRICK_PADDING,
            base_brick_width: BASE_BRICK_WIDTH,
            text_padding: BRICK_TEXT_PADDING,
            max_brick_height_ratio: MAX_BRICK_HEIGHT_RATIO,
        }
    }
}

impl LayoutParams {
    /// Vertical distance between the tops of two consecutive rows
    #[inline]
    pub fn row_pitch(&self) -> f32 {
        self.brick_height + self.brick_padding
    }

    /// Top edge of a row
    #[inline]
    pub fn row_y(&self, row: u32) -> f32 {
        self.margin_top + row as f32 * self.row_pitch()
    }

    /// Row index of a brick whose top edge is at `y`
    #[inline]
    pub fn row_of(&self, y: f32) -> u32 {
        ((y - self.margin_top) / self.row_pitch()).floor().max(0.0) as u32
    }

    /// Unjustified width of the brick for `word`
    #[inline]
    pub fn brick_width(&self, word: &str) -> f32 {
        word.chars().count() as f32 * self.base_brick_width + self.text_padding
    }

    #[inline]
    pub fn right_edge(&self, viewport: Viewport) -> f32 {
        viewport.width - self.margin_right
    }

    /// Lowest y any brick's bottom edge may reach
    #[inline]
    pub fn cutoff(&self, viewport: Viewport) -> f32 {
        viewport.height * self.max_brick_height_ratio
    }
}

/// A positioned, sized and colored brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    /// 0xRRGGBB from the row palette
    pub color: u32,
    pub row_index: u32,
    pub is_last_in_row: bool,
}

impl BrickSpec {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Finished layout
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    /// Bricks in generation order (row by row, left to right)
    pub bricks: Vec<BrickSpec>,
    pub total_rows: u32,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Bricks of a single row
    pub fn row(&self, row_index: u32) -> impl Iterator<Item = &BrickSpec> {
        self.bricks.iter().filter(move |b| b.row_index == row_index)
    }
}

/// Palette color for a row
#[inline]
pub fn row_color(row_index: u32) -> u32 {
    BRICK_COLORS[row_index as usize % BRICK_COLORS.len()]
}

/// Greedy placement without justification, bucketed by row
///
/// A word that does not fit is moved to the next row unless the current row
/// is still empty, in which case it is placed anyway and overflows.
pub fn place_words(
    elements: &[TextElement],
    viewport: Viewport,
    params: &LayoutParams,
) -> Vec<Vec<BrickSpec>> {
    let right_edge = params.right_edge(viewport);
    let cutoff = params.cutoff(viewport);

    let mut rows: Vec<Vec<BrickSpec>> = Vec::new();
    let mut x = params.margin_left;
    let mut row: u32 = 0;

    for word in elements.iter().flat_map(TextElement::words) {
        let width = params.brick_width(word);

        if x > params.margin_left && x + width > right_edge {
            x = params.margin_left;
            row += 1;
        }

        let y = params.row_y(row);
        if y + params.brick_height > cutoff {
            continue;
        }

        while rows.len() <= row as usize {
            rows.push(Vec::new());
        }
        rows[row as usize].push(BrickSpec {
            x,
            y,
            width,
            height: params.brick_height,
            text: word.to_string(),
            color: row_color(row),
            row_index: row,
            is_last_in_row: false,
        });

        x += width + params.brick_padding;
    }

    rows
}

/// Stretch a row so its last brick ends at `right_edge`
///
/// Leftover space is split equally; each brick grows by the share and shifts
/// right by the shares of the bricks before it. Rows already at or past the
/// edge keep their geometry. The last brick is always flagged.
pub fn justify_row(row: &mut [BrickSpec], right_edge: f32) {
    let Some(last) = row.last() else {
        return;
    };

    let space_remaining = right_edge - last.right();
    if space_remaining > 0.0 {
        let extra_per_brick = space_remaining / row.len() as f32;
        let mut offset = 0.0;
        for brick in row.iter_mut() {
            brick.x += offset;
            brick.width += extra_per_brick;
            offset += extra_per_brick;
        }
    }

    if let Some(last) = row.last_mut() {
        last.is_last_in_row = true;
    }
}

/// Lay out `elements` into justified bricks
///
/// A word wider than the usable width overflows on the row it starts
/// instead of leaving that row blank, so `total_rows` never counts an empty
/// row.
pub fn compute_layout(elements: &[TextElement], viewport: Viewport, params: &LayoutParams) -> Layout {
    let right_edge = params.right_edge(viewport);
    let mut rows = place_words(elements, viewport, params);

    let total_rows = rows
        .iter()
        .rposition(|r| !r.is_empty())
        .map_or(0, |i| i as u32 + 1);

    let mut bricks = Vec::with_capacity(rows.iter().map(Vec::len).sum());
    for row in rows.iter_mut() {
        justify_row(row, right_edge);
        bricks.append(row);
    }

    log::debug!(
        "Layout: {} bricks in {} rows ({}x{})",
        bricks.len(),
        total_rows,
        viewport.width,
        viewport.height
    );

    Layout { bricks, total_rows }
}
