use crate::RenderError;
use clanops_protocol::{Mission, MissionReport, Selection};
use serde::{Deserialize, Serialize};
use tracing::debug;

const TITLE_BASELINE_OFFSET: u32 = 52;
const UNDERLINE_OFFSET: u32 = 70;

/// Fixed geometry of a report image, in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub canvas_width: u32,
    pub card_margin_x: u32,
    pub card_padding: u32,
    pub card_gap: u32,
    /// Card height before any tile rows are added.
    pub card_base_height: u32,
    /// Distance from the card top to the first tile row.
    pub tile_area_offset: u32,
    pub empty_card_height: u32,
    pub tiles_per_row: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tile_gap: u32,
    pub row_height: u32,
    pub portrait_inset: u32,
    pub portrait_size: u32,
    pub label_height: u32,
    pub label_inset: u32,
    pub header_height: u32,
    pub footer_height: u32,
    pub min_canvas_height: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1600,
            card_margin_x: 40,
            card_padding: 20,
            card_gap: 30,
            card_base_height: 130,
            tile_area_offset: 100,
            empty_card_height: 100,
            tiles_per_row: 5,
            tile_width: 100,
            tile_height: 150,
            tile_gap: 15,
            row_height: 160,
            portrait_inset: 5,
            portrait_size: 90,
            label_height: 24,
            label_inset: 4,
            header_height: 140,
            footer_height: 60,
            min_canvas_height: 600,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        let fail = |msg: &str| Err(RenderError::InvalidLayout(msg.to_string()));
        if self.tiles_per_row == 0 {
            return fail("tiles_per_row must be at least 1");
        }
        if self.tile_width == 0 || self.tile_height == 0 || self.row_height == 0 {
            return fail("tile and row sizes must be positive");
        }
        if self.canvas_width <= 2 * self.card_margin_x {
            return fail("canvas_width leaves no room for cards");
        }
        if self.portrait_inset * 2 + self.portrait_size > self.tile_width
            || self.portrait_inset + self.portrait_size > self.tile_height
        {
            return fail("portrait does not fit inside a tile");
        }
        if self.label_inset * 2 >= self.tile_width
            || self.label_inset + self.label_height > self.tile_height
        {
            return fail("label chip does not fit inside a tile");
        }
        let row_span = self.card_padding
            + self.tiles_per_row * self.tile_width
            + (self.tiles_per_row - 1) * self.tile_gap;
        if row_span > self.card_width() {
            return fail("a full tile row is wider than the card");
        }
        if self.tile_area_offset + self.tile_height > self.card_base_height + self.row_height {
            return fail("the first tile row overflows its card");
        }
        if self.empty_card_height > self.card_base_height + self.row_height {
            return fail("empty_card_height exceeds the height of a one-row card");
        }
        Ok(())
    }

    pub fn card_width(&self) -> u32 {
        self.canvas_width.saturating_sub(2 * self.card_margin_x)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x as f32 + self.width as f32 / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y as f32 + self.height as f32 / 2.0
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TilePlan {
    /// Position of the operator within its mission's report list.
    pub index: usize,
    pub rect: Rect,
    pub portrait: Rect,
    pub label: Rect,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardPlan {
    pub slot: usize,
    pub mission: Mission,
    pub rect: Rect,
    pub high_value: bool,
    pub title_x: u32,
    pub title_baseline: u32,
    pub underline_y: u32,
    pub tiles: Vec<TilePlan>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CanvasPlan {
    pub width: u32,
    pub height: u32,
    pub header: Rect,
    pub footer: Rect,
    pub cards: Vec<CardPlan>,
}

pub fn card_height(operator_count: usize, layout: &LayoutConfig) -> u32 {
    if operator_count == 0 {
        return layout.empty_card_height;
    }
    let rows = (operator_count as u32).div_ceil(layout.tiles_per_row.max(1));
    layout.card_base_height + rows * layout.row_height
}

/// Canvas height for the given per-card operator counts. Skipped slots are
/// not part of `counts`: they take no vertical space.
pub fn canvas_height<I>(counts: I, layout: &LayoutConfig) -> u32
where
    I: IntoIterator<Item = usize>,
{
    let cards: u32 = counts
        .into_iter()
        .map(|n| card_height(n, layout) + layout.card_gap)
        .sum();
    (layout.header_height + cards + layout.footer_height).max(layout.min_canvas_height)
}

fn plan_tiles(card: &Rect, count: usize, layout: &LayoutConfig) -> Vec<TilePlan> {
    let per_row = layout.tiles_per_row.max(1) as usize;
    (0..count)
        .map(|index| {
            let column = (index % per_row) as u32;
            let row = (index / per_row) as u32;
            let rect = Rect::new(
                card.x + layout.card_padding + column * (layout.tile_width + layout.tile_gap),
                card.y + layout.tile_area_offset + row * layout.row_height,
                layout.tile_width,
                layout.tile_height,
            );
            let portrait = Rect::new(
                rect.x + layout.portrait_inset,
                rect.y + layout.portrait_inset,
                layout.portrait_size,
                layout.portrait_size,
            );
            let label = Rect::new(
                rect.x + layout.label_inset,
                rect.bottom() - layout.label_inset - layout.label_height,
                layout.tile_width - 2 * layout.label_inset,
                layout.label_height,
            );
            TilePlan {
                index,
                rect,
                portrait,
                label,
            }
        })
        .collect()
}

/// Computes the geometry of every card and tile. One card per non-skip slot,
/// in slot order; a mission selected twice gets two cards.
pub fn plan_canvas(
    selection: &Selection,
    report: &MissionReport,
    layout: &LayoutConfig,
    high_value: &[Mission],
) -> CanvasPlan {
    let counts = selection
        .selected()
        .map(|(_, mission)| report.get(mission).map_or(0, |p| p.len()))
        .collect::<Vec<_>>();
    let height = canvas_height(counts.iter().copied(), layout);
    let width = layout.canvas_width;

    let mut y = layout.header_height;
    let mut cards = vec![];
    for ((slot, mission), count) in selection.selected().zip(counts) {
        let rect = Rect::new(
            layout.card_margin_x,
            y,
            layout.card_width(),
            card_height(count, layout),
        );
        cards.push(CardPlan {
            slot,
            mission,
            rect,
            high_value: high_value.contains(&mission),
            title_x: rect.x + layout.card_padding,
            title_baseline: rect.y + TITLE_BASELINE_OFFSET,
            underline_y: rect.y + UNDERLINE_OFFSET,
            tiles: plan_tiles(&rect, count, layout),
        });
        y = rect.bottom() + layout.card_gap;
    }

    debug!(width, height, cards = cards.len(), "planned canvas");
    CanvasPlan {
        width,
        height,
        header: Rect::new(0, 0, width, layout.header_height),
        footer: Rect::new(
            0,
            height.saturating_sub(layout.footer_height),
            width,
            layout.footer_height,
        ),
        cards,
    }
}
