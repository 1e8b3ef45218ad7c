//! Headless rendering of mission reports.
//!
//! [`layout::plan_canvas`] fixes every rectangle up front, [`assets`] finds
//! operator portraits, and [`compose::ImageComposer`] paints the plan into an
//! SVG document that `resvg` rasterises to PNG.

pub mod assets;
pub mod compose;
pub mod layout;
pub mod portrait;
pub mod style;

pub use assets::{AssetConfig, AssetResolution, AssetResolver};
pub use compose::{ComposedReport, ImageComposer, PortraitStats, RenderedImage};
pub use layout::{CanvasPlan, CardPlan, LayoutConfig, Rect, TilePlan, plan_canvas};
pub use style::Theme;

use clanops_protocol::Mission;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    #[error("could not allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },
    #[error("could not build the SVG tree: {0}")]
    SvgTree(String),
    #[error("could not encode PNG: {0}")]
    Encode(String),
    #[error("encoder produced an empty buffer")]
    EmptyOutput,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub layout: LayoutConfig,
    pub theme: Theme,
    pub title: String,
    pub footer_text: String,
    pub high_value_missions: Vec<Mission>,
    pub font_family: String,
    /// Best effort: when no font is found text is simply not drawn.
    pub load_system_fonts: bool,
    pub font_dirs: Vec<PathBuf>,
    /// Largest surface, in pixels, the composer will allocate. Reports that
    /// need more fail with `SurfaceAllocation` and fall back to text. The
    /// default (64 Mpx, 256 MiB of RGBA) fits roughly 1,200 operators on the
    /// default layout.
    pub max_canvas_pixels: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            theme: Theme::default(),
            title: "TACTIOPBOT".to_string(),
            footer_text: "Powered by ytmazen".to_string(),
            high_value_missions: vec![Mission::Bss, Mission::Breach, Mission::CleanUp],
            font_family: "Courier New, DejaVu Sans Mono, monospace".to_string(),
            load_system_fonts: true,
            font_dirs: vec![],
            max_canvas_pixels: 64 * 1024 * 1024,
        }
    }
}
