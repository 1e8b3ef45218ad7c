use crate::{
    RenderConfig, RenderError,
    assets::{AssetResolution, AssetResolver},
    layout::{CanvasPlan, CardPlan, Rect, TilePlan, plan_canvas},
    portrait::{Portrait, load_portrait},
    style::{
        Anchor, TextStyle, filled_rect, rule, stroked_rect, styled_text, styled_text_with_fill,
        truncate_label,
    },
};
use clanops_protocol::{MissionReport, Placement, Selection};
use rayon::prelude::*;
use resvg::{tiny_skia, usvg};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use svg::Document;
use svg::node::element::{Definitions, Group, Image, LinearGradient, Rectangle, Stop};
use tracing::{debug, info, warn};

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const TITLE_GRADIENT_ID: &str = "title-gradient";

const HEADER_FONT_SIZE: f32 = 72.0;
const MISSION_FONT_SIZE: f32 = 52.0;
const LABEL_FONT_SIZE: f32 = 15.0;
const FOOTER_FONT_SIZE: f32 = 16.0;
const PLACEHOLDER_FONT_SIZE: f32 = 48.0;
const LABEL_TEXT_PADDING: f32 = 4.0;
const DIVIDER_HALF_WIDTH: f32 = 150.0;
const UNDERLINE_LENGTH: f32 = 250.0;
const GLOW_SPREAD: u32 = 5;
const FOOTER_MARGIN: f32 = 40.0;
const FOOTER_BASELINE_LIFT: f32 = 20.0;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PortraitStats {
    pub embedded: usize,
    pub missing: usize,
    pub unreadable: usize,
}

#[derive(Clone, Debug)]
pub struct ComposedReport {
    pub svg: String,
    pub width: u32,
    pub height: u32,
    pub portraits: PortraitStats,
}

#[derive(Clone, Debug)]
pub struct RenderedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub portraits: PortraitStats,
}

/// Paints mission reports. Holds only read-only state, so one composer can
/// serve concurrent renders; each call owns its document and surface.
pub struct ImageComposer {
    config: RenderConfig,
    resolver: Arc<AssetResolver>,
    fontdb: Arc<usvg::fontdb::Database>,
}

fn build_font_database(config: &RenderConfig) -> usvg::fontdb::Database {
    let mut db = usvg::fontdb::Database::new();
    if config.load_system_fonts {
        db.load_system_fonts();
    }
    for dir in &config.font_dirs {
        db.load_fonts_dir(dir);
    }
    if db.len() == 0 {
        warn!("no fonts available, report text will not be drawn");
    } else {
        debug!(faces = db.len(), "loaded font faces");
    }
    db
}

impl ImageComposer {
    pub fn new(config: RenderConfig, resolver: Arc<AssetResolver>) -> Result<Self, RenderError> {
        config.layout.validate()?;
        let fontdb = Arc::new(build_font_database(&config));
        Ok(Self {
            config,
            resolver,
            fontdb,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn plan(&self, selection: &Selection, report: &MissionReport) -> CanvasPlan {
        plan_canvas(
            selection,
            report,
            &self.config.layout,
            &self.config.high_value_missions,
        )
    }

    pub fn render(
        &self,
        plan: &CanvasPlan,
        report: &MissionReport,
    ) -> Result<RenderedImage, RenderError> {
        self.rasterise(&self.compose_svg(plan, report))
    }

    /// Encodes an already composed document, so callers that also keep the
    /// SVG do not decode portraits twice.
    pub fn rasterise(&self, composed: &ComposedReport) -> Result<RenderedImage, RenderError> {
        let png = self.encode_png(&composed.svg, composed.width, composed.height)?;
        info!(
            bytes = png.len(),
            width = composed.width,
            height = composed.height,
            "rendered mission report"
        );
        Ok(RenderedImage {
            png,
            width: composed.width,
            height: composed.height,
            portraits: composed.portraits,
        })
    }

    /// Rasterises `svg` onto a fresh `width`×`height` surface and encodes it as PNG.
    pub fn encode_png(&self, svg: &str, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        if u64::from(width) * u64::from(height) > self.config.max_canvas_pixels {
            return Err(RenderError::SurfaceAllocation { width, height });
        }
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or(RenderError::SurfaceAllocation { width, height })?;

        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| RenderError::SvgTree(e.to_string()))?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        if png.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(png)
    }

    /// Builds the report document. Portraits are decoded in parallel, then
    /// everything is painted in plan order.
    pub fn compose_svg(&self, plan: &CanvasPlan, report: &MissionReport) -> ComposedReport {
        let portraits = self.prepare_portraits(plan, report);
        let mut stats = PortraitStats::default();

        let mut doc = Document::new()
            .set("xmlns:xlink", XLINK_NS)
            .set("viewBox", (0, 0, plan.width, plan.height))
            .set("width", plan.width)
            .set("height", plan.height)
            .add(self.definitions(plan))
            .add(self.background(plan))
            .add(self.header(plan));

        for card in &plan.cards {
            doc = doc.add(self.card(card));
            let placements = report.get(card.mission).unwrap_or(&[]);
            for tile in &card.tiles {
                let Some(placement) = placements.get(tile.index) else {
                    continue;
                };
                let portrait = portraits
                    .get(placement.operator.as_str())
                    .unwrap_or(&Portrait::Missing);
                match portrait {
                    Portrait::Embedded(_) => stats.embedded += 1,
                    Portrait::Missing => stats.missing += 1,
                    Portrait::Unreadable(_) => stats.unreadable += 1,
                }
                doc = doc.add(self.tile(tile, placement, portrait));
            }
        }

        doc = doc.add(self.footer(plan));
        debug!(?stats, "composed report document");
        ComposedReport {
            svg: doc.to_string(),
            width: plan.width,
            height: plan.height,
            portraits: stats,
        }
    }

    fn prepare_portraits<'r>(
        &self,
        plan: &CanvasPlan,
        report: &'r MissionReport,
    ) -> HashMap<&'r str, Portrait> {
        let mut seen = HashSet::new();
        let names = plan
            .cards
            .iter()
            .flat_map(|card| {
                let placements = report.get(card.mission).unwrap_or(&[]);
                card.tiles
                    .iter()
                    .filter_map(move |tile| placements.get(tile.index))
            })
            .map(|p| p.operator.as_str())
            .filter(|name| seen.insert(*name))
            .collect::<Vec<_>>();

        names
            .par_iter()
            .map(|name| (*name, self.portrait_for(name)))
            .collect()
    }

    fn portrait_for(&self, operator: &str) -> Portrait {
        match self.resolver.resolve(operator) {
            AssetResolution::Found(path) => {
                match load_portrait(&path, self.config.layout.portrait_size) {
                    Ok(url) => Portrait::Embedded(url),
                    Err(e) => {
                        warn!(operator, error = %e, "portrait unreadable, using placeholder");
                        Portrait::Unreadable(e.to_string())
                    }
                }
            }
            AssetResolution::NotFound => Portrait::Missing,
        }
    }

    fn text_style(&self, font_size: f32, fill: &str) -> TextStyle {
        TextStyle::new(&self.config.font_family, font_size, fill)
    }

    fn definitions(&self, plan: &CanvasPlan) -> Definitions {
        let theme = &self.config.theme;
        Definitions::new().add(
            LinearGradient::new()
                .set("id", TITLE_GRADIENT_ID)
                .set("gradientUnits", "userSpaceOnUse")
                .set("x1", 0)
                .set("y1", 0)
                .set("x2", plan.width)
                .set("y2", 0)
                .add(
                    Stop::new()
                        .set("offset", 0)
                        .set("stop-color", theme.title_gradient_start.as_str()),
                )
                .add(
                    Stop::new()
                        .set("offset", 1)
                        .set("stop-color", theme.title_gradient_end.as_str()),
                ),
        )
    }

    fn background(&self, plan: &CanvasPlan) -> Rectangle {
        Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", plan.width)
            .set("height", plan.height)
            .set("fill", self.config.theme.background.as_str())
    }

    fn header(&self, plan: &CanvasPlan) -> Group {
        let theme = &self.config.theme;
        let center = plan.header.center_x();
        let baseline = plan.header.y as f32 + plan.header.height as f32 / 2.0;
        let divider_y = plan.header.bottom() as f32 - 45.0;
        let style = self
            .text_style(HEADER_FONT_SIZE, &theme.text)
            .bold()
            .anchor(Anchor::Middle)
            .shadow(&theme.accent, 0.4, 3.0);
        Group::new()
            .add(styled_text_with_fill(
                &self.config.title,
                center,
                baseline,
                &style,
                &format!("url(#{TITLE_GRADIENT_ID})"),
            ))
            .add(rule(
                center - DIVIDER_HALF_WIDTH,
                divider_y,
                center + DIVIDER_HALF_WIDTH,
                &theme.accent,
                3.0,
            ))
    }

    fn card(&self, card: &CardPlan) -> Group {
        let theme = &self.config.theme;
        let mut group = Group::new();
        if card.high_value {
            let glow = Rect::new(
                card.rect.x.saturating_sub(GLOW_SPREAD),
                card.rect.y.saturating_sub(GLOW_SPREAD),
                card.rect.width + 2 * GLOW_SPREAD,
                card.rect.height + 2 * GLOW_SPREAD,
            );
            group = group.add(filled_rect(&glow, 18.0, &theme.glow, theme.glow_opacity));
        }
        let title = format!("M{} - {}", card.slot + 1, card.mission);
        let title_style = self
            .text_style(MISSION_FONT_SIZE, &theme.text)
            .bold()
            .shadow(&theme.accent, 0.5, 2.0);
        group
            .add(filled_rect(&card.rect, 14.0, &theme.card_fill, 1.0))
            .add(stroked_rect(&card.rect, 14.0, &theme.card_border, 2.0))
            .add(styled_text(
                &title,
                card.title_x as f32,
                card.title_baseline as f32,
                &title_style,
            ))
            .add(rule(
                card.title_x as f32,
                card.underline_y as f32,
                card.title_x as f32 + UNDERLINE_LENGTH,
                &theme.accent,
                4.0,
            ))
    }

    fn tile(&self, tile: &TilePlan, placement: &Placement, portrait: &Portrait) -> Group {
        let theme = &self.config.theme;
        let mut group = Group::new()
            .add(filled_rect(&tile.rect, 10.0, &theme.tile_fill, 1.0))
            .add(stroked_rect(&tile.rect, 10.0, &theme.tile_border, 2.0));

        group = match portrait.data_url() {
            Some(url) => group.add(
                Image::new()
                    .set("x", tile.portrait.x)
                    .set("y", tile.portrait.y)
                    .set("width", tile.portrait.width)
                    .set("height", tile.portrait.height)
                    .set("preserveAspectRatio", "none")
                    .set("xlink:href", url),
            ),
            None => group.add(self.placeholder(&tile.portrait)),
        };

        let budget = tile.label.width as f32 - 2.0 * LABEL_TEXT_PADDING;
        let label = truncate_label(&placement.operator, budget, LABEL_FONT_SIZE);
        let label_style = self
            .text_style(LABEL_FONT_SIZE, &theme.text)
            .bold()
            .anchor(Anchor::Middle)
            .shadow("#000000", 0.95, 1.0);
        group
            .add(filled_rect(
                &tile.label,
                6.0,
                &theme.label_chip,
                theme.label_chip_opacity,
            ))
            .add(styled_text(
                &label,
                tile.label.center_x(),
                tile.label.center_y() + LABEL_FONT_SIZE * 0.35,
                &label_style,
            ))
    }

    fn placeholder(&self, region: &Rect) -> Group {
        let theme = &self.config.theme;
        let glyph_style = self
            .text_style(PLACEHOLDER_FONT_SIZE, &theme.text)
            .bold()
            .anchor(Anchor::Middle)
            .opacity(0.6);
        Group::new()
            .set("class", "portrait-placeholder")
            .add(filled_rect(region, 8.0, &theme.placeholder, 0.35))
            .add(styled_text(
                "?",
                region.center_x(),
                region.center_y() + PLACEHOLDER_FONT_SIZE * 0.35,
                &glyph_style,
            ))
    }

    fn footer(&self, plan: &CanvasPlan) -> Group {
        let theme = &self.config.theme;
        let style = self
            .text_style(FOOTER_FONT_SIZE, &theme.text)
            .bold()
            .anchor(Anchor::End)
            .opacity(theme.footer_opacity)
            .shadow("#000000", 0.6, 1.0);
        styled_text(
            &self.config.footer_text,
            plan.width as f32 - FOOTER_MARGIN,
            plan.footer.bottom() as f32 - FOOTER_BASELINE_LIFT,
            &style,
        )
    }
}
