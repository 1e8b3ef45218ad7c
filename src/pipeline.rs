use crate::{config::AppConfig, error::Result, reply::format_reply};
use clanops_engine::assign_best_operators;
use clanops_protocol::{MissionReport, Selection, ValueTable};
use clanops_render::{AssetResolver, ImageComposer, RenderError, RenderedImage};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug)]
pub struct PipelineOutput {
    pub report: MissionReport,
    pub reply: String,
    /// The document that was (or failed to be) rasterised.
    pub svg: String,
    pub image: Option<RenderedImage>,
    /// Set when the image could not be produced; the reply is still valid.
    pub image_error: Option<RenderError>,
}

/// Selection in, reply text and report image out. Built once and reused;
/// nothing in it changes between runs except the resolver cache.
pub struct MissionPipeline {
    values: Arc<ValueTable>,
    composer: ImageComposer,
}

impl MissionPipeline {
    pub fn new(values: Arc<ValueTable>, config: &AppConfig) -> Result<Self> {
        let resolver = Arc::new(AssetResolver::new(&config.assets));
        let composer = ImageComposer::new(config.render.clone(), resolver)?;
        Ok(Self { values, composer })
    }

    pub fn composer(&self) -> &ImageComposer {
        &self.composer
    }

    /// Assigns and formats the reply without touching the renderer.
    pub fn run_text(&self, selection: &Selection) -> Result<(MissionReport, String)> {
        let report = assign_best_operators(selection, &self.values)?;
        let reply = format_reply(selection, &report);
        Ok((report, reply))
    }

    pub fn run(&self, selection: &Selection) -> Result<PipelineOutput> {
        let (report, reply) = self.run_text(selection)?;
        let plan = self.composer.plan(selection, &report);
        let composed = self.composer.compose_svg(&plan, &report);
        let (image, image_error) = match self.composer.rasterise(&composed) {
            Ok(image) => (Some(image), None),
            Err(e) => {
                error!(error = %e, "image rendering failed, falling back to text only");
                (None, Some(e))
            }
        };
        info!(
            missions = report.len(),
            operators = report.operator_count(),
            image = image.is_some(),
            "mission pipeline finished"
        );
        Ok(PipelineOutput {
            report,
            reply,
            svg: composed.svg,
            image,
            image_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClanopsError;
    use clanops_engine::AssignmentError;
    use clanops_protocol::{Mission, Score};

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.assets.search_dirs = vec![];
        config.render.load_system_fonts = false;
        config
    }

    fn pipeline_with(config: &AppConfig) -> MissionPipeline {
        let values = ValueTable::new()
            .with(Mission::Breach, "Moses", Score::from(9))
            .with(Mission::Bayonet, "Moses", Score::from(9))
            .with(Mission::Bayonet, "Diana", Score::from(4));
        MissionPipeline::new(Arc::new(values), config).unwrap()
    }

    fn pipeline() -> MissionPipeline {
        pipeline_with(&test_config())
    }

    #[test]
    fn test_all_skip_is_rejected_before_rendering() {
        let selection = Selection::from_options([None, None]).unwrap();
        let err = pipeline().run(&selection).unwrap_err();
        assert!(matches!(
            err,
            ClanopsError::Assignment(AssignmentError::NoMissionSelected)
        ));
    }

    #[test]
    fn test_tie_goes_to_earliest_slot() {
        let selection =
            Selection::from_options([Some(Mission::Breach), Some(Mission::Bayonet)]).unwrap();
        let output = pipeline().run(&selection).unwrap();
        assert!(output.reply.contains("M1 - Breach:\nMoses (9)\n\n"));
        assert!(output.reply.contains("M2 - Bayonet:\nDiana (4)\n\n"));
        assert!(output.image_error.is_none());
        let image = output.image.unwrap();
        assert!(!image.png.is_empty());
        assert_eq!(image.portraits.missing, 2);
    }

    #[test]
    fn test_run_text_skips_rendering() {
        let selection = Selection::from_options([Some(Mission::Cover)]).unwrap();
        let (report, reply) = pipeline().run_text(&selection).unwrap();
        assert_eq!(report.get(Mission::Cover), Some(&[][..]));
        assert!(reply.contains("No operators found for this mission"));
    }

    #[test]
    fn test_oversized_surface_falls_back_to_text() {
        let mut config = test_config();
        config.render.layout.canvas_width = 200_000;
        let selection =
            Selection::from_options([Some(Mission::Breach), Some(Mission::Bayonet)]).unwrap();
        let output = pipeline_with(&config).run(&selection).unwrap();

        assert!(output.image.is_none());
        assert!(matches!(
            output.image_error,
            Some(RenderError::SurfaceAllocation {
                width: 200_000,
                ..
            })
        ));
        assert!(output.reply.contains("M1 - Breach:\nMoses (9)\n\n"));
        assert!(output.reply.contains("M2 - Bayonet:\nDiana (4)\n\n"));
        assert!(output.svg.contains("M1 - Breach"));
    }
}
