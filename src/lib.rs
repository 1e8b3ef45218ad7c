//! Operator placement for clan missions.
//!
//! Glues the workspace crates together: [`MissionPipeline`] runs a selection
//! through the greedy assignment, formats the text reply and renders the
//! report image, degrading to text only when rendering fails.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod reply;

pub use clanops_engine as engine;
pub use clanops_protocol as protocol;
pub use clanops_render as render;

pub use config::AppConfig;
pub use error::ClanopsError;
pub use pipeline::{MissionPipeline, PipelineOutput};
pub use reply::{REJECTION_TEXT, format_reply};
