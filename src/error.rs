use clanops_engine::AssignmentError;
use clanops_protocol::ProtocolError;
use clanops_render::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClanopsError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("could not read config file '{path}': {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config JSON '{path}': {source}")]
    ConfigJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = ClanopsError> = std::result::Result<T, E>;
