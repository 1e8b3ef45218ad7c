//! Shared clanops contracts.
//!
//! Everything that crosses a crate boundary lives here: the mission set, the
//! eight-slot selection, the per-mission operator value table and the
//! assignment report the engine hands to the renderer and the reply text.

mod mission;
mod report;
mod score;
mod selection;
mod values;

pub use mission::Mission;
pub use report::{MissionEntry, MissionReport, Placement};
pub use selection::{SLOT_COUNT, Selection, Slot};
pub use score::Score;
pub use values::ValueTable;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown mission '{0}'")]
    UnknownMission(String),
    #[error("a selection holds at most {SLOT_COUNT} slots, got {0}")]
    TooManySlots(usize),
    #[error("score must be a finite, non-negative number, got {0}")]
    InvalidScore(f64),
    #[error("could not read value table '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse value table JSON: {0}")]
    Json(#[from] serde_json::Error),
}
