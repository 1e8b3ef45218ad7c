use crate::{Mission, ProtocolError};
use serde::{Deserialize, Serialize};

pub const SLOT_COUNT: usize = 8;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[default]
    Skip,
    Mission(Mission),
}

impl Slot {
    /// `Skip` (any case) or a mission display name.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        if text.trim().eq_ignore_ascii_case("skip") {
            return Ok(Self::Skip);
        }
        text.parse::<Mission>().map(Self::Mission)
    }

    pub fn mission(self) -> Option<Mission> {
        match self {
            Self::Skip => None,
            Self::Mission(m) => Some(m),
        }
    }

    pub fn is_skip(self) -> bool {
        matches!(self, Self::Skip)
    }
}

impl From<Mission> for Slot {
    fn from(mission: Mission) -> Self {
        Self::Mission(mission)
    }
}

/// Eight ordered mission slots. Order drives both display and tie-breaking.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    slots: [Slot; SLOT_COUNT],
}

impl Selection {
    pub fn new(slots: [Slot; SLOT_COUNT]) -> Self {
        Self { slots }
    }

    /// Builds a selection from up to eight optional slots; missing trailing
    /// slots become `Skip`.
    pub fn from_options<I>(options: I) -> Result<Self, ProtocolError>
    where
        I: IntoIterator<Item = Option<Mission>>,
    {
        let options = options.into_iter().collect::<Vec<_>>();
        if options.len() > SLOT_COUNT {
            return Err(ProtocolError::TooManySlots(options.len()));
        }
        let mut slots = [Slot::Skip; SLOT_COUNT];
        for (slot, option) in slots.iter_mut().zip(options) {
            *slot = option.map(Slot::Mission).unwrap_or_default();
        }
        Ok(Self { slots })
    }

    /// Parses up to eight slot names (`Skip` or a mission name).
    pub fn parse_slots<S: AsRef<str>>(names: &[S]) -> Result<Self, ProtocolError> {
        let options = names
            .iter()
            .map(|name| Slot::parse(name.as_ref()).map(Slot::mission))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_options(options)
    }

    pub fn slots(&self) -> &[Slot; SLOT_COUNT] {
        &self.slots
    }

    /// Non-skip slots as `(slot_index, mission)`, in slot order.
    pub fn selected(&self) -> impl Iterator<Item = (usize, Mission)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.mission().map(|m| (idx, m)))
    }

    pub fn has_selection(&self) -> bool {
        self.slots.iter().any(|slot| !slot.is_skip())
    }

    /// Selected missions in first-slot order, each listed once.
    pub fn distinct_missions(&self) -> Vec<Mission> {
        let mut out: Vec<Mission> = vec![];
        for (_, mission) in self.selected() {
            if !out.contains(&mission) {
                out.push(mission);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_options_pads_with_skip() {
        let selection =
            Selection::from_options([Some(Mission::Breach), None, Some(Mission::Cover)]).unwrap();
        assert_eq!(selection.slots()[0], Slot::Mission(Mission::Breach));
        assert_eq!(selection.slots()[1], Slot::Skip);
        assert_eq!(selection.slots()[2], Slot::Mission(Mission::Cover));
        assert!(selection.slots()[3..].iter().all(|s| s.is_skip()));
        assert_eq!(
            selection.selected().collect::<Vec<_>>(),
            vec![(0, Mission::Breach), (2, Mission::Cover)]
        );
    }

    #[test]
    fn test_from_options_rejects_nine_slots() {
        let res = Selection::from_options(vec![None; 9]);
        assert!(matches!(res, Err(ProtocolError::TooManySlots(9))));
    }

    #[test]
    fn test_parse_slots() {
        let selection = Selection::parse_slots(&["skip", "Bayonet", "B.S.S"]).unwrap();
        assert_eq!(
            selection.distinct_missions(),
            vec![Mission::Bayonet, Mission::Bss]
        );
        assert!(Selection::parse_slots(&["Breach", "Moon"]).is_err());
    }

    #[test]
    fn test_all_skip_has_no_selection() {
        assert!(!Selection::default().has_selection());
    }

    #[test]
    fn test_distinct_missions_keeps_first_slot_order() {
        let selection = Selection::from_options([
            Some(Mission::Cover),
            Some(Mission::Breach),
            Some(Mission::Cover),
        ])
        .unwrap();
        assert_eq!(
            selection.distinct_missions(),
            vec![Mission::Cover, Mission::Breach]
        );
    }
}
