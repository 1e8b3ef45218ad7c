use crate::{Mission, Score};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub operator: String,
    pub score: Score,
}

impl Placement {
    pub fn new(operator: impl Into<String>, score: Score) -> Self {
        Self {
            operator: operator.into(),
            score,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MissionEntry {
    pub mission: Mission,
    pub placements: Vec<Placement>,
}

/// Assignment output: one entry per selected mission in first-slot order,
/// placements sorted by score descending.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MissionReport {
    entries: Vec<MissionEntry>,
}

impl MissionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `mission` with an empty list if it is not present yet.
    pub fn ensure(&mut self, mission: Mission) -> &mut Vec<Placement> {
        let idx = match self.entries.iter().position(|e| e.mission == mission) {
            Some(idx) => idx,
            None => {
                self.entries.push(MissionEntry {
                    mission,
                    placements: vec![],
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].placements
    }

    pub fn get(&self, mission: Mission) -> Option<&[Placement]> {
        self.entries
            .iter()
            .find(|e| e.mission == mission)
            .map(|e| e.placements.as_slice())
    }

    pub fn contains(&self, mission: Mission) -> bool {
        self.get(mission).is_some()
    }

    pub fn entries(&self) -> &[MissionEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [MissionEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn operator_count(&self) -> usize {
        self.entries.iter().map(|e| e.placements.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_is_idempotent() {
        let mut report = MissionReport::new();
        report.ensure(Mission::Cover);
        report.ensure(Mission::Breach).push(Placement::new("Moses", Score::from(9)));
        report.ensure(Mission::Cover);
        assert_eq!(report.len(), 2);
        assert_eq!(report.entries()[0].mission, Mission::Cover);
        assert_eq!(report.get(Mission::Cover), Some(&[][..]));
        assert_eq!(report.get(Mission::Breach).unwrap()[0].operator, "Moses");
        assert_eq!(report.operator_count(), 1);
        assert!(!report.contains(Mission::Knife));
    }
}
