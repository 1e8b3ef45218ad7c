use crate::{Mission, ProtocolError, Score};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};

/// Per-mission operator scores. Operator order within a mission follows the
/// source document and feeds the engine's first-seen ordering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTable {
    missions: HashMap<Mission, IndexMap<String, Score>>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(data: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ProtocolError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ProtocolError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Adds or replaces one score. Keeps the operator's original position when replacing.
    pub fn insert(&mut self, mission: Mission, operator: impl Into<String>, score: Score) {
        self.missions
            .entry(mission)
            .or_default()
            .insert(operator.into(), score);
    }

    pub fn with(mut self, mission: Mission, operator: impl Into<String>, score: Score) -> Self {
        self.insert(mission, operator, score);
        self
    }

    /// Operators listed under `mission`, in table order. Empty for unknown missions.
    pub fn operators(&self, mission: Mission) -> impl Iterator<Item = (&str, Score)> + '_ {
        self.missions
            .get(&mission)
            .into_iter()
            .flat_map(|ops| ops.iter().map(|(name, score)| (name.as_str(), *score)))
    }

    pub fn score(&self, mission: Mission, operator: &str) -> Option<Score> {
        self.missions.get(&mission)?.get(operator).copied()
    }

    pub fn mission_count(&self) -> usize {
        self.missions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keeps_operator_order() {
        let table = ValueTable::from_json_str(
            r#"{"Breach": {"Moses": 9, "Diana": 5, "Apollon": 7}, "Clean Up": {"Kirin": 3}}"#,
        )
        .unwrap();
        let ops = table.operators(Mission::Breach).collect::<Vec<_>>();
        assert_eq!(
            ops,
            vec![
                ("Moses", Score::from(9)),
                ("Diana", Score::from(5)),
                ("Apollon", Score::from(7))
            ]
        );
        assert_eq!(table.score(Mission::CleanUp, "Kirin"), Some(Score::from(3)));
        assert_eq!(table.operators(Mission::Cover).count(), 0);
    }

    #[test]
    fn test_rejects_unknown_mission_and_negative_scores() {
        assert!(ValueTable::from_json_str(r#"{"Moon": {"Moses": 1}}"#).is_err());
        assert!(ValueTable::from_json_str(r#"{"Breach": {"Moses": -1}}"#).is_err());
    }

    #[test]
    fn test_fractional_scores_load() {
        let table = ValueTable::from_json_str(r#"{"Breach": {"Moses": 7.5, "Diana": 9}}"#).unwrap();
        assert_eq!(table.score(Mission::Breach, "Moses"), Score::new(7.5));
        assert_eq!(table.score(Mission::Breach, "Diana"), Some(Score::from(9)));
    }

    #[test]
    fn test_load_from_missing_path() {
        let err = ValueTable::load_from_path("/nonexistent/values.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/values.json"));
    }
}
