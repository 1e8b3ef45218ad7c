use crate::AssignmentError;
use clanops_protocol::{Mission, MissionReport, Placement, Score, Selection, ValueTable};
use indexmap::IndexMap;
use tracing::debug;

/// Best (mission, score) per operator, in the order operators were first seen.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Assignment {
    best: IndexMap<String, (Mission, Score)>,
}

impl Assignment {
    pub fn get(&self, operator: &str) -> Option<(Mission, Score)> {
        self.best.get(operator).copied()
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    /// Groups operators by their assigned mission. Every selected mission gets
    /// an entry; lists are sorted by score descending with first-seen order
    /// kept among equal scores.
    pub fn into_report(self, selection: &Selection) -> MissionReport {
        let mut report = MissionReport::new();
        for mission in selection.distinct_missions() {
            report.ensure(mission);
        }
        for (operator, (mission, score)) in self.best {
            report.ensure(mission).push(Placement { operator, score });
        }
        for entry in report.entries_mut() {
            // stable: equal scores keep insertion order
            entry.placements.sort_by(|a, b| b.score.cmp(&a.score));
        }
        report
    }
}

/// Scans selected slots in order and records, per operator, the first mission
/// offering its strictly highest score.
pub fn assign(selection: &Selection, values: &ValueTable) -> Result<Assignment, AssignmentError> {
    if !selection.has_selection() {
        return Err(AssignmentError::NoMissionSelected);
    }

    let mut best: IndexMap<String, (Mission, Score)> = IndexMap::new();
    for (_slot, mission) in selection.selected() {
        for (operator, score) in values.operators(mission) {
            match best.get_mut(operator) {
                Some(current) if score > current.1 => *current = (mission, score),
                Some(_) => {}
                None => {
                    best.insert(operator.to_string(), (mission, score));
                }
            }
        }
    }
    Ok(Assignment { best })
}

pub fn assign_best_operators(
    selection: &Selection,
    values: &ValueTable,
) -> Result<MissionReport, AssignmentError> {
    let assignment = assign(selection, values)?;
    let operators = assignment.len();
    let report = assignment.into_report(selection);
    debug!(
        operators,
        missions = report.len(),
        "assigned operators to selected missions"
    );
    Ok(report)
}
