use clanops_protocol::{MissionReport, Selection, Slot};
use std::fmt::Write as _;

pub const REPLY_HEADER: &str = "**Best operator placement for your clan:**";
pub const REJECTION_TEXT: &str = "You must pick at least one mission.";
pub const NO_OPERATORS_TEXT: &str = "No operators found for this mission";

/// Text rendering of a report, one block per slot including skipped ones.
pub fn format_reply(selection: &Selection, report: &MissionReport) -> String {
    let mut out = format!("{REPLY_HEADER}\n\n");
    for (idx, slot) in selection.slots().iter().enumerate() {
        let number = idx + 1;
        let mission = match slot {
            Slot::Skip => {
                let _ = write!(out, "M{number} - (skipped)\n\n");
                continue;
            }
            Slot::Mission(mission) => *mission,
        };
        let placements = report.get(mission).unwrap_or(&[]);
        let ops = if placements.is_empty() {
            NO_OPERATORS_TEXT.to_string()
        } else {
            placements
                .iter()
                .map(|p| format!("{} ({})", p.operator, p.score))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = write!(out, "M{number} - {mission}:\n{ops}\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clanops_protocol::{Mission, Placement, Score};

    #[test]
    fn test_reply_lists_every_slot() {
        let selection = Selection::from_options([
            Some(Mission::Breach),
            None,
            Some(Mission::Cover),
        ])
        .unwrap();
        let mut report = MissionReport::new();
        report.ensure(Mission::Breach).extend([
            Placement::new("Moses", Score::from(9)),
            Placement::new("Diana", Score::from(5)),
        ]);
        report.ensure(Mission::Cover);

        let reply = format_reply(&selection, &report);
        let expected = "**Best operator placement for your clan:**\n\n\
            M1 - Breach:\nMoses (9), Diana (5)\n\n\
            M2 - (skipped)\n\n\
            M3 - Cover:\nNo operators found for this mission\n\n\
            M4 - (skipped)\n\n\
            M5 - (skipped)\n\n\
            M6 - (skipped)\n\n\
            M7 - (skipped)\n\n\
            M8 - (skipped)\n\n";
        assert_eq!(reply, expected);
    }

    #[test]
    fn test_reply_uses_display_names() {
        let selection = Selection::from_options([Some(Mission::Bss)]).unwrap();
        let mut report = MissionReport::new();
        report.ensure(Mission::Bss).push(Placement::new("Hawk", Score::from(3)));
        let reply = format_reply(&selection, &report);
        assert!(reply.contains("M1 - B.S.S:\nHawk (3)\n\n"));
    }

    #[test]
    fn test_reply_prints_fractional_and_whole_scores() {
        let values = clanops_protocol::ValueTable::from_json_str(
            r#"{"Breach": {"Moses": 7.5, "Diana": 9}}"#,
        )
        .unwrap();
        let selection = Selection::from_options([Some(Mission::Breach)]).unwrap();
        let report = clanops_engine::assign_best_operators(&selection, &values).unwrap();
        let reply = format_reply(&selection, &report);
        assert!(reply.contains("M1 - Breach:\nDiana (9), Moses (7.5)\n\n"));
    }
}
