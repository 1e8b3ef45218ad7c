use crate::ProtocolError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The fixed set of clan missions a slot can hold.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mission {
    Breach,
    #[serde(rename = "B.S.S")]
    Bss,
    #[serde(rename = "Basic Mission")]
    BasicMission,
    Bayonet,
    #[serde(rename = "Clean Up")]
    CleanUp,
    #[serde(rename = "Common Only")]
    CommonOnly,
    Cover,
    Hammer,
    #[serde(rename = "HILDR")]
    Hildr,
    Knife,
    Local,
    Logistics,
    #[serde(rename = "Rare Only")]
    RareOnly,
    Recon,
    Showdown,
    #[serde(rename = "Uncommon Only")]
    UncommonOnly,
}

impl Mission {
    pub const ALL: [Mission; 16] = [
        Self::Breach,
        Self::Bss,
        Self::BasicMission,
        Self::Bayonet,
        Self::CleanUp,
        Self::CommonOnly,
        Self::Cover,
        Self::Hammer,
        Self::Hildr,
        Self::Knife,
        Self::Local,
        Self::Logistics,
        Self::RareOnly,
        Self::Recon,
        Self::Showdown,
        Self::UncommonOnly,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Breach => "Breach",
            Self::Bss => "B.S.S",
            Self::BasicMission => "Basic Mission",
            Self::Bayonet => "Bayonet",
            Self::CleanUp => "Clean Up",
            Self::CommonOnly => "Common Only",
            Self::Cover => "Cover",
            Self::Hammer => "Hammer",
            Self::Hildr => "HILDR",
            Self::Knife => "Knife",
            Self::Local => "Local",
            Self::Logistics => "Logistics",
            Self::RareOnly => "Rare Only",
            Self::Recon => "Recon",
            Self::Showdown => "Showdown",
            Self::UncommonOnly => "Uncommon Only",
        }
    }

    /// Case-insensitive lookup by display name. Surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let needle = text.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.display_name().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Mission {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ProtocolError::UnknownMission(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Mission::parse("b.s.s"), Some(Mission::Bss));
        assert_eq!(Mission::parse("  clean up "), Some(Mission::CleanUp));
        assert_eq!(Mission::parse("hildr"), Some(Mission::Hildr));
        assert_eq!(Mission::parse("Skip"), None);
        assert!("Nope".parse::<Mission>().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        for mission in Mission::ALL {
            let json = serde_json::to_string(&mission).unwrap();
            assert_eq!(json, format!("\"{}\"", mission.display_name()));
            let back: Mission = serde_json::from_str(&json).unwrap();
            assert_eq!(back, mission);
        }
    }
}
