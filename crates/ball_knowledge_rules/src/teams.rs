//! Static team reference tables: alias canonicalization and league alignment.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Legacy or alternate team codes and their modern canonical code.
const TEAM_ALIASES: &[(&str, &str)] = &[
    ("NWE", "NE"),
    ("GNB", "GB"),
    ("KAN", "KC"),
    ("TAM", "TB"),
    ("TBB", "TB"),
    ("SDG", "LAC"),
    ("SD", "LAC"),
    ("STL", "LAR"),
    ("RAM", "LAR"),
    ("LA", "LAR"),
    ("OAK", "LV"),
    ("RAI", "LV"),
    ("LVR", "LV"),
    ("CRD", "ARI"),
    ("ARZ", "ARI"),
    ("OTI", "TEN"),
    ("NOR", "NO"),
    ("SFO", "SF"),
    ("WSH", "WAS"),
    ("WFT", "WAS"),
    ("JAC", "JAX"),
    ("BLT", "BAL"),
];

/// Conference of a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Conference {
    /// American Football Conference.
    #[strum(serialize = "AFC")]
    #[serde(rename = "AFC")]
    Afc,
    /// National Football Conference.
    #[strum(serialize = "NFC")]
    #[serde(rename = "NFC")]
    Nfc,
}

/// Division within a conference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Division {
    /// East division.
    East,
    /// North division.
    North,
    /// South division.
    South,
    /// West division.
    West,
}

/// Canonical team code and its alignment.
const ALIGNMENT: &[(&str, Conference, Division)] = &[
    ("BUF", Conference::Afc, Division::East),
    ("MIA", Conference::Afc, Division::East),
    ("NE", Conference::Afc, Division::East),
    ("NYJ", Conference::Afc, Division::East),
    ("BAL", Conference::Afc, Division::North),
    ("CIN", Conference::Afc, Division::North),
    ("CLE", Conference::Afc, Division::North),
    ("PIT", Conference::Afc, Division::North),
    ("HOU", Conference::Afc, Division::South),
    ("IND", Conference::Afc, Division::South),
    ("JAX", Conference::Afc, Division::South),
    ("TEN", Conference::Afc, Division::South),
    ("DEN", Conference::Afc, Division::West),
    ("KC", Conference::Afc, Division::West),
    ("LAC", Conference::Afc, Division::West),
    ("LV", Conference::Afc, Division::West),
    ("DAL", Conference::Nfc, Division::East),
    ("NYG", Conference::Nfc, Division::East),
    ("PHI", Conference::Nfc, Division::East),
    ("WAS", Conference::Nfc, Division::East),
    ("CHI", Conference::Nfc, Division::North),
    ("DET", Conference::Nfc, Division::North),
    ("GB", Conference::Nfc, Division::North),
    ("MIN", Conference::Nfc, Division::North),
    ("ATL", Conference::Nfc, Division::South),
    ("CAR", Conference::Nfc, Division::South),
    ("NO", Conference::Nfc, Division::South),
    ("TB", Conference::Nfc, Division::South),
    ("ARI", Conference::Nfc, Division::West),
    ("LAR", Conference::Nfc, Division::West),
    ("SF", Conference::Nfc, Division::West),
    ("SEA", Conference::Nfc, Division::West),
];

/// Canonicalizes a raw team code. Blank input yields `None`; unknown codes
/// pass through uppercased.
pub fn canonical_team(code: &str) -> Option<String> {
    let code = code.trim().to_ascii_uppercase();
    if code.is_empty() {
        return None;
    }
    let canon = TEAM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == code)
        .map(|(_, canon)| (*canon).to_string())
        .unwrap_or(code);
    Some(canon)
}

/// Conference and division of a canonical team code.
pub fn alignment(team: &str) -> Option<(Conference, Division)> {
    ALIGNMENT
        .iter()
        .find(|(code, _, _)| *code == team)
        .map(|(_, conf, div)| (*conf, *div))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_target_is_aligned() {
        for (alias, canon) in TEAM_ALIASES {
            assert!(alignment(canon).is_some(), "{alias} -> {canon} has no alignment");
        }
    }

    #[test]
    fn test_alignment_covers_32_teams() {
        assert_eq!(ALIGNMENT.len(), 32);
    }
}
