//! Standings rows, zone bands and point scoring rules.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// Points awarded per result. Defaults to the usual 3/1/0.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub win: i32,
    pub draw: i32,
    pub loss: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            win: 3,
            draw: 1,
            loss: 0,
        }
    }
}

/// A named, colored band over final standing positions (both bounds inclusive,
/// 1-based). Zone lists must not overlap; overlap is rejected at write time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub position_from: u32,
    pub position_to: u32,
    pub color_hex: String,
}

impl Zone {
    /// Whether the given 1-based position falls inside this zone.
    pub fn contains(&self, position: u32) -> bool {
        self.position_from <= position && position <= self.position_to
    }

    /// Whether two zones share any position.
    pub fn overlaps(&self, other: &Zone) -> bool {
        self.position_from <= other.position_to && other.position_from <= self.position_to
    }
}

/// One row of a standings table. Derived from the played fixture set, never
/// stored; recomputed from scratch whenever any fixture in scope changes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub participant: ParticipantId,
    pub points: i32,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    /// 1-based rank; every row gets a distinct position.
    pub position: u32,
    pub zone_name: Option<String>,
    /// `None` when the position falls outside every zone (rendered transparent).
    pub zone_color: Option<String>,
}

impl StandingsRow {
    /// Zeroed row for a participant that has not played yet.
    pub fn new(participant: ParticipantId) -> Self {
        Self {
            participant,
            points: 0,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            position: 0,
            zone_name: None,
            zone_color: None,
        }
    }
}
