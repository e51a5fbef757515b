//! Fixture: one match skeleton with leg designation, goals and penalties.

use crate::models::participant::ParticipantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a fixture.
pub type FixtureId = Uuid;

/// Which part of a stage or two-legged tie a fixture belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    /// League/group play fixture (single-leg round robin).
    Group,
    /// First leg of a two-legged tie.
    Leg1,
    /// Second (deciding) leg of a two-legged tie.
    Leg2,
    /// Lone match of a single-legged knockout pairing.
    Single,
    /// Lone final match.
    FinalSingle,
    FinalLeg1,
    FinalLeg2,
    /// Match between the two semifinal losers.
    ThirdPlace,
}

impl Leg {
    /// Whether this fixture alone decides an elimination pairing.
    pub fn is_lone_decider(self) -> bool {
        matches!(self, Leg::Single | Leg::FinalSingle | Leg::ThirdPlace)
    }

    /// Whether this fixture closes a two-legged tie.
    pub fn is_second_leg(self) -> bool {
        matches!(self, Leg::Leg2 | Leg::FinalLeg2)
    }
}

/// A single fixture. Sides are `None` until resolved (knockout fixtures beyond
/// the entry stage are created before their participants are known).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub phase_id: Uuid,
    /// 0-based round index within the phase (stage ordinal for knockouts).
    pub round: u32,
    /// Group index, for phases split into groups.
    pub group: Option<u32>,
    pub leg: Leg,
    pub home: Option<ParticipantId>,
    pub away: Option<ParticipantId>,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    /// Penalty shootout scores; only ever set in elimination contexts.
    pub home_pens: Option<u32>,
    pub away_pens: Option<u32>,
    pub played: bool,
    pub venue: Option<String>,
    /// Kickoff time, set by the caller; never used in scheduling decisions.
    pub kickoff: Option<DateTime<Utc>>,
}

impl Fixture {
    /// Create an unplayed fixture skeleton.
    pub fn skeleton(
        phase_id: Uuid,
        round: u32,
        group: Option<u32>,
        leg: Leg,
        home: Option<ParticipantId>,
        away: Option<ParticipantId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase_id,
            round,
            group,
            leg,
            home,
            away,
            home_goals: None,
            away_goals: None,
            home_pens: None,
            away_pens: None,
            played: false,
            venue: None,
            kickoff: None,
        }
    }

    /// Whether the given participant plays in this fixture.
    pub fn involves(&self, id: ParticipantId) -> bool {
        self.home == Some(id) || self.away == Some(id)
    }

    /// Goals scored by the given participant in this fixture, if played.
    pub fn goals_for(&self, id: ParticipantId) -> Option<u32> {
        if self.home == Some(id) {
            self.home_goals
        } else if self.away == Some(id) {
            self.away_goals
        } else {
            None
        }
    }

    /// Penalty shootout score for the given participant, if recorded.
    pub fn pens_for(&self, id: ParticipantId) -> Option<u32> {
        if self.home == Some(id) {
            self.home_pens
        } else if self.away == Some(id) {
            self.away_pens
        } else {
            None
        }
    }
}
