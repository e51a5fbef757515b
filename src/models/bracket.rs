//! Knockout bracket: stages, slots and pairings.

use crate::models::fixture::FixtureId;
use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// Bracket sizes the scheduler accepts.
pub const SUPPORTED_BRACKET_SIZES: [usize; 6] = [2, 4, 8, 16, 32, 64];

/// One stage of a single-elimination bracket.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    RoundOf64,
    RoundOf32,
    RoundOf16,
    Quarterfinal,
    Semifinal,
    Final,
    ThirdPlace,
}

impl Stage {
    /// Entry stage for a bracket of the given size.
    pub fn entry_for(size: usize) -> Option<Stage> {
        match size {
            64 => Some(Stage::RoundOf64),
            32 => Some(Stage::RoundOf32),
            16 => Some(Stage::RoundOf16),
            8 => Some(Stage::Quarterfinal),
            4 => Some(Stage::Semifinal),
            2 => Some(Stage::Final),
            _ => None,
        }
    }

    /// The stage the winners of this one advance to.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::RoundOf64 => Some(Stage::RoundOf32),
            Stage::RoundOf32 => Some(Stage::RoundOf16),
            Stage::RoundOf16 => Some(Stage::Quarterfinal),
            Stage::Quarterfinal => Some(Stage::Semifinal),
            Stage::Semifinal => Some(Stage::Final),
            Stage::Final | Stage::ThirdPlace => None,
        }
    }

    /// Number of slots (participant positions) in this stage.
    pub fn slots(self) -> usize {
        match self {
            Stage::RoundOf64 => 64,
            Stage::RoundOf32 => 32,
            Stage::RoundOf16 => 16,
            Stage::Quarterfinal => 8,
            Stage::Semifinal => 4,
            Stage::Final | Stage::ThirdPlace => 2,
        }
    }
}

/// One position in the knockout tree. Created at generation time; only ever
/// mutated by winner propagation, never deleted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketSlot {
    pub stage: Stage,
    /// Index within the stage.
    pub index: u32,
    pub participant: Option<ParticipantId>,
    /// The fixture(s) whose outcome fills this slot. Empty for entry slots.
    pub fixtures: Vec<FixtureId>,
}

/// One pairing of a stage and the fixture leg(s) that settle it. Slots
/// `2 * index` and `2 * index + 1` of the stage are the two sides.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub stage: Stage,
    pub index: u32,
    pub fixtures: Vec<FixtureId>,
}

/// The full knockout tree for a phase.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub slots: Vec<BracketSlot>,
    pub pairings: Vec<Pairing>,
}

impl Bracket {
    pub fn slot(&self, stage: Stage, index: u32) -> Option<&BracketSlot> {
        self.slots
            .iter()
            .find(|s| s.stage == stage && s.index == index)
    }

    pub fn slot_mut(&mut self, stage: Stage, index: u32) -> Option<&mut BracketSlot> {
        self.slots
            .iter_mut()
            .find(|s| s.stage == stage && s.index == index)
    }

    /// Whether every slot fed by fixtures has been filled.
    pub fn is_resolved(&self) -> bool {
        self.slots
            .iter()
            .all(|s| s.fixtures.is_empty() || s.participant.is_some())
    }
}
