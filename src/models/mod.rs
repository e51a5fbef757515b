//! Data structures for the tournament engine: participants, fixtures, phases,
//! standings and brackets.

mod bracket;
mod fixture;
mod participant;
mod phase;
mod standings;
mod tournament;

pub use bracket::{Bracket, BracketSlot, Pairing, Stage, SUPPORTED_BRACKET_SIZES};
pub use fixture::{Fixture, FixtureId, Leg};
pub use participant::{Enrollment, Participant, ParticipantId};
pub use phase::{
    DrawPolicy, PairingAlgorithm, Phase, PhaseConfig, PhaseFormat, PhaseId, PhaseState,
};
pub use standings::{ScoringRules, StandingsRow, Zone};
pub use tournament::{EngineError, ErrorKind, Tournament, TournamentId};
