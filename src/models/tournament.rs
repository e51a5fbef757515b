//! Tournament aggregate and the engine error taxonomy.

use crate::models::fixture::FixtureId;
use crate::models::participant::{Participant, ParticipantId};
use crate::models::phase::{Phase, PhaseId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Broad class of an engine error. Callers use this to tell "you gave bad
/// input" apart from "the system is in an inconsistent state".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad request data or configuration; nothing was mutated.
    Config,
    /// The operation is not legal in the current lifecycle state.
    State,
    /// Bad data reached the engine; warrants investigation, not a retry.
    Integrity,
    /// The requested configuration cannot be satisfied; relax a constraint.
    Infeasible,
    NotFound,
}

/// Errors that can occur during engine operations. Every operation is
/// all-or-nothing: an error means no state was mutated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineError {
    /// The player already has an active enrollment in this season.
    DuplicateEnrollment { player_id: String },
    /// The incoming player already backs the participant being replaced.
    SameAsIncoming,
    /// A fixture in scope references a participant outside the enrolled set.
    OrphanMatchReference { participant: ParticipantId },
    /// Bracket size is not one of 2, 4, 8, 16, 32, 64.
    UnsupportedBracketSize { size: usize },
    /// Seed list length does not match what the format requires.
    SeedCountMismatch { expected: usize, actual: usize },
    /// A submitted tier does not match its configured capacity.
    TierSizeMismatch {
        tier: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A fixed-count import selected the wrong number of participants.
    SelectionCountMismatch { expected: usize, actual: usize },
    /// Two zones share at least one position.
    ZoneOverlap { first: String, second: String },
    /// A zone's bounds are inverted or zero.
    ZoneInvalid { zone: String },
    /// A required configuration field is missing or out of range.
    InvalidConfig { field: &'static str },
    /// The phase has already been generated; reset before retrying.
    AlreadyGenerated,
    /// The operation is not valid in the current state.
    InvalidState,
    /// The fixture already has a recorded result.
    FixtureAlreadyPlayed,
    /// The fixture's sides have not been resolved yet.
    FixtureUnresolved,
    /// Not every fixture of the previous round has a result yet.
    ResultsIncomplete,
    /// A level elimination tie was submitted without a penalty shootout.
    PenaltyShootoutMissing,
    /// A penalty shootout cannot end level.
    PenaltyTieInvalid,
    /// The home-game cap cannot be satisfied by any swap sequence.
    HomeCapUnsatisfiable { cap: u32 },
    /// No repeat-free pairing exists for the next swiss round.
    NoValidPairing,
    /// Too few participants for the requested schedule.
    InsufficientParticipants { required: usize, actual: usize },
    PhaseNotFound { phase: PhaseId },
    FixtureNotFound { fixture: FixtureId },
    ParticipantNotFound { participant: ParticipantId },
}

impl EngineError {
    /// Taxonomy class of this error.
    pub fn kind(&self) -> ErrorKind {
        use EngineError::*;
        match self {
            DuplicateEnrollment { .. }
            | SameAsIncoming
            | UnsupportedBracketSize { .. }
            | SeedCountMismatch { .. }
            | TierSizeMismatch { .. }
            | SelectionCountMismatch { .. }
            | ZoneOverlap { .. }
            | ZoneInvalid { .. }
            | InvalidConfig { .. }
            | PenaltyShootoutMissing => ErrorKind::Config,
            AlreadyGenerated
            | InvalidState
            | FixtureAlreadyPlayed
            | FixtureUnresolved
            | ResultsIncomplete => ErrorKind::State,
            OrphanMatchReference { .. } | PenaltyTieInvalid => ErrorKind::Integrity,
            HomeCapUnsatisfiable { .. } | NoValidPairing | InsufficientParticipants { .. } => {
                ErrorKind::Infeasible
            }
            PhaseNotFound { .. } | FixtureNotFound { .. } | ParticipantNotFound { .. } => {
                ErrorKind::NotFound
            }
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use EngineError::*;
        match self {
            DuplicateEnrollment { player_id } => {
                write!(f, "Player {} is already enrolled this season", player_id)
            }
            SameAsIncoming => write!(f, "Incoming player is the same as the outgoing one"),
            OrphanMatchReference { participant } => {
                write!(f, "Fixture references unknown participant {}", participant)
            }
            UnsupportedBracketSize { size } => write!(
                f,
                "Unsupported bracket size {} (use 2, 4, 8, 16, 32 or 64)",
                size
            ),
            SeedCountMismatch { expected, actual } => {
                write!(f, "Expected {} seeds, got {}", expected, actual)
            }
            TierSizeMismatch {
                tier,
                expected,
                actual,
            } => write!(
                f,
                "Tier {} must hold {} participants, got {}",
                tier, expected, actual
            ),
            SelectionCountMismatch { expected, actual } => write!(
                f,
                "Must select exactly {} participants (selected {})",
                expected, actual
            ),
            ZoneOverlap { first, second } => write!(f, "Zones {} and {} overlap", first, second),
            ZoneInvalid { zone } => write!(f, "Zone {} has invalid bounds", zone),
            InvalidConfig { field } => write!(f, "Invalid or missing config field {}", field),
            AlreadyGenerated => write!(f, "Phase has already been generated"),
            InvalidState => write!(f, "Invalid state for this action"),
            FixtureAlreadyPlayed => write!(f, "Fixture already has a result"),
            FixtureUnresolved => write!(f, "Fixture sides are not resolved yet"),
            ResultsIncomplete => write!(f, "Not all fixtures of the previous round are played"),
            PenaltyShootoutMissing => {
                write!(f, "Level elimination tie requires a penalty shootout")
            }
            PenaltyTieInvalid => write!(f, "A penalty shootout cannot end level"),
            HomeCapUnsatisfiable { cap } => {
                write!(f, "Cannot keep every participant within {} home games", cap)
            }
            NoValidPairing => write!(f, "No repeat-free pairing exists for the next round"),
            InsufficientParticipants { required, actual } => {
                write!(f, "Need at least {} participants, got {}", required, actual)
            }
            PhaseNotFound { phase } => write!(f, "Phase {} not found", phase),
            FixtureNotFound { fixture } => write!(f, "Fixture {} not found", fixture),
            ParticipantNotFound { participant } => {
                write!(f, "Participant {} not found", participant)
            }
        }
    }
}

/// Full tournament state: enrolled participants and phases for one season.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Opaque external season id; enrollment uniqueness is per season.
    pub season_id: String,
    pub participants: Vec<Participant>,
    pub phases: Vec<Phase>,
}

impl Tournament {
    /// Create an empty tournament for a season.
    pub fn new(name: impl Into<String>, season_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            season_id: season_id.into(),
            participants: Vec::new(),
            phases: Vec::new(),
        }
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    pub fn phase(&self, id: PhaseId) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    pub fn phase_mut(&mut self, id: PhaseId) -> Option<&mut Phase> {
        self.phases.iter_mut().find(|p| p.id == id)
    }

    /// Whether the player currently holds an active enrollment.
    pub fn has_active_player(&self, player_id: &str) -> bool {
        self.participants
            .iter()
            .any(|p| p.active && p.player_id == player_id)
    }

    /// Ids of all active participants, in enrollment order.
    pub fn active_participant_ids(&self) -> Vec<ParticipantId> {
        self.participants
            .iter()
            .filter(|p| p.active)
            .map(|p| p.id)
            .collect()
    }
}
