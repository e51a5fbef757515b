//! Amateur football tournament organizer: phase scheduling and standings
//! engine, with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    apply_seeds, compute_standings, enroll, fixed_import, generate_phase, head_to_head,
    next_swiss_round, partition_groups, phase_standings, propagate_winners, record_result,
    replace_zones, run_import, schedule_fixture, schedule_groups, schedule_knockout,
    schedule_round_robin, standard_promotion, substitute, swiss_next_round, tier_split,
    ImportSpec, TierAssignment, TierPools,
};
pub use models::{
    Bracket, BracketSlot, DrawPolicy, EngineError, Enrollment, ErrorKind, Fixture, FixtureId,
    Leg, Pairing, PairingAlgorithm, Participant, ParticipantId, Phase, PhaseConfig, PhaseFormat,
    PhaseId, PhaseState, ScoringRules, Stage, StandingsRow, Tournament, TournamentId, Zone,
    SUPPORTED_BRACKET_SIZES,
};
