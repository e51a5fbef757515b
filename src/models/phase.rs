//! Phase: one stage of a tournament, with its format, configuration and
//! generated fixtures.

use crate::models::bracket::Bracket;
use crate::models::fixture::{Fixture, FixtureId};
use crate::models::participant::ParticipantId;
use crate::models::standings::{ScoringRules, Zone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a phase.
pub type PhaseId = Uuid;

/// Competition format of a phase.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseFormat {
    /// One league table, everyone in the same pool.
    RoundRobin,
    /// Seeds split into groups, each playing its own round robin.
    Groups,
    /// Single-elimination bracket.
    Knockout,
    /// Exactly one fixture between two seeds.
    SingleMatch,
}

/// Lifecycle of a phase. Transitions only move forward.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseState {
    /// Created, not yet scheduled; seeds may still change.
    #[default]
    Configured,
    /// Fixtures exist, none played.
    Generated,
    /// At least one fixture played.
    InProgress,
    /// Every fixture played (and, for knockouts, every slot resolved).
    Complete,
}

/// How league fixtures are paired.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingAlgorithm {
    /// Classic all-vs-all circle method.
    #[default]
    CircleMethod,
    /// Round-by-round pairing of closest cumulative points.
    Swiss,
    /// Seeded shuffle of the seed list, then the circle construction.
    BalancedRandom,
}

/// How participants are assigned to entry-stage bracket slots.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    /// Seed 1 faces seed n, seed 2 faces seed n-1, and so on.
    #[default]
    StandardRanking,
    /// Seeded full-random draw.
    RandomDraw,
    /// Top half and bottom half form pots A and B; each pairing draws one
    /// from each pot.
    DirectedPots,
}

/// Format-specific configuration. One struct serves every format; fields not
/// relevant to the chosen format are ignored at generation time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    /// Two legs (home and away) per pairing.
    #[serde(default)]
    pub double_leg: bool,
    /// The Final is a lone match even when earlier stages are two-legged.
    #[serde(default)]
    pub single_final: bool,
    /// Play a third-place fixture between the semifinal losers.
    #[serde(default)]
    pub third_place: bool,
    /// Starting knockout size; must be one of 2, 4, 8, 16, 32, 64.
    #[serde(default)]
    pub bracket_size: Option<usize>,
    /// Target group size for the GROUPS format.
    #[serde(default)]
    pub group_size: Option<usize>,
    /// Round cap (circle/balanced-random) or total round count (swiss).
    #[serde(default)]
    pub rounds: Option<u32>,
    /// Upper bound on home fixtures per participant.
    #[serde(default)]
    pub max_home_games: Option<u32>,
    #[serde(default)]
    pub algorithm: PairingAlgorithm,
    #[serde(default)]
    pub draw_policy: DrawPolicy,
    #[serde(default)]
    pub scoring: ScoringRules,
    /// RNG seed for seeded algorithms; drawn from entropy and recorded on the
    /// phase when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            double_leg: false,
            single_final: false,
            third_place: false,
            bracket_size: None,
            group_size: None,
            rounds: None,
            max_home_games: None,
            algorithm: PairingAlgorithm::default(),
            draw_policy: DrawPolicy::default(),
            scoring: ScoringRules::default(),
            seed: None,
        }
    }
}

/// One stage of a tournament: configuration, seed list, fixtures and zones.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub tournament_id: Uuid,
    pub name: String,
    /// Position in the tournament's phase sequence.
    pub order: u32,
    pub format: PhaseFormat,
    pub config: PhaseConfig,
    pub state: PhaseState,
    /// Ordered seed list the schedulers draw from.
    pub seeds: Vec<ParticipantId>,
    pub fixtures: Vec<Fixture>,
    pub zones: Vec<Zone>,
    /// Present for KNOCKOUT phases once generated.
    pub bracket: Option<Bracket>,
    /// RNG seed actually used at generation, for replay/audit.
    pub rng_seed: Option<u64>,
}

impl Phase {
    /// Create a phase in the Configured state with no seeds or fixtures.
    pub fn new(
        tournament_id: Uuid,
        name: impl Into<String>,
        order: u32,
        format: PhaseFormat,
        config: PhaseConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: name.into(),
            order,
            format,
            config,
            state: PhaseState::default(),
            seeds: Vec::new(),
            fixtures: Vec::new(),
            zones: Vec::new(),
            bracket: None,
            rng_seed: None,
        }
    }

    pub fn fixture(&self, id: FixtureId) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == id)
    }

    pub fn fixture_mut(&mut self, id: FixtureId) -> Option<&mut Fixture> {
        self.fixtures.iter_mut().find(|f| f.id == id)
    }

    /// Whether every generated fixture has been played.
    pub fn all_played(&self) -> bool {
        self.fixtures.iter().all(|f| f.played)
    }

    /// Number of rounds generated so far (0 when no fixtures exist).
    pub fn round_count(&self) -> u32 {
        self.fixtures
            .iter()
            .map(|f| f.round + 1)
            .max()
            .unwrap_or(0)
    }
}
