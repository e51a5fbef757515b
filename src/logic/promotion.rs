//! Promotion/import engine: moving standings output from one phase into the
//! seed set of another (standard top-K, Elite/Intermediate/Rest tier split,
//! fixed-count import).

use crate::logic::phase::phase_standings;
use crate::models::{EngineError, ParticipantId, Phase, PhaseId, PhaseState, StandingsRow, Tournament};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Operator-submitted three-way partition of a phase's participant pool.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TierAssignment {
    pub elite: Vec<ParticipantId>,
    pub intermediate: Vec<ParticipantId>,
    pub rest: Vec<ParticipantId>,
}

/// Validated tier pools, each usable as a target phase's seed list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TierPools {
    pub elite: Vec<ParticipantId>,
    pub intermediate: Vec<ParticipantId>,
    pub rest: Vec<ParticipantId>,
}

/// Top-K of a standings table, in position order, as a seed list.
pub fn standard_promotion(
    standings: &[StandingsRow],
    k: usize,
) -> Result<Vec<ParticipantId>, EngineError> {
    if standings.len() < k {
        return Err(EngineError::SelectionCountMismatch {
            expected: k,
            actual: standings.len(),
        });
    }
    Ok(standings.iter().take(k).map(|r| r.participant).collect())
}

/// Validate an operator-submitted Elite/Intermediate/Rest partition of a
/// participant pool. Every pool member must land in exactly one tier, and the
/// elite/intermediate tiers must hit their configured capacities exactly
/// (rest takes whatever remains).
pub fn tier_split(
    pool: &[ParticipantId],
    assignment: &TierAssignment,
    elite_size: usize,
    intermediate_size: usize,
) -> Result<TierPools, EngineError> {
    if assignment.elite.len() != elite_size {
        return Err(EngineError::TierSizeMismatch {
            tier: "elite",
            expected: elite_size,
            actual: assignment.elite.len(),
        });
    }
    if assignment.intermediate.len() != intermediate_size {
        return Err(EngineError::TierSizeMismatch {
            tier: "intermediate",
            expected: intermediate_size,
            actual: assignment.intermediate.len(),
        });
    }
    let rest_size = pool.len().saturating_sub(elite_size + intermediate_size);
    if assignment.rest.len() != rest_size {
        return Err(EngineError::TierSizeMismatch {
            tier: "rest",
            expected: rest_size,
            actual: assignment.rest.len(),
        });
    }

    let pool_set: HashSet<ParticipantId> = pool.iter().copied().collect();
    let mut seen: HashSet<ParticipantId> = HashSet::new();
    for &id in assignment
        .elite
        .iter()
        .chain(&assignment.intermediate)
        .chain(&assignment.rest)
    {
        if !pool_set.contains(&id) {
            return Err(EngineError::ParticipantNotFound { participant: id });
        }
        if !seen.insert(id) {
            return Err(EngineError::InvalidConfig { field: "tiers" });
        }
    }

    Ok(TierPools {
        elite: assignment.elite.clone(),
        intermediate: assignment.intermediate.clone(),
        rest: assignment.rest.clone(),
    })
}

/// Exactly `n` participants picked from a source standings table. The result
/// follows the source position order, not submission order, so re-running
/// with the same selection always yields the same seed list.
pub fn fixed_import(
    standings: &[StandingsRow],
    selection: &[ParticipantId],
    n: usize,
) -> Result<Vec<ParticipantId>, EngineError> {
    if selection.len() != n {
        return Err(EngineError::SelectionCountMismatch {
            expected: n,
            actual: selection.len(),
        });
    }
    let wanted: HashSet<ParticipantId> = selection.iter().copied().collect();
    if wanted.len() != n {
        return Err(EngineError::SelectionCountMismatch {
            expected: n,
            actual: wanted.len(),
        });
    }
    for &id in selection {
        if !standings.iter().any(|r| r.participant == id) {
            return Err(EngineError::ParticipantNotFound { participant: id });
        }
    }
    Ok(standings
        .iter()
        .filter(|r| wanted.contains(&r.participant))
        .map(|r| r.participant)
        .collect())
}

/// Apply a seed list to a phase. Only legal before generation; promotion is
/// an explicit operator action, never an automatic side effect.
pub fn apply_seeds(phase: &mut Phase, seeds: Vec<ParticipantId>) -> Result<(), EngineError> {
    if phase.state != PhaseState::Configured {
        return Err(EngineError::AlreadyGenerated);
    }
    phase.seeds = seeds;
    Ok(())
}

/// One import request: how to pick participants from the source phase and
/// which phase(s) receive them as seeds.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ImportSpec {
    /// Top-K of the source standings into one target phase.
    Standard { target_phase: PhaseId, count: usize },
    /// Elite/Intermediate/Rest split of the source pool; each named target
    /// receives its tier as a seed list.
    Tiers {
        elite_size: usize,
        intermediate_size: usize,
        assignment: TierAssignment,
        elite_target: Option<PhaseId>,
        intermediate_target: Option<PhaseId>,
        rest_target: Option<PhaseId>,
    },
    /// Exactly `count` hand-picked participants into one target phase.
    Fixed {
        target_phase: PhaseId,
        selection: Vec<ParticipantId>,
        count: usize,
    },
}

/// Run an import from a source phase into its target(s). Idempotent at the
/// data level: the same spec against the same source always produces the
/// same seed lists. Targets are validated up front so nothing is applied on
/// failure.
pub fn run_import(
    tournament: &mut Tournament,
    source_phase: PhaseId,
    spec: ImportSpec,
) -> Result<(), EngineError> {
    if tournament.phase(source_phase).is_none() {
        return Err(EngineError::PhaseNotFound {
            phase: source_phase,
        });
    }
    match spec {
        ImportSpec::Standard {
            target_phase,
            count,
        } => {
            let standings = phase_standings(tournament, source_phase, None)?;
            let seeds = standard_promotion(&standings, count)?;
            let target = tournament
                .phase_mut(target_phase)
                .ok_or(EngineError::PhaseNotFound {
                    phase: target_phase,
                })?;
            apply_seeds(target, seeds)
        }
        ImportSpec::Fixed {
            target_phase,
            selection,
            count,
        } => {
            let standings = phase_standings(tournament, source_phase, None)?;
            let seeds = fixed_import(&standings, &selection, count)?;
            let target = tournament
                .phase_mut(target_phase)
                .ok_or(EngineError::PhaseNotFound {
                    phase: target_phase,
                })?;
            apply_seeds(target, seeds)
        }
        ImportSpec::Tiers {
            elite_size,
            intermediate_size,
            assignment,
            elite_target,
            intermediate_target,
            rest_target,
        } => {
            let pool = tournament
                .phase(source_phase)
                .map(|p| p.seeds.clone())
                .unwrap_or_default();
            let pools = tier_split(&pool, &assignment, elite_size, intermediate_size)?;
            let targets = [
                (elite_target, pools.elite),
                (intermediate_target, pools.intermediate),
                (rest_target, pools.rest),
            ];
            // Validate every target before touching any, so a bad one does
            // not leave the others half-applied.
            for (target, _) in &targets {
                if let Some(id) = target {
                    let phase = tournament
                        .phase(*id)
                        .ok_or(EngineError::PhaseNotFound { phase: *id })?;
                    if phase.state != PhaseState::Configured {
                        return Err(EngineError::AlreadyGenerated);
                    }
                }
            }
            for (target, seeds) in targets {
                if let Some(id) = target {
                    if let Some(phase) = tournament.phase_mut(id) {
                        apply_seeds(phase, seeds)?;
                    }
                }
            }
            Ok(())
        }
    }
}
