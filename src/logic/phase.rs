//! Phase state machine: generation dispatch, result recording, completion
//! detection, zone configuration and swiss round advancement.

use crate::logic::bracket::{propagate_winners, schedule_knockout};
use crate::logic::round_robin::{
    partition_groups, schedule_groups, schedule_round_robin, swiss_next_round,
};
use crate::logic::standings::compute_standings;
use crate::models::{
    DrawPolicy, EngineError, Fixture, FixtureId, Leg, PairingAlgorithm, PhaseFormat, PhaseId,
    PhaseState, StandingsRow, Tournament, Zone,
};
use std::collections::HashSet;

/// Generate a phase's fixtures from its applied seed list.
///
/// At-most-once per phase: only legal in the Configured state, and the whole
/// operation is all-or-nothing; a scheduler error leaves the phase untouched.
pub fn generate_phase(tournament: &mut Tournament, phase_id: PhaseId) -> Result<(), EngineError> {
    let active: HashSet<_> = tournament.active_participant_ids().into_iter().collect();
    let phase = tournament
        .phase_mut(phase_id)
        .ok_or(EngineError::PhaseNotFound { phase: phase_id })?;
    if phase.state != PhaseState::Configured {
        return Err(EngineError::AlreadyGenerated);
    }
    if phase.seeds.is_empty() {
        return Err(EngineError::InsufficientParticipants {
            required: 2,
            actual: 0,
        });
    }
    for &seed in &phase.seeds {
        if !active.contains(&seed) {
            return Err(EngineError::OrphanMatchReference { participant: seed });
        }
    }

    let rng_seed = phase.config.seed.unwrap_or_else(rand::random);
    match phase.format {
        PhaseFormat::RoundRobin => {
            phase.fixtures = schedule_round_robin(phase.id, &phase.seeds, &phase.config, rng_seed)?;
        }
        PhaseFormat::Groups => {
            phase.fixtures = schedule_groups(phase.id, &phase.seeds, &phase.config)?;
        }
        PhaseFormat::Knockout => {
            let (bracket, fixtures) =
                schedule_knockout(phase.id, &phase.seeds, &phase.config, rng_seed)?;
            phase.bracket = Some(bracket);
            phase.fixtures = fixtures;
        }
        PhaseFormat::SingleMatch => {
            if phase.seeds.len() != 2 {
                return Err(EngineError::SeedCountMismatch {
                    expected: 2,
                    actual: phase.seeds.len(),
                });
            }
            phase.fixtures = vec![Fixture::skeleton(
                phase.id,
                0,
                None,
                Leg::Single,
                Some(phase.seeds[0]),
                Some(phase.seeds[1]),
            )];
        }
    }

    let seeded = match phase.format {
        PhaseFormat::RoundRobin | PhaseFormat::Groups => {
            matches!(phase.config.algorithm, PairingAlgorithm::BalancedRandom)
        }
        PhaseFormat::Knockout => !matches!(phase.config.draw_policy, DrawPolicy::StandardRanking),
        PhaseFormat::SingleMatch => false,
    };
    phase.rng_seed = if seeded { Some(rng_seed) } else { None };
    phase.state = PhaseState::Generated;
    log::info!(
        "Generated {} fixture(s) for phase {} ({})",
        phase.fixtures.len(),
        phase.name,
        phase.id
    );
    Ok(())
}

/// Record a result for one fixture and advance the owning phase.
///
/// Transitions Generated → InProgress on the first result, runs bracket
/// propagation for knockouts and flips the phase to Complete once every
/// fixture is played (knockouts additionally need every fed slot resolved;
/// swiss phases need their full round count generated and played).
pub fn record_result(
    tournament: &mut Tournament,
    fixture_id: FixtureId,
    home_goals: u32,
    away_goals: u32,
    home_pens: Option<u32>,
    away_pens: Option<u32>,
) -> Result<(), EngineError> {
    let pi = tournament
        .phases
        .iter()
        .position(|p| p.fixture(fixture_id).is_some())
        .ok_or(EngineError::FixtureNotFound {
            fixture: fixture_id,
        })?;
    let phase = &mut tournament.phases[pi];
    let elimination = matches!(
        phase.format,
        PhaseFormat::Knockout | PhaseFormat::SingleMatch
    );

    let fixture = phase
        .fixture(fixture_id)
        .ok_or(EngineError::FixtureNotFound {
            fixture: fixture_id,
        })?;
    if fixture.played {
        return Err(EngineError::FixtureAlreadyPlayed);
    }
    if fixture.home.is_none() || fixture.away.is_none() {
        return Err(EngineError::FixtureUnresolved);
    }
    let leg = fixture.leg;

    if !elimination && (home_pens.is_some() || away_pens.is_some()) {
        return Err(EngineError::InvalidConfig { field: "pens" });
    }
    if elimination {
        if leg.is_lone_decider() && home_goals == away_goals {
            check_shootout(home_pens, away_pens)?;
        }
        if leg.is_second_leg() {
            let (first_home, first_away) =
                first_leg_goals(phase.bracket.as_ref(), &phase.fixtures, fixture_id)?;
            // Sides are mirrored across legs: this fixture's home side took
            // the away role in the first leg.
            if home_goals + first_away == away_goals + first_home {
                check_shootout(home_pens, away_pens)?;
            }
        }
    }

    let fixture = phase
        .fixture_mut(fixture_id)
        .ok_or(EngineError::FixtureNotFound {
            fixture: fixture_id,
        })?;
    fixture.home_goals = Some(home_goals);
    fixture.away_goals = Some(away_goals);
    fixture.home_pens = home_pens;
    fixture.away_pens = away_pens;
    fixture.played = true;

    log::info!(
        "Recorded result {}-{} for fixture {} in phase {}",
        home_goals,
        away_goals,
        fixture_id,
        phase.name
    );

    if phase.state == PhaseState::Generated {
        phase.state = PhaseState::InProgress;
    }
    if phase.format == PhaseFormat::Knockout {
        if let Some(bracket) = phase.bracket.as_mut() {
            propagate_winners(bracket, &mut phase.fixtures)?;
        }
    }

    let complete = match phase.format {
        PhaseFormat::Knockout => {
            phase.all_played() && phase.bracket.as_ref().is_some_and(|b| b.is_resolved())
        }
        PhaseFormat::RoundRobin
            if matches!(phase.config.algorithm, PairingAlgorithm::Swiss) =>
        {
            phase.all_played() && phase.round_count() >= phase.config.rounds.unwrap_or(0)
        }
        _ => phase.all_played(),
    };
    if complete {
        phase.state = PhaseState::Complete;
        log::info!("Phase {} ({}) is complete", phase.name, phase.id);
    }
    Ok(())
}

/// A level elimination tie needs a decisive shootout recorded with it.
fn check_shootout(home_pens: Option<u32>, away_pens: Option<u32>) -> Result<(), EngineError> {
    match (home_pens, away_pens) {
        (Some(hp), Some(ap)) if hp == ap => Err(EngineError::PenaltyTieInvalid),
        (Some(_), Some(_)) => Ok(()),
        _ => Err(EngineError::PenaltyShootoutMissing),
    }
}

/// Goals of the first leg of the pairing that `second_leg` closes, as
/// (home, away) of that first leg. Legs must be recorded in order.
fn first_leg_goals(
    bracket: Option<&crate::models::Bracket>,
    fixtures: &[Fixture],
    second_leg: FixtureId,
) -> Result<(u32, u32), EngineError> {
    let sibling_id = bracket
        .and_then(|b| {
            b.pairings
                .iter()
                .find(|p| p.fixtures.contains(&second_leg))
        })
        .and_then(|p| p.fixtures.iter().find(|&&fid| fid != second_leg).copied())
        .ok_or(EngineError::FixtureNotFound {
            fixture: second_leg,
        })?;
    let sibling = fixtures
        .iter()
        .find(|f| f.id == sibling_id)
        .ok_or(EngineError::FixtureNotFound {
            fixture: sibling_id,
        })?;
    match (sibling.played, sibling.home_goals, sibling.away_goals) {
        (true, Some(hg), Some(ag)) => Ok((hg, ag)),
        _ => Err(EngineError::ResultsIncomplete),
    }
}

/// Set venue and kickoff time for a fixture. Pure bookkeeping: neither field
/// feeds any scheduling or standings decision.
pub fn schedule_fixture(
    tournament: &mut Tournament,
    fixture_id: FixtureId,
    venue: Option<String>,
    kickoff: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<(), EngineError> {
    let fixture = tournament
        .phases
        .iter_mut()
        .find_map(|p| p.fixture_mut(fixture_id))
        .ok_or(EngineError::FixtureNotFound {
            fixture: fixture_id,
        })?;
    fixture.venue = venue;
    fixture.kickoff = kickoff;
    Ok(())
}

/// Standings for a phase, or for one group of a GROUPS phase.
pub fn phase_standings(
    tournament: &Tournament,
    phase_id: PhaseId,
    group: Option<u32>,
) -> Result<Vec<StandingsRow>, EngineError> {
    let phase = tournament
        .phase(phase_id)
        .ok_or(EngineError::PhaseNotFound { phase: phase_id })?;
    match group {
        None => compute_standings(
            &phase.seeds,
            &phase.fixtures,
            &phase.zones,
            phase.config.scoring,
        ),
        Some(g) => {
            if phase.format != PhaseFormat::Groups {
                return Err(EngineError::InvalidState);
            }
            let group_size = phase
                .config
                .group_size
                .ok_or(EngineError::InvalidConfig { field: "group_size" })?;
            let groups = partition_groups(&phase.seeds, group_size);
            let members = groups
                .get(g as usize)
                .ok_or(EngineError::InvalidConfig { field: "group" })?;
            let fixtures: Vec<Fixture> = phase
                .fixtures
                .iter()
                .filter(|f| f.group == Some(g))
                .cloned()
                .collect();
            compute_standings(members, &fixtures, &phase.zones, phase.config.scoring)
        }
    }
}

/// Replace a phase's zone list. Full replace, all-or-nothing: bounds and
/// overlaps are validated before anything is written.
pub fn replace_zones(
    tournament: &mut Tournament,
    phase_id: PhaseId,
    zones: Vec<Zone>,
) -> Result<(), EngineError> {
    for zone in &zones {
        if zone.position_from == 0 || zone.position_from > zone.position_to {
            return Err(EngineError::ZoneInvalid {
                zone: zone.name.clone(),
            });
        }
    }
    for (i, a) in zones.iter().enumerate() {
        for b in &zones[i + 1..] {
            if a.overlaps(b) {
                return Err(EngineError::ZoneOverlap {
                    first: a.name.clone(),
                    second: b.name.clone(),
                });
            }
        }
    }
    let phase = tournament
        .phase_mut(phase_id)
        .ok_or(EngineError::PhaseNotFound { phase: phase_id })?;
    phase.zones = zones;
    Ok(())
}

/// Generate the next round of a swiss phase. Requires every fixture so far
/// to be played and the configured round count not yet reached.
pub fn next_swiss_round(
    tournament: &mut Tournament,
    phase_id: PhaseId,
) -> Result<(), EngineError> {
    let phase = tournament
        .phase_mut(phase_id)
        .ok_or(EngineError::PhaseNotFound { phase: phase_id })?;
    let is_swiss = phase.format == PhaseFormat::RoundRobin
        && matches!(phase.config.algorithm, PairingAlgorithm::Swiss);
    if !is_swiss || phase.state == PhaseState::Configured || phase.state == PhaseState::Complete {
        return Err(EngineError::InvalidState);
    }
    if !phase.all_played() {
        return Err(EngineError::ResultsIncomplete);
    }
    let rounds = phase
        .config
        .rounds
        .ok_or(EngineError::InvalidConfig { field: "rounds" })?;
    let current = phase.round_count();
    if current >= rounds {
        return Err(EngineError::InvalidState);
    }
    let next = swiss_next_round(
        phase.id,
        &phase.seeds,
        &phase.fixtures,
        phase.config.scoring,
        current,
    )?;
    log::info!(
        "Paired swiss round {} for phase {} ({} fixture(s))",
        current + 1,
        phase.name,
        next.len()
    );
    phase.fixtures.extend(next);
    Ok(())
}
