//! Bracket scheduler: single-elimination construction, draw policies and
//! winner propagation up the tree.

use crate::models::{
    Bracket, BracketSlot, DrawPolicy, EngineError, Fixture, Leg, Pairing, ParticipantId,
    PhaseConfig, Stage, SUPPORTED_BRACKET_SIZES,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use uuid::Uuid;

/// Build the knockout tree and its fixture skeletons from an ordered seed
/// list. Every draw policy produces the same slot structure; only the
/// assignment of participants to entry slots differs.
pub fn schedule_knockout(
    phase_id: Uuid,
    seeds: &[ParticipantId],
    config: &PhaseConfig,
    rng_seed: u64,
) -> Result<(Bracket, Vec<Fixture>), EngineError> {
    let size = config.bracket_size.unwrap_or(seeds.len());
    if !SUPPORTED_BRACKET_SIZES.contains(&size) {
        return Err(EngineError::UnsupportedBracketSize { size });
    }
    if seeds.len() != size {
        return Err(EngineError::SeedCountMismatch {
            expected: size,
            actual: seeds.len(),
        });
    }
    let entry = match Stage::entry_for(size) {
        Some(entry) => entry,
        None => return Err(EngineError::UnsupportedBracketSize { size }),
    };

    let assigned = assign_entry_slots(seeds, config.draw_policy, rng_seed);

    let mut bracket = Bracket::default();
    let mut fixtures = Vec::new();
    let third_place = config.third_place && size >= 4;

    // Slots for every stage from entry to the final, empty beyond the entry.
    let mut stage = Some(entry);
    while let Some(st) = stage {
        for index in 0..st.slots() as u32 {
            let participant = if st == entry {
                Some(assigned[index as usize])
            } else {
                None
            };
            bracket.slots.push(BracketSlot {
                stage: st,
                index,
                participant,
                fixtures: Vec::new(),
            });
        }
        stage = st.next();
    }
    if third_place {
        for index in 0..2 {
            bracket.slots.push(BracketSlot {
                stage: Stage::ThirdPlace,
                index,
                participant: None,
                fixtures: Vec::new(),
            });
        }
    }

    // Fixtures and pairings, stage by stage. Sides beyond the entry stage
    // stay unresolved until propagation fills them.
    let mut round = 0u32;
    let mut stage = Some(entry);
    while let Some(st) = stage {
        for k in 0..(st.slots() / 2) as u32 {
            let (home, away) = if st == entry {
                (
                    Some(assigned[(2 * k) as usize]),
                    Some(assigned[(2 * k + 1) as usize]),
                )
            } else {
                (None, None)
            };
            let legs = stage_legs(st, config);
            let mut ids = Vec::with_capacity(legs.len());
            for (li, leg) in legs.iter().enumerate() {
                let (h, a) = if li % 2 == 0 { (home, away) } else { (away, home) };
                let fixture = Fixture::skeleton(phase_id, round, None, *leg, h, a);
                ids.push(fixture.id);
                fixtures.push(fixture);
            }
            if let Some(next) = st.next() {
                if let Some(slot) = bracket.slot_mut(next, k) {
                    slot.fixtures = ids.clone();
                }
            }
            bracket.pairings.push(Pairing {
                stage: st,
                index: k,
                fixtures: ids,
            });
        }
        stage = st.next();
        round += 1;
    }

    if third_place {
        let fixture = Fixture::skeleton(phase_id, round - 1, None, Leg::ThirdPlace, None, None);
        // Third-place slots are resolved by the semifinal legs feeding them.
        for k in 0..2u32 {
            let semi_legs = bracket
                .pairings
                .iter()
                .find(|p| p.stage == Stage::Semifinal && p.index == k)
                .map(|p| p.fixtures.clone())
                .unwrap_or_default();
            if let Some(slot) = bracket.slot_mut(Stage::ThirdPlace, k) {
                slot.fixtures = semi_legs;
            }
        }
        bracket.pairings.push(Pairing {
            stage: Stage::ThirdPlace,
            index: 0,
            fixtures: vec![fixture.id],
        });
        fixtures.push(fixture);
    }

    Ok((bracket, fixtures))
}

/// Assign participants to entry-stage slots per the draw policy.
fn assign_entry_slots(
    seeds: &[ParticipantId],
    policy: DrawPolicy,
    rng_seed: u64,
) -> Vec<ParticipantId> {
    let size = seeds.len();
    match policy {
        // Seed 1 faces seed n, seed 2 faces seed n-1, and so on.
        DrawPolicy::StandardRanking => {
            let mut slots = Vec::with_capacity(size);
            for j in 0..size / 2 {
                slots.push(seeds[j]);
                slots.push(seeds[size - 1 - j]);
            }
            slots
        }
        DrawPolicy::RandomDraw => {
            let mut slots = seeds.to_vec();
            slots.shuffle(&mut StdRng::seed_from_u64(rng_seed));
            slots
        }
        DrawPolicy::DirectedPots => {
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let mut pot_a = seeds[..size / 2].to_vec();
            let mut pot_b = seeds[size / 2..].to_vec();
            pot_a.shuffle(&mut rng);
            pot_b.shuffle(&mut rng);
            let mut slots = Vec::with_capacity(size);
            for (a, b) in pot_a.into_iter().zip(pot_b) {
                slots.push(a);
                slots.push(b);
            }
            slots
        }
    }
}

/// Leg layout of one pairing at the given stage. The final obeys
/// `single_final` independently of the rest of the bracket.
fn stage_legs(stage: Stage, config: &PhaseConfig) -> Vec<Leg> {
    match stage {
        Stage::Final => {
            if config.single_final || !config.double_leg {
                vec![Leg::FinalSingle]
            } else {
                vec![Leg::FinalLeg1, Leg::FinalLeg2]
            }
        }
        Stage::ThirdPlace => vec![Leg::ThirdPlace],
        _ => {
            if config.double_leg {
                vec![Leg::Leg1, Leg::Leg2]
            } else {
                vec![Leg::Single]
            }
        }
    }
}

/// Walk every pairing in stage order: fill in fixture sides once both slots
/// of a pairing are known, and advance winners (and semifinal losers) as
/// their legs complete. Idempotent over already-filled slots.
pub fn propagate_winners(
    bracket: &mut Bracket,
    fixtures: &mut [Fixture],
) -> Result<(), EngineError> {
    for pi in 0..bracket.pairings.len() {
        let pairing = bracket.pairings[pi].clone();
        let (a, b) = match pairing.stage {
            Stage::ThirdPlace => (
                bracket.slot(Stage::ThirdPlace, 0).and_then(|s| s.participant),
                bracket.slot(Stage::ThirdPlace, 1).and_then(|s| s.participant),
            ),
            st => (
                bracket.slot(st, 2 * pairing.index).and_then(|s| s.participant),
                bracket
                    .slot(st, 2 * pairing.index + 1)
                    .and_then(|s| s.participant),
            ),
        };
        let (a, b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };

        for (li, fid) in pairing.fixtures.iter().enumerate() {
            if let Some(f) = fixtures.iter_mut().find(|f| f.id == *fid) {
                if f.home.is_none() && f.away.is_none() {
                    let (h, w) = if li % 2 == 0 { (a, b) } else { (b, a) };
                    f.home = Some(h);
                    f.away = Some(w);
                }
            }
        }
        if pairing.stage == Stage::ThirdPlace {
            continue;
        }

        let legs: Vec<&Fixture> = pairing
            .fixtures
            .iter()
            .filter_map(|fid| fixtures.iter().find(|f| f.id == *fid))
            .collect();
        if legs.len() != pairing.fixtures.len() || legs.iter().any(|f| !f.played) {
            continue;
        }
        let (winner, loser) = decide_pairing(&legs, a, b)?;

        if let Some(next) = pairing.stage.next() {
            if let Some(slot) = bracket.slot_mut(next, pairing.index) {
                if slot.participant.is_none() {
                    slot.participant = Some(winner);
                }
            }
        }
        if pairing.stage == Stage::Semifinal {
            if let Some(slot) = bracket.slot_mut(Stage::ThirdPlace, pairing.index) {
                if slot.participant.is_none() {
                    slot.participant = Some(loser);
                }
            }
        }
    }
    Ok(())
}

/// Decide a completed pairing: aggregate goals, then the deciding leg's
/// penalty shootout. Returns (winner, loser).
fn decide_pairing(
    legs: &[&Fixture],
    a: ParticipantId,
    b: ParticipantId,
) -> Result<(ParticipantId, ParticipantId), EngineError> {
    let mut a_goals = 0u32;
    let mut b_goals = 0u32;
    for leg in legs {
        a_goals += leg.goals_for(a).unwrap_or(0);
        b_goals += leg.goals_for(b).unwrap_or(0);
    }
    if a_goals != b_goals {
        return if a_goals > b_goals {
            Ok((a, b))
        } else {
            Ok((b, a))
        };
    }
    let decider = match legs.last() {
        Some(f) => f,
        None => return Err(EngineError::PenaltyShootoutMissing),
    };
    match (decider.pens_for(a), decider.pens_for(b)) {
        (Some(ap), Some(bp)) if ap > bp => Ok((a, b)),
        (Some(ap), Some(bp)) if bp > ap => Ok((b, a)),
        (Some(_), Some(_)) => Err(EngineError::PenaltyTieInvalid),
        _ => Err(EngineError::PenaltyShootoutMissing),
    }
}
