//! Round-robin scheduler: circle method, two-legged mirrors with a home-game
//! cap, grouped schedules, swiss pairing and seeded balanced-random order.

use crate::models::{
    EngineError, Fixture, Leg, PairingAlgorithm, ParticipantId, PhaseConfig, ScoringRules,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Generate the fixture list for a league-style phase.
///
/// Dispatches on `config.algorithm`. Swiss phases only get their first round
/// here; later rounds come from [`swiss_next_round`] once results exist.
/// One participant yields zero fixtures (success); zero participants fail.
pub fn schedule_round_robin(
    phase_id: Uuid,
    seeds: &[ParticipantId],
    config: &PhaseConfig,
    rng_seed: u64,
) -> Result<Vec<Fixture>, EngineError> {
    if seeds.is_empty() {
        return Err(EngineError::InsufficientParticipants {
            required: 2,
            actual: 0,
        });
    }
    if seeds.len() == 1 {
        return Ok(Vec::new());
    }
    match config.algorithm {
        PairingAlgorithm::CircleMethod => all_vs_all(phase_id, seeds, None, config),
        PairingAlgorithm::BalancedRandom => {
            let mut shuffled = seeds.to_vec();
            let mut rng = StdRng::seed_from_u64(rng_seed);
            shuffled.shuffle(&mut rng);
            all_vs_all(phase_id, &shuffled, None, config)
        }
        PairingAlgorithm::Swiss => {
            if config.rounds.is_none() {
                return Err(EngineError::InvalidConfig { field: "rounds" });
            }
            Ok(swiss_first_round(phase_id, seeds))
        }
    }
}

/// Generate fixtures for a phase split into balanced groups, each playing its
/// own round robin. Group membership comes from [`partition_groups`].
pub fn schedule_groups(
    phase_id: Uuid,
    seeds: &[ParticipantId],
    config: &PhaseConfig,
) -> Result<Vec<Fixture>, EngineError> {
    let group_size = config
        .group_size
        .ok_or(EngineError::InvalidConfig { field: "group_size" })?;
    if group_size < 2 {
        return Err(EngineError::InvalidConfig { field: "group_size" });
    }
    if seeds.len() < 2 {
        return Err(EngineError::InsufficientParticipants {
            required: 2,
            actual: seeds.len(),
        });
    }
    let mut fixtures = Vec::new();
    for (g, group) in partition_groups(seeds, group_size).iter().enumerate() {
        if group.len() < 2 {
            continue;
        }
        fixtures.extend(all_vs_all(phase_id, group, Some(g as u32), config)?);
    }
    Ok(fixtures)
}

/// Partition a seed list into balanced contiguous groups of at most
/// `group_size`, spreading the remainder over the leading groups.
pub fn partition_groups(seeds: &[ParticipantId], group_size: usize) -> Vec<Vec<ParticipantId>> {
    let count = (seeds.len() + group_size - 1) / group_size.max(1);
    if count == 0 {
        return Vec::new();
    }
    let base = seeds.len() / count;
    let extra = seeds.len() % count;
    let mut groups = Vec::with_capacity(count);
    let mut offset = 0;
    for g in 0..count {
        let size = if g < extra { base + 1 } else { base };
        groups.push(seeds[offset..offset + size].to_vec());
        offset += size;
    }
    groups
}

/// All-vs-all schedule on the given order: circle-method rounds, an optional
/// mirrored second cycle, and the home-game cap.
fn all_vs_all(
    phase_id: Uuid,
    order: &[ParticipantId],
    group: Option<u32>,
    config: &PhaseConfig,
) -> Result<Vec<Fixture>, EngineError> {
    let rounds = circle_rounds(order);
    let cap = config
        .rounds
        .map(|r| r as usize)
        .unwrap_or(rounds.len())
        .min(rounds.len());

    let first_leg = if config.double_leg { Leg::Leg1 } else { Leg::Group };
    let mut fixtures = Vec::new();
    for (r, pairs) in rounds.iter().take(cap).enumerate() {
        for &(home, away) in pairs {
            fixtures.push(Fixture::skeleton(
                phase_id,
                r as u32,
                group,
                first_leg,
                Some(home),
                Some(away),
            ));
        }
    }
    if config.double_leg {
        for (r, pairs) in rounds.iter().take(cap).enumerate() {
            for &(home, away) in pairs {
                fixtures.push(Fixture::skeleton(
                    phase_id,
                    (cap + r) as u32,
                    group,
                    Leg::Leg2,
                    Some(away),
                    Some(home),
                ));
            }
        }
    }
    if let Some(home_cap) = config.max_home_games {
        enforce_home_cap(&mut fixtures, order, home_cap)?;
    }
    Ok(fixtures)
}

/// Classic circle method: fix the first entry, rotate the rest. Odd counts
/// get a bye entry whose pairings are skipped. The fixed entry's venue
/// alternates by round so its home games spread out.
fn circle_rounds(order: &[ParticipantId]) -> Vec<Vec<(ParticipantId, ParticipantId)>> {
    let mut ring: Vec<Option<ParticipantId>> = order.iter().copied().map(Some).collect();
    if ring.len() % 2 == 1 {
        ring.push(None);
    }
    let n = ring.len();
    let mut rounds = Vec::with_capacity(n - 1);
    for r in 0..n - 1 {
        let mut pairs = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            if let (Some(x), Some(y)) = (ring[i], ring[n - 1 - i]) {
                if i == 0 && r % 2 == 1 {
                    pairs.push((y, x));
                } else {
                    pairs.push((x, y));
                }
            }
        }
        rounds.push(pairs);
        if let Some(last) = ring.pop() {
            ring.insert(1, last);
        }
    }
    rounds
}

/// Swap home/away on fixtures of over-cap participants until everyone is
/// within `cap` home games. A swap is legal only if it does not push the
/// opponent over the cap and does not duplicate an existing ordered pairing.
fn enforce_home_cap(
    fixtures: &mut [Fixture],
    order: &[ParticipantId],
    cap: u32,
) -> Result<(), EngineError> {
    let mut home_counts: HashMap<ParticipantId, u32> = HashMap::new();
    for f in fixtures.iter() {
        if let Some(h) = f.home {
            *home_counts.entry(h).or_default() += 1;
        }
    }
    // Every fixture needs a home side; if the pool cannot absorb them all the
    // cap is unsatisfiable no matter how we swap.
    if (order.len() as u32).saturating_mul(cap) < fixtures.len() as u32 {
        return Err(EngineError::HomeCapUnsatisfiable { cap });
    }

    loop {
        let over = order
            .iter()
            .copied()
            .find(|p| home_counts.get(p).copied().unwrap_or(0) > cap);
        let p = match over {
            Some(p) => p,
            None => return Ok(()),
        };
        let mut swapped = false;
        for i in 0..fixtures.len() {
            if fixtures[i].home != Some(p) {
                continue;
            }
            let q = match fixtures[i].away {
                Some(q) => q,
                None => continue,
            };
            if home_counts.get(&q).copied().unwrap_or(0) + 1 > cap {
                continue;
            }
            let duplicate = fixtures
                .iter()
                .any(|g| g.home == Some(q) && g.away == Some(p));
            if duplicate {
                continue;
            }
            fixtures[i].home = Some(q);
            fixtures[i].away = Some(p);
            if let Some(c) = home_counts.get_mut(&p) {
                *c -= 1;
            }
            *home_counts.entry(q).or_default() += 1;
            swapped = true;
            break;
        }
        if !swapped {
            return Err(EngineError::HomeCapUnsatisfiable { cap });
        }
    }
}

/// First swiss round: adjacent seeds pair off; an odd participant sits out.
fn swiss_first_round(phase_id: Uuid, seeds: &[ParticipantId]) -> Vec<Fixture> {
    seeds
        .chunks_exact(2)
        .map(|pair| {
            Fixture::skeleton(phase_id, 0, None, Leg::Group, Some(pair[0]), Some(pair[1]))
        })
        .collect()
}

/// Pair the next swiss round: participants closest in cumulative points who
/// have not met yet. Backtracks over the points-sorted pool; fails with
/// `NoValidPairing` when no repeat-free perfect pairing exists.
pub fn swiss_next_round(
    phase_id: Uuid,
    seeds: &[ParticipantId],
    fixtures: &[Fixture],
    scoring: ScoringRules,
    round: u32,
) -> Result<Vec<Fixture>, EngineError> {
    let mut points: HashMap<ParticipantId, i32> = seeds.iter().map(|&p| (p, 0)).collect();
    let mut played: HashSet<(ParticipantId, ParticipantId)> = HashSet::new();
    for f in fixtures.iter().filter(|f| f.played) {
        if let (Some(h), Some(a), Some(hg), Some(ag)) = (f.home, f.away, f.home_goals, f.away_goals)
        {
            played.insert(pair_key(h, a));
            let (hp, ap) = if hg > ag {
                (scoring.win, scoring.loss)
            } else if hg < ag {
                (scoring.loss, scoring.win)
            } else {
                (scoring.draw, scoring.draw)
            };
            if let Some(e) = points.get_mut(&h) {
                *e += hp;
            }
            if let Some(e) = points.get_mut(&a) {
                *e += ap;
            }
        }
    }

    let mut sorted = seeds.to_vec();
    sorted.sort_by(|a, b| {
        points
            .get(b)
            .cmp(&points.get(a))
            .then_with(|| a.cmp(b))
    });

    let pairs = if sorted.len() % 2 == 0 {
        pair_up(&sorted, &played)
    } else {
        // Try bye candidates from the bottom of the table upward.
        let mut found = None;
        for bye in (0..sorted.len()).rev() {
            let mut pool = sorted.clone();
            pool.remove(bye);
            if let Some(pairs) = pair_up(&pool, &played) {
                found = Some(pairs);
                break;
            }
        }
        found
    };
    let pairs = pairs.ok_or(EngineError::NoValidPairing)?;

    Ok(pairs
        .into_iter()
        .map(|(a, b)| {
            let (home, away) = if round % 2 == 0 { (a, b) } else { (b, a) };
            Fixture::skeleton(phase_id, round, None, Leg::Group, Some(home), Some(away))
        })
        .collect())
}

fn pair_key(a: ParticipantId, b: ParticipantId) -> (ParticipantId, ParticipantId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Perfect repeat-free pairing over a points-sorted pool. The head of the
/// pool tries the nearest candidates first, so accepted pairings are the
/// closest in cumulative points that the no-repeat constraint allows.
fn pair_up(
    pool: &[ParticipantId],
    played: &HashSet<(ParticipantId, ParticipantId)>,
) -> Option<Vec<(ParticipantId, ParticipantId)>> {
    let first = match pool.first() {
        Some(&f) => f,
        None => return Some(Vec::new()),
    };
    for i in 1..pool.len() {
        let candidate = pool[i];
        if played.contains(&pair_key(first, candidate)) {
            continue;
        }
        let rest: Vec<ParticipantId> = pool[1..]
            .iter()
            .copied()
            .filter(|&p| p != candidate)
            .collect();
        if let Some(mut pairs) = pair_up(&rest, played) {
            pairs.insert(0, (first, candidate));
            return Some(pairs);
        }
    }
    None
}
