//! Standings engine: full recomputation of ranked tables from played fixtures.

use crate::models::{EngineError, Fixture, ParticipantId, ScoringRules, StandingsRow, Zone};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Compute the full standings table for a scope (a phase, or one group of a
/// grouped phase).
///
/// 1. One zeroed row per enrolled participant.
/// 2. Fold every played fixture into both sides' counters.
/// 3. Sort: points desc, goal difference desc, goals for desc, head-to-head
///    (only when exactly two rows stay tied on the previous keys and they
///    met), wins desc, participant id.
/// 4. Assign distinct 1-based positions and annotate zones.
///
/// Always recomputed from scratch; incremental patching is how stale
/// aggregates happen.
pub fn compute_standings(
    participants: &[ParticipantId],
    fixtures: &[Fixture],
    zones: &[Zone],
    scoring: ScoringRules,
) -> Result<Vec<StandingsRow>, EngineError> {
    let mut index: HashMap<ParticipantId, usize> = HashMap::new();
    let mut rows: Vec<StandingsRow> = Vec::with_capacity(participants.len());
    for &p in participants {
        index.entry(p).or_insert_with(|| {
            rows.push(StandingsRow::new(p));
            rows.len() - 1
        });
    }

    for fixture in fixtures.iter().filter(|f| f.played) {
        let (home, away) = match (fixture.home, fixture.away) {
            (Some(h), Some(a)) => (h, a),
            _ => return Err(EngineError::FixtureUnresolved),
        };
        let (hg, ag) = match (fixture.home_goals, fixture.away_goals) {
            (Some(hg), Some(ag)) => (hg, ag),
            _ => return Err(EngineError::ResultsIncomplete),
        };
        let hi = *index
            .get(&home)
            .ok_or(EngineError::OrphanMatchReference { participant: home })?;
        let ai = *index
            .get(&away)
            .ok_or(EngineError::OrphanMatchReference { participant: away })?;

        apply_result(&mut rows[hi], hg, ag, scoring);
        apply_result(&mut rows[ai], ag, hg, scoring);
    }

    for row in &mut rows {
        row.goal_difference = row.goals_for as i32 - row.goals_against as i32;
    }

    rows.sort_by(compare_rows);
    order_head_to_head_pairs(&mut rows, fixtures);

    for (i, row) in rows.iter_mut().enumerate() {
        row.position = (i + 1) as u32;
        if let Some(zone) = zones.iter().find(|z| z.contains(row.position)) {
            row.zone_name = Some(zone.name.clone());
            row.zone_color = Some(zone.color_hex.clone());
        }
    }

    Ok(rows)
}

fn apply_result(row: &mut StandingsRow, scored: u32, conceded: u32, scoring: ScoringRules) {
    row.played += 1;
    row.goals_for += scored;
    row.goals_against += conceded;
    match scored.cmp(&conceded) {
        Ordering::Greater => {
            row.wins += 1;
            row.points += scoring.win;
        }
        Ordering::Equal => {
            row.draws += 1;
            row.points += scoring.draw;
        }
        Ordering::Less => {
            row.losses += 1;
            row.points += scoring.loss;
        }
    }
}

/// Full comparator chain minus head-to-head: points, goal difference, goals
/// for, wins, then participant id as the deterministic fallback.
fn compare_rows(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.goal_difference.cmp(&a.goal_difference))
        .then(b.goals_for.cmp(&a.goals_for))
        .then(b.wins.cmp(&a.wins))
        .then(a.participant.cmp(&b.participant))
}

/// Apply the head-to-head key: where exactly two adjacent rows are tied on
/// points, goal difference and goals for, and they played each other, the
/// head-to-head winner goes first. Larger tie groups keep the wins/id order.
fn order_head_to_head_pairs(rows: &mut [StandingsRow], fixtures: &[Fixture]) {
    let mut i = 0;
    while i < rows.len() {
        let mut j = i + 1;
        while j < rows.len() && tied_on_primary_keys(&rows[i], &rows[j]) {
            j += 1;
        }
        if j - i == 2 {
            let (a, b) = (rows[i].participant, rows[i + 1].participant);
            if head_to_head(a, b, fixtures) == Ordering::Less {
                rows.swap(i, i + 1);
            }
        }
        i = j;
    }
}

fn tied_on_primary_keys(a: &StandingsRow, b: &StandingsRow) -> bool {
    a.points == b.points
        && a.goal_difference == b.goal_difference
        && a.goals_for == b.goals_for
}

/// Head-to-head comparison across every played meeting of the two in scope.
/// `Greater` means `a` finished ahead; `Equal` when they never met or their
/// mutual aggregate is level.
pub fn head_to_head(a: ParticipantId, b: ParticipantId, fixtures: &[Fixture]) -> Ordering {
    let mut a_goals = 0u32;
    let mut b_goals = 0u32;
    let mut met = false;
    for f in fixtures.iter().filter(|f| f.played) {
        if f.involves(a) && f.involves(b) {
            met = true;
            a_goals += f.goals_for(a).unwrap_or(0);
            b_goals += f.goals_for(b).unwrap_or(0);
        }
    }
    if !met {
        return Ordering::Equal;
    }
    a_goals.cmp(&b_goals)
}
