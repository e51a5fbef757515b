//! Integration tests for the bracket scheduler: construction, seeding,
//! aggregate/penalty winner propagation and the third-place fixture.

use football_tournament_web::{
    propagate_winners, schedule_knockout, EngineError, Fixture, FixtureId, Leg, ParticipantId,
    PhaseConfig, Stage,
};
use uuid::Uuid;

fn seeds(n: usize) -> Vec<ParticipantId> {
    let mut ids: Vec<ParticipantId> = (0..n).map(|_| Uuid::new_v4()).collect();
    ids.sort();
    ids
}

fn knockout_config(size: usize) -> PhaseConfig {
    PhaseConfig {
        bracket_size: Some(size),
        ..PhaseConfig::default()
    }
}

fn play(fixtures: &mut [Fixture], id: FixtureId, hg: u32, ag: u32, pens: Option<(u32, u32)>) {
    let f = fixtures.iter_mut().find(|f| f.id == id).unwrap();
    f.home_goals = Some(hg);
    f.away_goals = Some(ag);
    if let Some((hp, ap)) = pens {
        f.home_pens = Some(hp);
        f.away_pens = Some(ap);
    }
    f.played = true;
}

#[test]
fn size_eight_two_legged_with_single_final_has_thirteen_fixtures() {
    let ids = seeds(8);
    let config = PhaseConfig {
        double_leg: true,
        single_final: true,
        ..knockout_config(8)
    };
    let (_, fixtures) = schedule_knockout(Uuid::new_v4(), &ids, &config, 0).unwrap();
    // QF: 4 pairings x 2 legs, SF: 2 x 2, Final: 1.
    assert_eq!(fixtures.len(), 13);
    assert_eq!(fixtures.iter().filter(|f| f.leg == Leg::Leg1).count(), 6);
    assert_eq!(fixtures.iter().filter(|f| f.leg == Leg::Leg2).count(), 6);
    assert_eq!(
        fixtures.iter().filter(|f| f.leg == Leg::FinalSingle).count(),
        1
    );
}

#[test]
fn single_leg_bracket_has_size_minus_one_fixtures() {
    let ids = seeds(16);
    let (_, fixtures) =
        schedule_knockout(Uuid::new_v4(), &ids, &knockout_config(16), 0).unwrap();
    assert_eq!(fixtures.len(), 15);
}

#[test]
fn standard_ranking_pairs_first_against_last() {
    let ids = seeds(8);
    let (bracket, fixtures) =
        schedule_knockout(Uuid::new_v4(), &ids, &knockout_config(8), 0).unwrap();

    assert_eq!(
        bracket.slot(Stage::Quarterfinal, 0).unwrap().participant,
        Some(ids[0])
    );
    assert_eq!(
        bracket.slot(Stage::Quarterfinal, 1).unwrap().participant,
        Some(ids[7])
    );
    let opener = fixtures.iter().find(|f| f.home == Some(ids[0])).unwrap();
    assert_eq!(opener.away, Some(ids[7]));
}

#[test]
fn draw_policies_share_the_slot_structure() {
    let ids = seeds(8);
    let standard =
        schedule_knockout(Uuid::new_v4(), &ids, &knockout_config(8), 7).unwrap();
    let random = schedule_knockout(
        Uuid::new_v4(),
        &ids,
        &PhaseConfig {
            draw_policy: football_tournament_web::DrawPolicy::RandomDraw,
            ..knockout_config(8)
        },
        7,
    )
    .unwrap();

    let shape = |b: &football_tournament_web::Bracket| -> Vec<(Stage, u32, usize)> {
        b.slots
            .iter()
            .map(|s| (s.stage, s.index, s.fixtures.len()))
            .collect()
    };
    assert_eq!(shape(&standard.0), shape(&random.0));
    // Same participants end up in the entry stage, just in different slots.
    let entrants = |b: &football_tournament_web::Bracket| -> Vec<ParticipantId> {
        let mut ids: Vec<_> = b
            .slots
            .iter()
            .filter(|s| s.stage == Stage::Quarterfinal)
            .filter_map(|s| s.participant)
            .collect();
        ids.sort();
        ids
    };
    assert_eq!(entrants(&standard.0), entrants(&random.0));
}

#[test]
fn unsupported_sizes_and_seed_mismatches_are_rejected() {
    let err = schedule_knockout(
        Uuid::new_v4(),
        &seeds(6),
        &PhaseConfig::default(),
        0,
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedBracketSize { size: 6 }));

    let err =
        schedule_knockout(Uuid::new_v4(), &seeds(6), &knockout_config(8), 0).unwrap_err();
    assert!(matches!(
        err,
        EngineError::SeedCountMismatch {
            expected: 8,
            actual: 6
        }
    ));
}

#[test]
fn winners_propagate_and_penalties_settle_level_ties() {
    let ids = seeds(4);
    let (mut bracket, mut fixtures) =
        schedule_knockout(Uuid::new_v4(), &ids, &knockout_config(4), 0).unwrap();

    // Entry pairings: ids[0] v ids[3], ids[1] v ids[2].
    let semi_ids: Vec<FixtureId> = fixtures
        .iter()
        .filter(|f| f.leg == Leg::Single)
        .map(|f| f.id)
        .collect();
    assert_eq!(semi_ids.len(), 2);
    play(&mut fixtures, semi_ids[0], 2, 2, Some((5, 4)));
    play(&mut fixtures, semi_ids[1], 0, 1, None);
    propagate_winners(&mut bracket, &mut fixtures).unwrap();

    assert_eq!(
        bracket.slot(Stage::Final, 0).unwrap().participant,
        Some(ids[0])
    );
    assert_eq!(
        bracket.slot(Stage::Final, 1).unwrap().participant,
        Some(ids[2])
    );
    // Exactly two participants reach the final, and its sides are now set.
    let final_fixture = fixtures
        .iter()
        .find(|f| f.leg == Leg::FinalSingle)
        .unwrap();
    assert_eq!(final_fixture.home, Some(ids[0]));
    assert_eq!(final_fixture.away, Some(ids[2]));

    let final_id = final_fixture.id;
    play(&mut fixtures, final_id, 3, 1, None);
    propagate_winners(&mut bracket, &mut fixtures).unwrap();
    assert!(bracket.is_resolved());
}

#[test]
fn level_penalty_shootout_is_invalid_input() {
    let ids = seeds(2);
    let (mut bracket, mut fixtures) =
        schedule_knockout(Uuid::new_v4(), &ids, &knockout_config(2), 0).unwrap();
    let id = fixtures[0].id;
    play(&mut fixtures, id, 1, 1, Some((4, 4)));
    let err = propagate_winners(&mut bracket, &mut fixtures).unwrap_err();
    assert_eq!(err, EngineError::PenaltyTieInvalid);
}

#[test]
fn semifinal_losers_meet_in_the_third_place_fixture() {
    let ids = seeds(4);
    let config = PhaseConfig {
        third_place: true,
        ..knockout_config(4)
    };
    let (mut bracket, mut fixtures) = schedule_knockout(Uuid::new_v4(), &ids, &config, 0).unwrap();
    assert_eq!(fixtures.len(), 4);

    let semi_ids: Vec<FixtureId> = fixtures
        .iter()
        .filter(|f| f.leg == Leg::Single)
        .map(|f| f.id)
        .collect();
    // ids[0] beats ids[3]; ids[2] beats ids[1].
    play(&mut fixtures, semi_ids[0], 1, 0, None);
    play(&mut fixtures, semi_ids[1], 0, 2, None);
    propagate_winners(&mut bracket, &mut fixtures).unwrap();

    let third = fixtures
        .iter()
        .find(|f| f.leg == Leg::ThirdPlace)
        .unwrap();
    assert_eq!(third.home, Some(ids[3]));
    assert_eq!(third.away, Some(ids[1]));
}

#[test]
fn two_legged_tie_is_decided_on_aggregate() {
    let ids = seeds(2);
    let config = PhaseConfig {
        double_leg: true,
        ..knockout_config(2)
    };
    let (mut bracket, mut fixtures) = schedule_knockout(Uuid::new_v4(), &ids, &config, 0).unwrap();
    assert_eq!(fixtures.len(), 2);

    let leg1 = fixtures
        .iter()
        .find(|f| f.leg == Leg::FinalLeg1)
        .map(|f| f.id)
        .unwrap();
    let leg2 = fixtures
        .iter()
        .find(|f| f.leg == Leg::FinalLeg2)
        .map(|f| f.id)
        .unwrap();
    // ids[0] wins 2-0 at home, loses 0-1 away: 2-1 on aggregate.
    play(&mut fixtures, leg1, 2, 0, None);
    play(&mut fixtures, leg2, 1, 0, None);
    propagate_winners(&mut bracket, &mut fixtures).unwrap();
    assert!(bracket.is_resolved());
}
