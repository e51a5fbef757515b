//! Integration tests for the promotion/import engine: top-K promotion, the
//! three-tier split and fixed-count imports.

use football_tournament_web::{
    fixed_import, run_import, standard_promotion, tier_split, EngineError, ImportSpec,
    ParticipantId, Phase, PhaseConfig, PhaseFormat, PhaseState, StandingsRow, TierAssignment,
    Tournament,
};
use uuid::Uuid;

fn ids(n: usize) -> Vec<ParticipantId> {
    let mut ids: Vec<ParticipantId> = (0..n).map(|_| Uuid::new_v4()).collect();
    ids.sort();
    ids
}

fn standings(ids: &[ParticipantId]) -> Vec<StandingsRow> {
    ids.iter()
        .enumerate()
        .map(|(i, &p)| {
            let mut row = StandingsRow::new(p);
            row.position = (i + 1) as u32;
            row
        })
        .collect()
}

#[test]
fn standard_promotion_takes_top_k_in_position_order() {
    let ids = ids(8);
    let table = standings(&ids);
    let seeds = standard_promotion(&table, 4).unwrap();
    assert_eq!(seeds, ids[..4].to_vec());
}

#[test]
fn standard_promotion_needs_enough_rows() {
    let table = standings(&ids(3));
    let err = standard_promotion(&table, 4).unwrap_err();
    assert!(matches!(
        err,
        EngineError::SelectionCountMismatch {
            expected: 4,
            actual: 3
        }
    ));
}

#[test]
fn tier_split_validates_capacities() {
    let pool = ids(20);
    let assignment = TierAssignment {
        elite: pool[..8].to_vec(),
        intermediate: pool[8..16].to_vec(),
        rest: pool[16..].to_vec(),
    };
    let pools = tier_split(&pool, &assignment, 8, 8).unwrap();
    assert_eq!(pools.elite.len(), 8);
    assert_eq!(pools.intermediate.len(), 8);
    assert_eq!(pools.rest.len(), 4);

    let short = TierAssignment {
        elite: pool[..7].to_vec(),
        intermediate: pool[8..16].to_vec(),
        rest: pool[16..].to_vec(),
    };
    let err = tier_split(&pool, &short, 8, 8).unwrap_err();
    assert!(matches!(
        err,
        EngineError::TierSizeMismatch { tier: "elite", .. }
    ));
}

#[test]
fn tier_split_rejects_double_assignment_and_strangers() {
    let pool = ids(4);
    let doubled = TierAssignment {
        elite: vec![pool[0]],
        intermediate: vec![pool[0]],
        rest: vec![pool[1], pool[2]],
    };
    let err = tier_split(&pool, &doubled, 1, 1).unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfig { .. }));

    let stranger = Uuid::new_v4();
    let unknown = TierAssignment {
        elite: vec![stranger],
        intermediate: vec![pool[1]],
        rest: vec![pool[2], pool[3]],
    };
    let err = tier_split(&pool, &unknown, 1, 1).unwrap_err();
    assert!(matches!(err, EngineError::ParticipantNotFound { .. }));
}

#[test]
fn fixed_import_follows_source_position_order() {
    let ids = ids(8);
    let table = standings(&ids);
    // Submit in scrambled order; the seed list comes back by position.
    let selection = vec![ids[5], ids[1], ids[7], ids[3]];
    let seeds = fixed_import(&table, &selection, 4).unwrap();
    assert_eq!(seeds, vec![ids[1], ids[3], ids[5], ids[7]]);

    let err = fixed_import(&table, &selection[..3], 4).unwrap_err();
    assert!(matches!(err, EngineError::SelectionCountMismatch { .. }));
}

fn tournament_with_two_phases() -> (Tournament, Uuid, Uuid) {
    let mut t = Tournament::new("Copa", "season-1");
    for i in 0..4 {
        football_tournament_web::enroll(
            &mut t,
            football_tournament_web::Enrollment {
                player_id: format!("player-{i}"),
                player_name: format!("Player {i}"),
                club_id: format!("club-{i}"),
                club_name: format!("Club {i}"),
                club_sigil: format!("C{i}"),
                club_image: None,
            },
        )
        .unwrap();
    }
    let mut source = Phase::new(
        t.id,
        "Liga",
        0,
        PhaseFormat::RoundRobin,
        PhaseConfig::default(),
    );
    source.seeds = t.active_participant_ids();
    let source_id = source.id;
    let target = Phase::new(
        t.id,
        "Mata-mata",
        1,
        PhaseFormat::Knockout,
        PhaseConfig {
            bracket_size: Some(2),
            ..PhaseConfig::default()
        },
    );
    let target_id = target.id;
    t.phases.push(source);
    t.phases.push(target);
    (t, source_id, target_id)
}

#[test]
fn run_import_is_idempotent_while_target_is_unscheduled() {
    let (mut t, source_id, target_id) = tournament_with_two_phases();
    let spec = ImportSpec::Standard {
        target_phase: target_id,
        count: 2,
    };
    run_import(&mut t, source_id, spec.clone()).unwrap();
    let first = t.phase(target_id).unwrap().seeds.clone();
    run_import(&mut t, source_id, spec).unwrap();
    assert_eq!(t.phase(target_id).unwrap().seeds, first);
    assert_eq!(t.phase(target_id).unwrap().state, PhaseState::Configured);
}

#[test]
fn run_import_refuses_a_generated_target() {
    let (mut t, source_id, target_id) = tournament_with_two_phases();
    run_import(
        &mut t,
        source_id,
        ImportSpec::Standard {
            target_phase: target_id,
            count: 2,
        },
    )
    .unwrap();
    football_tournament_web::generate_phase(&mut t, target_id).unwrap();

    let err = run_import(
        &mut t,
        source_id,
        ImportSpec::Standard {
            target_phase: target_id,
            count: 2,
        },
    )
    .unwrap_err();
    assert_eq!(err, EngineError::AlreadyGenerated);
}
