//! Integration tests for the standings engine: recomputation, tie-breaks and
//! zone annotation.

use football_tournament_web::{
    compute_standings, EngineError, Fixture, Leg, ParticipantId, ScoringRules, Zone,
};
use uuid::Uuid;

fn participants(n: usize) -> Vec<ParticipantId> {
    let mut ids: Vec<ParticipantId> = (0..n).map(|_| Uuid::new_v4()).collect();
    ids.sort();
    ids
}

fn played(home: ParticipantId, away: ParticipantId, hg: u32, ag: u32) -> Fixture {
    let mut f = Fixture::skeleton(Uuid::new_v4(), 0, None, Leg::Group, Some(home), Some(away));
    f.home_goals = Some(hg);
    f.away_goals = Some(ag);
    f.played = true;
    f
}

#[test]
fn recomputes_from_full_match_set() {
    let ids = participants(4);
    let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);
    let fixtures = vec![played(a, b, 2, 0), played(b, c, 1, 1)];

    let rows = compute_standings(&ids, &fixtures, &[], ScoringRules::default()).unwrap();

    let row = |p: ParticipantId| rows.iter().find(|r| r.participant == p).unwrap();
    assert_eq!((row(a).points, row(a).played), (3, 1));
    assert_eq!((row(b).points, row(b).played), (1, 2));
    assert_eq!((row(c).points, row(c).played), (1, 1));
    assert_eq!((row(d).points, row(d).played), (0, 0));

    // A tops the table; C (gd 0) ranks above B (gd -2) on goal difference.
    assert_eq!(rows[0].participant, a);
    assert_eq!(rows[1].participant, c);
    assert_eq!(rows[2].participant, b);
    assert_eq!(rows[3].participant, d);
}

#[test]
fn recomputation_is_deterministic() {
    let ids = participants(6);
    let fixtures = vec![
        played(ids[0], ids[1], 3, 1),
        played(ids[2], ids[3], 0, 0),
        played(ids[4], ids[5], 2, 2),
        played(ids[1], ids[2], 1, 0),
    ];
    let first = compute_standings(&ids, &fixtures, &[], ScoringRules::default()).unwrap();
    let second = compute_standings(&ids, &fixtures, &[], ScoringRules::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn positions_are_distinct_even_when_fully_tied() {
    let ids = participants(4);
    let rows = compute_standings(&ids, &[], &[], ScoringRules::default()).unwrap();
    let mut positions: Vec<u32> = rows.iter().map(|r| r.position).collect();
    positions.sort();
    assert_eq!(positions, vec![1, 2, 3, 4]);
}

#[test]
fn head_to_head_orders_a_two_way_tie() {
    let ids = participants(4);
    let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);
    // A and B end level on points, goal difference and goals for; B won the
    // head-to-head meeting, so B ranks ahead despite the id fallback
    // favouring A.
    let fixtures = vec![
        played(a, b, 1, 2),
        played(b, d, 1, 2),
        played(a, c, 2, 1),
    ];
    let rows = compute_standings(&ids, &fixtures, &[], ScoringRules::default()).unwrap();

    let pos = |p: ParticipantId| rows.iter().find(|r| r.participant == p).unwrap().position;
    assert_eq!(pos(d), 1);
    assert_eq!(pos(b), 2);
    assert_eq!(pos(a), 3);
    assert_eq!(pos(c), 4);
}

#[test]
fn orphan_fixture_reference_is_rejected() {
    let ids = participants(2);
    let stranger = Uuid::new_v4();
    let fixtures = vec![played(ids[0], stranger, 1, 0)];
    let err = compute_standings(&ids, &fixtures, &[], ScoringRules::default()).unwrap_err();
    assert!(matches!(err, EngineError::OrphanMatchReference { .. }));
}

#[test]
fn zones_annotate_by_position_and_default_to_none() {
    let ids = participants(20);
    let zones = vec![Zone {
        name: "Relegation".into(),
        position_from: 18,
        position_to: 20,
        color_hex: "#ef4444".into(),
    }];
    let rows = compute_standings(&ids, &[], &zones, ScoringRules::default()).unwrap();

    let at = |pos: u32| rows.iter().find(|r| r.position == pos).unwrap();
    assert_eq!(at(19).zone_color.as_deref(), Some("#ef4444"));
    assert_eq!(at(19).zone_name.as_deref(), Some("Relegation"));
    assert_eq!(at(17).zone_color, None);
    assert_eq!(at(17).zone_name, None);
}
