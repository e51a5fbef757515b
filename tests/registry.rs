//! Integration tests for the participant registry: enrollment and substitution.

use football_tournament_web::{
    enroll, generate_phase, record_result, substitute, EngineError, Enrollment, Phase,
    PhaseConfig, PhaseFormat, Tournament,
};

fn enrollment(i: usize) -> Enrollment {
    Enrollment {
        player_id: format!("player-{i}"),
        player_name: format!("Player {i}"),
        club_id: format!("club-{i}"),
        club_name: format!("Club {i}"),
        club_sigil: format!("C{i}"),
        club_image: None,
    }
}

fn tournament_with(n: usize) -> Tournament {
    let mut t = Tournament::new("Copa", "season-1");
    for i in 0..n {
        enroll(&mut t, enrollment(i)).unwrap();
    }
    t
}

#[test]
fn enroll_rejects_duplicate_player_in_season() {
    let mut t = tournament_with(1);
    let err = enroll(&mut t, enrollment(0)).unwrap_err();
    assert!(matches!(err, EngineError::DuplicateEnrollment { .. }));
}

#[test]
fn substitute_rejects_same_player() {
    let mut t = tournament_with(1);
    let old = t.participants[0].id;
    let err = substitute(&mut t, old, "player-0".into(), "Player 0".into()).unwrap_err();
    assert_eq!(err, EngineError::SameAsIncoming);
}

#[test]
fn substitute_rejects_player_already_enrolled() {
    let mut t = tournament_with(2);
    let old = t.participants[0].id;
    let err = substitute(&mut t, old, "player-1".into(), "Player 1".into()).unwrap_err();
    assert!(matches!(err, EngineError::DuplicateEnrollment { .. }));
}

#[test]
fn substitution_keeps_history_and_repoints_future_fixtures() {
    let mut t = tournament_with(4);
    let old = t.participants[0].id;

    let mut phase = Phase::new(
        t.id,
        "Liga",
        0,
        PhaseFormat::RoundRobin,
        PhaseConfig::default(),
    );
    phase.seeds = t.active_participant_ids();
    let phase_id = phase.id;
    t.phases.push(phase);
    generate_phase(&mut t, phase_id).unwrap();

    // Play exactly one fixture involving the outgoing participant.
    let played_id = {
        let phase = t.phase(phase_id).unwrap();
        phase
            .fixtures
            .iter()
            .find(|f| f.involves(old))
            .map(|f| f.id)
            .unwrap()
    };
    record_result(&mut t, played_id, 2, 0, None, None).unwrap();

    let incoming = substitute(&mut t, old, "player-99".into(), "Player 99".into()).unwrap();

    assert!(!t.participant(old).unwrap().active);
    let phase = t.phase(phase_id).unwrap();
    for f in &phase.fixtures {
        if f.id == played_id {
            assert!(f.involves(old));
            assert!(!f.involves(incoming));
        } else {
            assert!(!f.involves(old));
        }
    }
    assert!(phase.seeds.contains(&incoming));
    assert!(!phase.seeds.contains(&old));
}

#[test]
fn substitute_unknown_participant_fails() {
    let mut t = tournament_with(1);
    let bogus = uuid::Uuid::new_v4();
    let err = substitute(&mut t, bogus, "player-9".into(), "Player 9".into()).unwrap_err();
    assert!(matches!(err, EngineError::ParticipantNotFound { .. }));
}
