//! Participant registry: enrollment and player substitution.

use crate::models::{EngineError, Enrollment, Participant, ParticipantId, Tournament};

/// Enroll a player for a club in this tournament's season.
///
/// A player cannot hold two clubs simultaneously in the same season: if the
/// player already has an active participant, the enrollment is rejected.
pub fn enroll(
    tournament: &mut Tournament,
    enrollment: Enrollment,
) -> Result<ParticipantId, EngineError> {
    if tournament.has_active_player(&enrollment.player_id) {
        return Err(EngineError::DuplicateEnrollment {
            player_id: enrollment.player_id,
        });
    }
    let participant = Participant::new(enrollment);
    let id = participant.id;
    tournament.participants.push(participant);
    Ok(id)
}

/// Replace the player behind an enrollment with a new one.
///
/// Creates a new participant (same club), deactivates the old one and
/// re-points every forward-looking reference to the old id: unplayed
/// fixtures, phase seed lists and bracket slots. Played fixtures keep the
/// old id for historical integrity.
pub fn substitute(
    tournament: &mut Tournament,
    old_participant: ParticipantId,
    new_player_id: String,
    new_player_name: String,
) -> Result<ParticipantId, EngineError> {
    let old = tournament
        .participant(old_participant)
        .ok_or(EngineError::ParticipantNotFound {
            participant: old_participant,
        })?
        .clone();
    if !old.active {
        return Err(EngineError::InvalidState);
    }
    if old.player_id == new_player_id {
        return Err(EngineError::SameAsIncoming);
    }
    if tournament.has_active_player(&new_player_id) {
        return Err(EngineError::DuplicateEnrollment {
            player_id: new_player_id,
        });
    }

    let incoming = Participant::new(Enrollment {
        player_id: new_player_id,
        player_name: new_player_name,
        club_id: old.club_id.clone(),
        club_name: old.club_name.clone(),
        club_sigil: old.club_sigil.clone(),
        club_image: old.club_image.clone(),
    });
    let new_id = incoming.id;
    tournament.participants.push(incoming);
    if let Some(p) = tournament.participant_mut(old_participant) {
        p.deactivate();
    }

    for phase in &mut tournament.phases {
        for seed in &mut phase.seeds {
            if *seed == old_participant {
                *seed = new_id;
            }
        }
        for fixture in &mut phase.fixtures {
            if fixture.played {
                continue;
            }
            if fixture.home == Some(old_participant) {
                fixture.home = Some(new_id);
            }
            if fixture.away == Some(old_participant) {
                fixture.away = Some(new_id);
            }
        }
        if let Some(bracket) = &mut phase.bracket {
            for slot in &mut bracket.slots {
                if slot.participant == Some(old_participant) {
                    slot.participant = Some(new_id);
                }
            }
        }
    }

    Ok(new_id)
}
