//! Participant: a (player, club, season) enrollment record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in fixtures, seed lists and brackets).
pub type ParticipantId = Uuid;

/// Enrollment request: the player/club data behind a new participant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub player_id: String,
    pub player_name: String,
    pub club_id: String,
    pub club_name: String,
    /// Short club tag shown next to the player name.
    pub club_sigil: String,
    /// Opaque URL of the club crest, if any.
    #[serde(default)]
    pub club_image: Option<String>,
}

/// One enrollment: a player registered for a club in a season.
///
/// Immutable once created, apart from `active`: a substitution deactivates the
/// old participant and creates a new one with a fresh id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Opaque external player id.
    pub player_id: String,
    pub player_name: String,
    /// Opaque external club id.
    pub club_id: String,
    pub club_name: String,
    pub club_sigil: String,
    pub club_image: Option<String>,
    /// Cleared when this enrollment is replaced by a substitution.
    pub active: bool,
}

impl Participant {
    /// Create an active participant from an enrollment request.
    pub fn new(enrollment: Enrollment) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id: enrollment.player_id,
            player_name: enrollment.player_name,
            club_id: enrollment.club_id,
            club_name: enrollment.club_name,
            club_sigil: enrollment.club_sigil,
            club_image: enrollment.club_image,
            active: true,
        }
    }

    /// Mark this enrollment as replaced.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
