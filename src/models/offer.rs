// models/offer.rs
// Offer record

use std::fmt;

use serde::{Deserialize, Serialize};

/// An offer issued to a learner.
///
/// The batch pipeline treats this as an opaque value: it is cloned into the
/// saver's buffer and never mutated there. `id` is zero until the offer has
/// been persisted and assigned an identity by the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: u64,
    pub user_id: u64,
    pub team_id: u64,
    pub grade: u64,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Offer {
    /// Builds a not-yet-persisted offer.
    pub fn new(user_id: u64, team_id: u64, grade: u64) -> Self {
        Offer {
            id: 0,
            user_id,
            team_id,
            grade,
            is_deleted: false,
        }
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Id: {}, UserId: {}, Grade: {}, TeamId: {}",
            self.id, self.user_id, self.grade, self.team_id
        )
    }
}
