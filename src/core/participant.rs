use serde::{Deserialize, Serialize};

pub type ParticipantId = String;

/// A person registered for the gift exchange
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Unique participant ID
    pub id: ParticipantId,

    /// Display name
    pub full_name: String,

    /// Login email, expected to be unique
    pub email: String,

    /// Team name. Teams are referenced by name, not ID
    pub team: String,

    /// Designation name
    pub designation: String,

    /// Whether this participant may use the admin operations
    #[serde(default)]
    pub is_admin: bool,

    #[serde(default)]
    pub gift_sent: bool,

    #[serde(default)]
    pub gift_received: bool,
}

/// Registration form contents for a new participant
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,

    /// Only checked for length, never stored
    #[serde(default)]
    pub password: String,

    pub team: String,
    pub designation: String,
}

/// One of the two gift flags a participant toggles for themselves
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GiftStatus {
    GiftSent,
    GiftReceived,
}

impl Participant {
    pub fn from_registration(id: ParticipantId, registration: Registration) -> Self {
        Participant {
            id,
            full_name: registration.full_name,
            email: registration.email,
            team: registration.team,
            designation: registration.designation,
            is_admin: false,
            gift_sent: false,
            gift_received: false,
        }
    }

    /// Return if any of the searchable fields contain `term`, ignoring case.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.full_name, &self.email, &self.team, &self.designation]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    pub fn set_gift_status(&mut self, status: GiftStatus, value: bool) {
        match status {
            GiftStatus::GiftSent => self.gift_sent = value,
            GiftStatus::GiftReceived => self.gift_received = value,
        }
    }
}
