use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::{
    master_data::{Designation, Label, Team},
    pairing::Pairing,
    participant::{GiftStatus, Participant, ParticipantId, Registration},
};

/// The current pairing list together with the flag that gates recipient lookups.
///
/// Both fields only change together through [`RosterStore::replace_pairings`].
#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingState {
    pub pairings: Vec<Pairing>,
    pub complete: bool,
}

/// Time-derived ID generator. IDs are Unix milliseconds, bumped so that they
/// strictly increase even when several are issued within one millisecond.
#[derive(Debug, Default)]
pub struct IdSource {
    last: u64,
}

impl IdSource {
    pub fn next_id(&mut self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        self.last = now.max(self.last + 1);
        self.last.to_string()
    }
}

/// In-memory owner of every participant, team, designation and pairing.
#[derive(Debug, Default)]
pub struct RosterStore {
    participants: Vec<Participant>,
    teams: Vec<Team>,
    designations: Vec<Designation>,
    pairing: PairingState,
    ids: IdSource,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store populated with the demo roster.
    pub fn seeded() -> Self {
        let teams = labels(&["Engineering", "Design", "Product", "Marketing", "Sales"]);
        let designations = labels(&[
            "Junior Developer",
            "Senior Developer",
            "Team Lead",
            "Manager",
            "Director",
        ]);

        let participant = |id: &str, name: &str, email: &str, team: &str, designation: &str| Participant {
            id: id.to_owned(),
            full_name: name.to_owned(),
            email: email.to_owned(),
            team: team.to_owned(),
            designation: designation.to_owned(),
            ..Default::default()
        };

        let participants = vec![
            participant("1", "John Doe", "john@company.com", "Engineering", "Senior Developer"),
            participant("2", "Jane Smith", "jane@company.com", "Design", "Team Lead"),
            Participant {
                is_admin: true,
                ..participant("3", "Admin User", "admin@company.com", "Engineering", "Manager")
            },
            participant("4", "Bob Johnson", "bob@company.com", "Product", "Junior Developer"),
            participant("5", "Alice Brown", "alice@company.com", "Marketing", "Manager"),
        ];

        let pairings = [("1", "2"), ("2", "4"), ("3", "5"), ("4", "1"), ("5", "3")]
            .iter()
            .map(|(giver, receiver)| Pairing {
                giver: giver.to_string(),
                receiver: receiver.to_string(),
            })
            .collect();

        RosterStore {
            participants,
            teams,
            designations,
            pairing: PairingState {
                pairings,
                complete: false,
            },
            ids: IdSource::default(),
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant_ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Exact email lookup, as used by login.
    pub fn find_by_email(&self, email: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.email == email)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn designations(&self) -> &[Designation] {
        &self.designations
    }

    pub fn pairing_state(&self) -> &PairingState {
        &self.pairing
    }

    /// Append a participant under a fresh ID. Email uniqueness is not checked here.
    pub fn add_participant(&mut self, registration: Registration) -> Participant {
        let participant = Participant::from_registration(self.ids.next_id(), registration);
        log::info!("Registered participant {} ({})", participant.full_name, participant.id);
        self.participants.push(participant.clone());
        participant
    }

    /// Replace the participant with the same ID wholesale. Returns false and
    /// changes nothing if the ID is unknown.
    pub fn update_participant(&mut self, participant: Participant) -> bool {
        match self.participants.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => {
                log::info!("Updating participant {} ({})", participant.full_name, participant.id);
                *existing = participant;
                true
            }
            None => false,
        }
    }

    /// Remove a participant. Pairings that reference them are left in place.
    pub fn delete_participant(&mut self, id: &str) -> Option<Participant> {
        let pos = self.participants.iter().position(|p| p.id == id)?;
        let removed = self.participants.remove(pos);
        log::info!("Deleted participant {} ({})", removed.full_name, removed.id);
        Some(removed)
    }

    pub fn set_gift_status(&mut self, id: &str, status: GiftStatus, value: bool) -> bool {
        match self.participants.iter_mut().find(|p| p.id == id) {
            Some(participant) => {
                participant.set_gift_status(status, value);
                true
            }
            None => false,
        }
    }

    pub fn add_team(&mut self, name: &str) -> Team {
        add_label(&mut self.teams, &mut self.ids, name)
    }

    /// Remove a team. Participants keep the team name they reference.
    pub fn delete_team(&mut self, id: &str) -> Option<Team> {
        delete_label(&mut self.teams, id)
    }

    pub fn add_designation(&mut self, name: &str) -> Designation {
        add_label(&mut self.designations, &mut self.ids, name)
    }

    /// Remove a designation. Participants keep the designation name they reference.
    pub fn delete_designation(&mut self, id: &str) -> Option<Designation> {
        delete_label(&mut self.designations, id)
    }

    /// Swap in a freshly drawn pairing list and mark pairing as complete.
    pub fn replace_pairings(&mut self, pairings: Vec<Pairing>) {
        self.pairing = PairingState {
            pairings,
            complete: true,
        };
    }

    /// The participant `giver_id` should buy a gift for, if any.
    ///
    /// Returns None before pairing is complete, when the giver has no pairing
    /// (registered after the draw), or when the receiver has since been deleted.
    pub fn recipient_for(&self, giver_id: &str) -> Option<&Participant> {
        if !self.pairing.complete {
            return None;
        }

        let pairing = self.pairing.pairings.iter().find(|p| p.giver == giver_id)?;
        self.participant(&pairing.receiver)
    }
}

/// Labels with IDs "1", "2", ... in the given order.
fn labels<L: Label>(names: &[&str]) -> Vec<L> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| L::new((i + 1).to_string(), name.to_string()))
        .collect()
}

fn add_label<L: Label + Clone>(labels: &mut Vec<L>, ids: &mut IdSource, name: &str) -> L {
    let label = L::new(ids.next_id(), name.to_owned());
    log::info!("Adding {} ({})", label.name(), label.id());
    labels.push(label.clone());
    label
}

fn delete_label<L: Label>(labels: &mut Vec<L>, id: &str) -> Option<L> {
    let pos = labels.iter().position(|l| l.id() == id)?;
    let removed = labels.remove(pos);
    log::info!("Deleted {} ({})", removed.name(), removed.id());
    Some(removed)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::core::pairing::generate_pairings;

    fn registration(name: &str, email: &str) -> Registration {
        Registration {
            full_name: name.to_owned(),
            email: email.to_owned(),
            password: "hunter22".to_owned(),
            team: "Engineering".to_owned(),
            designation: "Manager".to_owned(),
        }
    }

    fn pair(giver: &str, receiver: &str) -> Pairing {
        Pairing {
            giver: giver.to_owned(),
            receiver: receiver.to_owned(),
        }
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut ids = IdSource::default();
        let a: u64 = ids.next_id().parse().unwrap();
        let b: u64 = ids.next_id().parse().unwrap();
        let c: u64 = ids.next_id().parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_seeded() {
        let store = RosterStore::seeded();
        assert_eq!(store.participants().len(), 5);
        assert_eq!(store.teams().len(), 5);
        assert_eq!(store.designations().len(), 5);
        assert_eq!(store.pairing_state().pairings.len(), 5);
        assert!(!store.pairing_state().complete);
        assert!(store.find_by_email("admin@company.com").unwrap().is_admin);
        assert!(store.recipient_for("1").is_none());
    }

    #[test]
    fn test_participant_crud() {
        let mut store = RosterStore::new();
        let a = store.add_participant(registration("A", "a@x.com"));
        let b = store.add_participant(registration("B", "b@x.com"));
        assert_ne!(a.id, b.id);
        assert_eq!(store.participant_ids(), vec![a.id.clone(), b.id.clone()]);

        let renamed = Participant {
            full_name: "Alpha".to_owned(),
            ..a.clone()
        };
        assert!(store.update_participant(renamed));
        assert_eq!(store.participant(&a.id).unwrap().full_name, "Alpha");

        let ghost = Participant {
            id: "missing".to_owned(),
            ..a.clone()
        };
        assert!(!store.update_participant(ghost));
        assert_eq!(store.participants().len(), 2);

        assert_eq!(store.delete_participant(&b.id).unwrap().email, "b@x.com");
        assert!(store.delete_participant(&b.id).is_none());
        assert_eq!(store.participants().len(), 1);
    }

    #[test]
    fn test_duplicate_emails_accepted_by_store() {
        let mut store = RosterStore::new();
        store.add_participant(registration("A", "same@x.com"));
        store.add_participant(registration("B", "same@x.com"));
        assert_eq!(store.participants().len(), 2);
    }

    #[test]
    fn test_label_delete_does_not_cascade() {
        let mut store = RosterStore::seeded();
        let sales = store.add_team("Sales Ops");
        assert!(store.teams().iter().any(|t| t.name == "Sales Ops"));

        let engineering = store.teams()[0].id.clone();
        assert_eq!(store.delete_team(&engineering).unwrap().name, "Engineering");
        assert_eq!(store.participant("1").unwrap().team, "Engineering");
        assert!(store.delete_team(&engineering).is_none());
        assert!(store.delete_team(&sales.id).is_some());

        let director = store.add_designation("VP");
        assert_eq!(store.designations().len(), 6);
        assert_eq!(store.delete_designation(&director.id).unwrap().name, "VP");
        assert_eq!(store.designations().len(), 5);
    }

    #[test]
    fn test_replace_pairings_is_atomic() {
        let mut store = RosterStore::seeded();
        let mut rng = StdRng::seed_from_u64(5);

        store.replace_pairings(generate_pairings(&store.participant_ids(), &mut rng));
        let first = store.pairing_state().clone();
        assert!(first.complete);

        store.replace_pairings(generate_pairings(&store.participant_ids(), &mut rng));
        let second = store.pairing_state();
        assert!(second.complete);
        assert_eq!(second.pairings.len(), 5);
    }

    #[test]
    fn test_recipient_lookup() {
        let mut store = RosterStore::seeded();
        store.replace_pairings(vec![pair("1", "2"), pair("2", "1")]);

        assert_eq!(store.recipient_for("1").unwrap().full_name, "Jane Smith");
        assert_eq!(store.recipient_for("2").unwrap().full_name, "John Doe");
        assert!(store.recipient_for("3").is_none());
        assert!(store.recipient_for("nobody").is_none());
    }

    #[test]
    fn test_recipient_dangling_after_delete() {
        let mut store = RosterStore::new();
        let ids: Vec<_> = ["A", "B", "C"]
            .iter()
            .map(|n| store.add_participant(registration(n, "x@x.com")).id)
            .collect();

        let mut rng = StdRng::seed_from_u64(11);
        store.replace_pairings(generate_pairings(&ids, &mut rng));

        let victim = ids[1].clone();
        let giver_to_victim = store
            .pairing_state()
            .pairings
            .iter()
            .find(|p| p.receiver == victim)
            .unwrap()
            .giver
            .clone();

        store.delete_participant(&victim);

        assert!(store.recipient_for(&giver_to_victim).is_none());
        assert_eq!(store.pairing_state().pairings.len(), 3);
    }

    #[test]
    fn test_gift_status() {
        let mut store = RosterStore::seeded();
        assert!(store.set_gift_status("4", GiftStatus::GiftSent, true));
        assert!(store.participant("4").unwrap().gift_sent);
        assert!(!store.set_gift_status("99", GiftStatus::GiftSent, true));
    }
}
