use serde::Serialize;

use super::{
    master_data::{Designation, Label, Team},
    participant::Participant,
};

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Distribution {
    pub name: String,
    pub count: usize,
    /// Share of all participants, rounded to one decimal
    pub percentage: f64,
}

/// Roster statistics shown to administrators
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_participants: usize,
    pub admin_count: usize,
    pub regular_count: usize,
    pub teams: Vec<Distribution>,
    pub designations: Vec<Distribution>,
    pub largest_team: Option<Distribution>,
    pub most_common_designation: Option<Distribution>,
    pub average_per_team: f64,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Count participants per known label, dropping labels nobody references.
fn distribution<L: Label>(
    labels: &[L],
    participants: &[Participant],
    field: fn(&Participant) -> &str,
) -> Vec<Distribution> {
    let total = participants.len();
    labels
        .iter()
        .map(|label| {
            let count = participants.iter().filter(|p| field(p) == label.name()).count();
            Distribution {
                name: label.name().to_owned(),
                count,
                percentage: round1(count as f64 / total.max(1) as f64 * 100.0),
            }
        })
        .filter(|d| d.count > 0)
        .collect()
}

/// First entry with the highest count.
fn largest(entries: &[Distribution]) -> Option<Distribution> {
    entries
        .iter()
        .fold(None, |best: Option<&Distribution>, d| match best {
            Some(b) if b.count >= d.count => Some(b),
            _ => Some(d),
        })
        .cloned()
}

pub fn compute(participants: &[Participant], teams: &[Team], designations: &[Designation]) -> Analytics {
    let teams = distribution(teams, participants, |p| p.team.as_str());
    let designations = distribution(designations, participants, |p| p.designation.as_str());

    let total = participants.len();
    let admin_count = participants.iter().filter(|p| p.is_admin).count();
    let average_per_team = if teams.is_empty() {
        0.0
    } else {
        round1(total as f64 / teams.len() as f64)
    };

    Analytics {
        total_participants: total,
        admin_count,
        regular_count: total - admin_count,
        largest_team: largest(&teams),
        most_common_designation: largest(&designations),
        teams,
        designations,
        average_per_team,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::roster::RosterStore;

    #[test]
    fn test_seeded_analytics() {
        let store = RosterStore::seeded();
        let stats = compute(store.participants(), store.teams(), store.designations());

        assert_eq!(stats.total_participants, 5);
        assert_eq!(stats.admin_count, 1);
        assert_eq!(stats.regular_count, 4);

        // Sales has nobody and is omitted.
        assert_eq!(stats.teams.len(), 4);
        let engineering = &stats.teams[0];
        assert_eq!(engineering.name, "Engineering");
        assert_eq!(engineering.count, 2);
        assert_eq!(engineering.percentage, 40.0);

        assert_eq!(stats.largest_team.unwrap().name, "Engineering");
        assert_eq!(stats.most_common_designation.unwrap().name, "Manager");
        assert_eq!(stats.average_per_team, 1.3);
    }

    #[test]
    fn test_dangling_names_not_counted() {
        let mut store = RosterStore::seeded();
        let engineering = store.teams()[0].id.clone();
        store.delete_team(&engineering);

        let stats = compute(store.participants(), store.teams(), store.designations());
        assert!(stats.teams.iter().all(|t| t.name != "Engineering"));
        assert_eq!(stats.teams.iter().map(|t| t.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_empty_roster() {
        let stats = compute(&[], &[], &[]);
        assert_eq!(stats.total_participants, 0);
        assert!(stats.largest_team.is_none());
        assert_eq!(stats.average_per_team, 0.0);
    }
}
