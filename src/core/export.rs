use time::Date;

use super::{pairing::Pairing, participant::Participant};

/// Quote a field without escaping. Embedded quotes or commas pass through.
fn quoted(field: &str) -> String {
    format!("\"{}\"", field)
}

/// CSV of every participant: name, email, team, designation and admin status.
pub fn participants_csv(participants: &[Participant]) -> String {
    let mut lines = vec!["Full Name,Email,Team,Designation,Admin Status".to_owned()];
    lines.extend(participants.iter().map(|p| {
        [
            quoted(&p.full_name),
            quoted(&p.email),
            quoted(&p.team),
            quoted(&p.designation),
            if p.is_admin { "Yes" } else { "No" }.to_owned(),
        ]
        .join(",")
    }));
    lines.join("\n")
}

/// CSV of every pairing with giver and receiver resolved against `participants`.
///
/// IDs that no longer resolve are written as "Unknown".
pub fn pairings_csv(pairings: &[Pairing], participants: &[Participant]) -> String {
    let find = |id: &str| participants.iter().find(|p| p.id == id);
    let name = |p: Option<&Participant>| quoted(p.map_or("Unknown", |p| p.full_name.as_str()));
    let email = |p: Option<&Participant>| quoted(p.map_or("Unknown", |p| p.email.as_str()));

    let mut lines = vec!["Giver Name,Giver Email,Receiver Name,Receiver Email".to_owned()];
    lines.extend(pairings.iter().map(|pairing| {
        let giver = find(&pairing.giver);
        let receiver = find(&pairing.receiver);
        [name(giver), email(giver), name(receiver), email(receiver)].join(",")
    }));
    lines.join("\n")
}

/// Suggested download name, e.g. `secret-santa-users-2024-12-01.csv`.
pub fn file_name(kind: &str, date: Date) -> String {
    format!("secret-santa-{}-{}.csv", kind, date)
}

#[cfg(test)]
mod tests {
    use time::Month;

    use super::*;
    use crate::core::roster::RosterStore;

    #[test]
    fn test_participants_csv() {
        let store = RosterStore::seeded();
        let csv = participants_csv(&store.participants()[1..3]);

        assert_eq!(
            csv,
            "Full Name,Email,Team,Designation,Admin Status\n\
             \"Jane Smith\",\"jane@company.com\",\"Design\",\"Team Lead\",No\n\
             \"Admin User\",\"admin@company.com\",\"Engineering\",\"Manager\",Yes"
        );
    }

    #[test]
    fn test_no_escaping() {
        let participant = Participant {
            full_name: "Doe, \"JD\" John".to_owned(),
            ..Default::default()
        };
        let csv = participants_csv(&[participant]);
        assert!(csv.ends_with("\"Doe, \"JD\" John\",\"\",\"\",\"\",No"));
    }

    #[test]
    fn test_pairings_csv_with_dangling() {
        let mut store = RosterStore::seeded();
        store.delete_participant("2");
        let pairings = vec![
            Pairing {
                giver: "1".to_owned(),
                receiver: "2".to_owned(),
            },
            Pairing {
                giver: "4".to_owned(),
                receiver: "1".to_owned(),
            },
        ];

        let csv = pairings_csv(&pairings, store.participants());
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Giver Name,Giver Email,Receiver Name,Receiver Email");
        assert_eq!(
            lines[1],
            "\"John Doe\",\"john@company.com\",\"Unknown\",\"Unknown\""
        );
        assert_eq!(
            lines[2],
            "\"Bob Johnson\",\"bob@company.com\",\"John Doe\",\"john@company.com\""
        );
    }

    #[test]
    fn test_empty_export_is_header_only() {
        assert_eq!(participants_csv(&[]), "Full Name,Email,Team,Designation,Admin Status");
        assert_eq!(
            pairings_csv(&[], &[]),
            "Giver Name,Giver Email,Receiver Name,Receiver Email"
        );
    }

    #[test]
    fn test_file_name() {
        let date = Date::from_calendar_date(2024, Month::December, 1).unwrap();
        assert_eq!(file_name("pairings", date), "secret-santa-pairings-2024-12-01.csv");
    }
}
