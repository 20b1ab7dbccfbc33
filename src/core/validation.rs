use crate::error::Error;

use super::{
    master_data::{name_taken, Designation, Team},
    participant::{Participant, Registration},
};

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

fn check_email(email: &str) -> Result<(), Error> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(Error::InvalidEmail)
    }
}

fn any_blank(fields: &[&str]) -> bool {
    fields.iter().any(|f| f.trim().is_empty())
}

/// Check a registration form before it reaches the store.
pub fn validate_registration(
    registration: &Registration,
    existing: &[Participant],
    min_password_length: usize,
) -> Result<(), Error> {
    if any_blank(&[
        registration.full_name.as_str(),
        registration.email.as_str(),
        registration.password.as_str(),
        registration.team.as_str(),
        registration.designation.as_str(),
    ]) {
        return Err(Error::MissingFields);
    }

    check_email(&registration.email)?;

    if registration.password.chars().count() < min_password_length {
        return Err(Error::PasswordTooShort(min_password_length));
    }

    if existing
        .iter()
        .any(|p| p.email.eq_ignore_ascii_case(&registration.email))
    {
        return Err(Error::DuplicateEmail(registration.email.clone()));
    }

    Ok(())
}

/// Check an admin edit of a participant record.
pub fn validate_participant(participant: &Participant) -> Result<(), Error> {
    if any_blank(&[
        participant.full_name.as_str(),
        participant.email.as_str(),
        participant.team.as_str(),
        participant.designation.as_str(),
    ]) {
        return Err(Error::MissingFields);
    }

    check_email(&participant.email)
}

/// Trim a new team name and reject blanks or case-insensitive duplicates.
pub fn validate_team_name(name: &str, teams: &[Team]) -> Result<String, Error> {
    let name = name.trim();
    if name.is_empty() {
        Err(Error::MissingFields)
    } else if name_taken(teams, name) {
        Err(Error::DuplicateTeam(name.to_owned()))
    } else {
        Ok(name.to_owned())
    }
}

/// Trim a new designation name and reject blanks or case-insensitive duplicates.
pub fn validate_designation_name(name: &str, designations: &[Designation]) -> Result<String, Error> {
    let name = name.trim();
    if name.is_empty() {
        Err(Error::MissingFields)
    } else if name_taken(designations, name) {
        Err(Error::DuplicateDesignation(name.to_owned()))
    } else {
        Ok(name.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::master_data::Label;

    fn registration() -> Registration {
        Registration {
            full_name: "Carol White".to_owned(),
            email: "carol@company.com".to_owned(),
            password: "secret".to_owned(),
            team: "Sales".to_owned(),
            designation: "Director".to_owned(),
        }
    }

    #[test]
    fn test_registration() {
        assert!(validate_registration(&registration(), &[], 6).is_ok());

        let blank = Registration {
            team: "  ".to_owned(),
            ..registration()
        };
        assert!(matches!(validate_registration(&blank, &[], 6), Err(Error::MissingFields)));

        let bad_email = Registration {
            email: "carol.company.com".to_owned(),
            ..registration()
        };
        assert!(matches!(validate_registration(&bad_email, &[], 6), Err(Error::InvalidEmail)));

        let short = Registration {
            password: "12345".to_owned(),
            ..registration()
        };
        assert!(matches!(
            validate_registration(&short, &[], 6),
            Err(Error::PasswordTooShort(6))
        ));
        assert!(validate_registration(&short, &[], 4).is_ok());
    }

    #[test]
    fn test_registration_duplicate_email() {
        let existing = vec![Participant {
            id: "1".to_owned(),
            email: "CAROL@company.com".to_owned(),
            ..Default::default()
        }];

        assert!(matches!(
            validate_registration(&registration(), &existing, 6),
            Err(Error::DuplicateEmail(_))
        ));
    }

    #[test]
    fn test_participant_edit() {
        let participant = Participant {
            id: "1".to_owned(),
            full_name: "John Doe".to_owned(),
            email: "john@company.com".to_owned(),
            team: "Engineering".to_owned(),
            designation: "Manager".to_owned(),
            ..Default::default()
        };
        assert!(validate_participant(&participant).is_ok());

        let no_name = Participant {
            full_name: String::new(),
            ..participant.clone()
        };
        assert!(matches!(validate_participant(&no_name), Err(Error::MissingFields)));

        let bad_email = Participant {
            email: "john".to_owned(),
            ..participant
        };
        assert!(matches!(validate_participant(&bad_email), Err(Error::InvalidEmail)));
    }

    #[test]
    fn test_label_names() {
        let teams = vec![Team::new("1".to_owned(), "Engineering".to_owned())];

        assert_eq!(validate_team_name("  Support ", &teams).unwrap(), "Support");
        assert!(matches!(validate_team_name("   ", &teams), Err(Error::MissingFields)));
        assert!(matches!(
            validate_team_name("engineering", &teams),
            Err(Error::DuplicateTeam(_))
        ));

        let designations = vec![Designation::new("1".to_owned(), "Manager".to_owned())];
        assert!(matches!(
            validate_designation_name(" MANAGER ", &designations),
            Err(Error::DuplicateDesignation(_))
        ));
        assert_eq!(validate_designation_name("Intern", &designations).unwrap(), "Intern");
    }
}
