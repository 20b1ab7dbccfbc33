use warp::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Password must be at least {0} characters long.")]
    PasswordTooShort(usize),
    #[error("A participant with email {0} is already registered.")]
    DuplicateEmail(String),
    #[error("A team with this name already exists: {0}")]
    DuplicateTeam(String),
    #[error("A designation with this name already exists: {0}")]
    DuplicateDesignation(String),
    #[error("Invalid credentials for {0}")]
    UnknownEmail(String),
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),
    #[error("Unknown team: {0}")]
    UnknownTeam(String),
    #[error("Unknown designation: {0}")]
    UnknownDesignation(String),
    #[error("Missing or expired session")]
    NoSession,
    #[error("Participant {0} is not an administrator")]
    Forbidden(String),
    #[error("At least 2 participants are required for pairing, found {0}")]
    NotEnoughParticipants(usize),
}

impl Error {
    /// HTTP status reported to API clients for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::MissingFields
            | Error::InvalidEmail
            | Error::PasswordTooShort(_)
            | Error::DuplicateEmail(_)
            | Error::DuplicateTeam(_)
            | Error::DuplicateDesignation(_) => StatusCode::BAD_REQUEST,
            Error::UnknownEmail(_) | Error::NoSession => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::UnknownParticipant(_) | Error::UnknownTeam(_) | Error::UnknownDesignation(_) => {
                StatusCode::NOT_FOUND
            }
            Error::NotEnoughParticipants(_) => StatusCode::CONFLICT,
        }
    }
}
