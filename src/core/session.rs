use dashmap::DashMap;
use rand::{distributions::Alphanumeric, Rng};

use super::participant::ParticipantId;

const TOKEN_LENGTH: usize = 32;

/// Maps login tokens to the participant that opened them.
#[derive(Debug, Default)]
pub struct Sessions {
    tokens: DashMap<String, ParticipantId>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `participant` and return its token.
    pub fn open(&self, participant: ParticipantId) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();

        log::debug!("Opened session for {}", participant);
        self.tokens.insert(token.clone(), participant);
        token
    }

    pub fn resolve(&self, token: &str) -> Option<ParticipantId> {
        self.tokens.get(token).map(|id| id.value().clone())
    }

    /// End a session. Returns the participant it belonged to.
    pub fn close(&self, token: &str) -> Option<ParticipantId> {
        self.tokens.remove(token).map(|(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let sessions = Sessions::new();
        let token = sessions.open("42".to_owned());

        assert_eq!(token.len(), TOKEN_LENGTH);
        assert_eq!(sessions.resolve(&token).as_deref(), Some("42"));
        assert!(sessions.resolve("not-a-token").is_none());

        assert_eq!(sessions.close(&token).as_deref(), Some("42"));
        assert!(sessions.resolve(&token).is_none());
        assert!(sessions.close(&token).is_none());
    }

    #[test]
    fn test_tokens_are_distinct() {
        let sessions = Sessions::new();
        let a = sessions.open("1".to_owned());
        let b = sessions.open("1".to_owned());
        assert_ne!(a, b);
        assert_eq!(sessions.resolve(&a), sessions.resolve(&b));
    }
}
