use std::{fs::read_to_string, path::Path};

use serde::{Deserialize, Serialize};

use super::validation::DEFAULT_MIN_PASSWORD_LENGTH;

pub const DEFAULT_WEB_PORT: u16 = 28010;

/// Json struct for service settings
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Settings {
    pub web_port: Option<u16>,
    /// Start with the demo roster instead of an empty one
    pub seed_demo_data: Option<bool>,
    pub min_password_length: Option<usize>,
}

impl Settings {
    /// Read settings from a JSON file, or use defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Settings> {
        match path {
            Some(path) => {
                log::info!("Loading settings from {}", path.display());
                Ok(serde_json::from_str(&read_to_string(path)?)?)
            }
            None => Ok(Settings::default()),
        }
    }

    pub fn web_port(&self) -> u16 {
        self.web_port.unwrap_or(DEFAULT_WEB_PORT)
    }

    pub fn seed_demo_data(&self) -> bool {
        self.seed_demo_data.unwrap_or(true)
    }

    pub fn min_password_length(&self) -> usize {
        self.min_password_length.unwrap_or(DEFAULT_MIN_PASSWORD_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.web_port(), 28010);
        assert!(settings.seed_demo_data());
        assert_eq!(settings.min_password_length(), 6);
    }

    #[test]
    fn test_partial_json() {
        let settings: Settings = serde_json::from_str(r#"{"web_port": 8080, "seed_demo_data": false}"#).unwrap();
        assert_eq!(settings.web_port(), 8080);
        assert!(!settings.seed_demo_data());
        assert_eq!(settings.min_password_length(), 6);
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("secret-santa-settings-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"min_password_length": 10}"#).unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.min_password_length(), 10);
        assert!(Settings::load(Some(Path::new("/nonexistent/settings.json"))).is_err());
    }
}
