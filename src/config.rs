use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::action::COUP_COST;
use crate::error::ConfigError;

/// Table rules that may vary between games, loadable from JSON.
///
/// Missing fields fall back to the standard rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub starting_treasury: u32,
    pub min_players: usize,
    pub max_players: usize,
    /// Holding this many coins leaves a player with only coup or end turn.
    pub mandatory_coup_threshold: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            starting_treasury: 50,
            min_players: 2,
            max_players: 6,
            mandatory_coup_threshold: 10,
        }
    }
}

impl RulesConfig {
    /// Load rules from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Load rules from a JSON file, falling back to the defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "rules file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players < 2 {
            return Err(ConfigError::Validation(
                "min_players must be >= 2".into(),
            ));
        }
        if self.max_players < self.min_players {
            return Err(ConfigError::Validation(
                "max_players must be >= min_players".into(),
            ));
        }
        // anything lower would force a coup nobody can afford
        if self.mandatory_coup_threshold < COUP_COST {
            return Err(ConfigError::Validation(format!(
                "mandatory_coup_threshold must be >= {COUP_COST}"
            )));
        }

        Ok(())
    }
}
