use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::TeamError;

/// A known team: full name, short common name, and conference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub common: String,
    pub conference: String,
}

/// List of known teams, loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamList {
    pub teams: Vec<Team>,
}

impl TeamList {
    /// Load the team list from a JSON file, falling back to the embedded
    /// default list when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, TeamError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                tracing::debug!("No teams file given, using embedded default list");
                Self::load_embedded()
            }
        }
    }

    /// Load team list from a specific JSON file
    pub fn load_from(path: &Path) -> Result<Self, TeamError> {
        let content = fs::read_to_string(path).map_err(|e| TeamError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let list: TeamList =
            serde_json::from_str(&content).map_err(|e| TeamError::LoadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;

        if list.teams.is_empty() {
            return Err(TeamError::Invalid(format!(
                "no teams in {}",
                path.display()
            )));
        }

        tracing::info!("Loaded {} teams from {}", list.teams.len(), path.display());
        Ok(list)
    }

    /// Load embedded default list (NCAA Division II football programs)
    fn load_embedded() -> Result<Self, TeamError> {
        const EMBEDDED_TEAMS: &str = include_str!("../config/teams.json");
        let list: TeamList =
            serde_json::from_str(EMBEDDED_TEAMS).map_err(|e| TeamError::LoadFailed {
                path: "embedded config/teams.json".to_string(),
                source: Box::new(e),
            })?;
        Ok(list)
    }

    /// Save team list as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), TeamError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| TeamError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(path, json).map_err(|e| TeamError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        tracing::info!("Saved {} teams to {}", self.teams.len(), path.display());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Team> {
        self.teams.iter()
    }
}
