use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const DEFAULT_MIN_WINDOW: usize = 30;
pub const DEFAULT_MAX_WINDOW: usize = 200;

/// Bornes (incluses) de la taille des fenêtres d'entraînement tirées au hasard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub min_window: usize,
    pub max_window: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_window: DEFAULT_MIN_WINDOW,
            max_window: DEFAULT_MAX_WINDOW,
        }
    }
}

impl GeneratorConfig {
    pub fn new(min_window: usize, max_window: usize) -> Result<Self> {
        let config = Self { min_window, max_window };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_window == 0 {
            return Err(EngineError::invalid_config("la fenêtre minimale doit être >= 1"));
        }
        if self.max_window < self.min_window {
            return Err(EngineError::invalid_config(format!(
                "fenêtre maximale {} < fenêtre minimale {}",
                self.max_window, self.min_window
            )));
        }
        Ok(())
    }

    /// Charge une configuration JSON. Les champs absents prennent leur valeur par défaut.
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigLoadError> {
        let json = std::fs::read_to_string(path)?;
        let config: GeneratorConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("lecture impossible : {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON invalide : {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] EngineError),
}
