//! Erreurs du moteur de génération.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Historique vide ou trop court pour la taille de fenêtre demandée.
    #[error("données insuffisantes : {required} tirages requis, {available} disponibles")]
    DataUnavailable { required: usize, available: usize },

    /// Bornes de fenêtre incohérentes.
    #[error("configuration invalide : {reason}")]
    InvalidConfig { reason: String },
}

impl EngineError {
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_unavailable_message() {
        let err = EngineError::DataUnavailable { required: 200, available: 12 };
        assert_eq!(
            err.to_string(),
            "données insuffisantes : 200 tirages requis, 12 disponibles"
        );
    }

    #[test]
    fn test_invalid_config_helper() {
        let err = EngineError::invalid_config("max < min");
        assert!(matches!(err, EngineError::InvalidConfig { ref reason } if reason == "max < min"));
    }
}
