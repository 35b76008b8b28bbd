pub mod trainer;

use rand::Rng;

use lotto_db::models::{Draw, PredictionBatch};

use crate::config::GeneratorConfig;
use crate::error::{EngineError, Result};
use crate::progress::{ProgressSink, ProgressTracker, Stage};
use crate::sampler::{ContiguousSampler, WindowSampler};
use trainer::{SetTrainer, STEPS_PER_SET};

/// Nombre de grilles par génération.
pub const SET_COUNT: usize = 5;

/// Produit un lot de 5 grilles, chacune entraînée sur sa propre fenêtre tirée au hasard.
/// Aucun modèle n'est conservé d'un appel à l'autre.
pub struct EnsembleGenerator<S = ContiguousSampler> {
    config: GeneratorConfig,
    sampler: S,
}

impl EnsembleGenerator<ContiguousSampler> {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Self::with_sampler(config, ContiguousSampler)
    }
}

impl<S: WindowSampler> EnsembleGenerator<S> {
    pub fn with_sampler(config: GeneratorConfig, sampler: S) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, sampler })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// `draws[0]` = tirage le plus récent. Échoue avant tout apprentissage si
    /// l'historique ne couvre même pas la plus petite fenêtre ; sinon une taille
    /// tirée plus grande que l'historique interrompt la génération, lot partiel compris.
    pub fn generate<R: Rng>(
        &self,
        draws: &[Draw],
        rng: &mut R,
        sink: &mut dyn ProgressSink,
    ) -> Result<PredictionBatch> {
        if draws.is_empty() || draws.len() < self.config.min_window {
            return Err(EngineError::DataUnavailable {
                required: self.config.min_window.max(1),
                available: draws.len(),
            });
        }

        let created_at = chrono::Utc::now();
        let mut batch = PredictionBatch {
            id: created_at.timestamp_millis(),
            created_at,
            sets: Vec::with_capacity(SET_COUNT),
            training_size: 0,
            window_sizes: Vec::with_capacity(SET_COUNT),
        };

        let mut tracker = ProgressTracker::new(sink, STEPS_PER_SET * SET_COUNT as u64);
        tracker.emit(Stage::Preparing, "Préparation de la grille 1...");

        for s in 0..SET_COUNT {
            let window = self.sampler.sample(draws, &self.config, rng)?;
            log::debug!(
                "Grille {} : fenêtre de {} tirages à partir de l'index {}",
                s + 1,
                window.len(),
                window.start
            );

            let outcome = SetTrainer::new(s).train_with_progress(window.draws, &mut tracker);

            batch.sets.push(outcome.picks);
            batch.window_sizes.push(window.len() as u32);
            let total: u32 = batch.window_sizes.iter().sum();
            batch.training_size = total / (s as u32 + 1);

            log::info!(
                "Grille {}/{} : {} (fenêtre {}, moyenne {})",
                s + 1,
                SET_COUNT,
                outcome.picks,
                window.len(),
                batch.training_size
            );

            tracker.publish(&batch);
            let detail = if s + 1 < SET_COUNT {
                format!("Préparation de la grille {}...", s + 2)
            } else {
                "Génération terminée".to_string()
            };
            tracker.emit(Stage::Generating, detail);
        }

        Ok(batch)
    }
}
