use ndarray::Array1;

use lotto_db::models::{Draw, PredictionSet, PICK_COUNT, POOL_SIZE};

use crate::features::{encode_draw, encode_window, TrainingSet, FEATURE_DIM};
use crate::models::logistic::NumberClassifier;
use crate::models::{Model, EPOCHS};
use crate::progress::{NullSink, ProgressTracker, Stage, EPOCH_REPORT_INTERVAL};

/// Nombre d'étapes de progression pour une grille (une étape = une époque d'un numéro).
pub const STEPS_PER_SET: u64 = (POOL_SIZE * EPOCHS) as u64;

#[derive(Debug, Clone)]
pub struct SetOutcome {
    pub models: Vec<Model>,
    /// `probabilities[n - 1]` = probabilité estimée du numéro `n`.
    pub probabilities: Vec<f64>,
    pub picks: PredictionSet,
}

/// Entraîne les 45 classifieurs d'une grille sur une fenêtre et en déduit 6 numéros.
#[derive(Debug, Clone, Copy)]
pub struct SetTrainer {
    set_index: usize,
}

impl SetTrainer {
    pub fn new(set_index: usize) -> Self {
        Self { set_index }
    }

    pub fn train(&self, window: &[Draw]) -> SetOutcome {
        let mut sink = NullSink;
        let mut tracker = ProgressTracker::new(&mut sink, STEPS_PER_SET);
        self.train_with_progress(window, &mut tracker)
    }

    pub fn train_with_progress(&self, window: &[Draw], tracker: &mut ProgressTracker<'_>) -> SetOutcome {
        let set_no = self.set_index + 1;
        let inputs = encode_window(window);
        let mut models = Vec::with_capacity(POOL_SIZE);

        for target in 1..=POOL_SIZE as u8 {
            tracker.emit(
                Stage::Training,
                format!("Grille {set_no} : préparation du modèle {target}"),
            );

            let set = TrainingSet::from_encoded(inputs.clone(), window, target);
            let classifier = NumberClassifier::new(target);
            let model = classifier.fit(&set, |epoch| {
                if epoch > 0 {
                    tracker.advance(1);
                }
                if epoch % EPOCH_REPORT_INTERVAL == 0 {
                    tracker.emit(
                        Stage::TrainingProgress,
                        format!(
                            "Grille {set_no} : modèle {target} ({}/{})",
                            epoch + 1,
                            classifier.epochs()
                        ),
                    );
                }
            });
            tracker.advance(1);
            models.push(model);
        }

        let context = window
            .first()
            .map(encode_draw)
            .unwrap_or_else(|| Array1::zeros(FEATURE_DIM));
        let probabilities: Vec<f64> = models.iter().map(|m| m.probability(&context)).collect();
        let picks = rank_numbers(&probabilities);

        SetOutcome { models, probabilities, picks }
    }
}

/// Les 6 numéros les plus probables, triés par ordre croissant. À probabilité égale,
/// le plus petit numéro l'emporte (tri stable sur l'ordre 1..45).
pub fn rank_numbers(probabilities: &[f64]) -> PredictionSet {
    let mut ranked: Vec<(u8, f64)> = probabilities
        .iter()
        .enumerate()
        .map(|(i, &p)| ((i + 1) as u8, p))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut picks = [0u8; PICK_COUNT];
    for (slot, (number, _)) in picks.iter_mut().zip(ranked.iter()) {
        *slot = *number;
    }
    picks.sort_unstable();
    PredictionSet(picks)
}
