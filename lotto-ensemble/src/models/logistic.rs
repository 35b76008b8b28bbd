use lotto_db::models::Draw;

use super::{Model, EPOCHS, LEARNING_RATE};
use crate::features::TrainingSet;

/// Classifieur binaire pour un numéro : P(cible au tirage suivant | tirage courant).
#[derive(Debug, Clone, Copy)]
pub struct NumberClassifier {
    target: u8,
    learning_rate: f64,
    epochs: usize,
}

impl NumberClassifier {
    pub fn new(target: u8) -> Self {
        Self {
            target,
            learning_rate: LEARNING_RATE,
            epochs: EPOCHS,
        }
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn train(&self, window: &[Draw]) -> Model {
        let set = TrainingSet::build(window, self.target);
        self.fit(&set, |_| {})
    }

    /// Descente de gradient exemple par exemple : chaque mise à jour voit les poids
    /// déjà modifiés par les exemples précédents de la même époque.
    /// `on_epoch` est appelé au début de chaque époque.
    pub fn fit<F: FnMut(usize)>(&self, set: &TrainingSet, mut on_epoch: F) -> Model {
        let mut model = Model::zeros();

        for epoch in 0..self.epochs {
            on_epoch(epoch);
            for (x, &y) in set.inputs.iter().zip(set.labels.iter()) {
                let err = model.probability(x) - y;
                model.weights.scaled_add(-self.learning_rate * err, x);
                model.bias -= self.learning_rate * err;
            }
        }

        model
    }
}
