pub mod logistic;

use ndarray::Array1;

use lotto_db::models::Draw;
use crate::features::FEATURE_DIM;

pub const LEARNING_RATE: f64 = 0.01;
pub const EPOCHS: usize = 100;

/// Régression logistique pour un numéro cible.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub weights: Array1<f64>,
    pub bias: f64,
}

impl Model {
    pub fn zeros() -> Self {
        Self {
            weights: Array1::zeros(FEATURE_DIM),
            bias: 0.0,
        }
    }

    pub fn logit(&self, x: &Array1<f64>) -> f64 {
        x.dot(&self.weights) + self.bias
    }

    pub fn probability(&self, x: &Array1<f64>) -> f64 {
        sigmoid(self.logit(x))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::zeros()
    }
}

/// Pas de bornage de z : en f64, exp(-z) sature vers 0 ou +inf et le résultat reste dans [0, 1].
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Historique synthétique valide : 6 numéros distincts par tirage, tours décroissants.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let offset = i * 7;
            let mut numbers = [0u8; 6];
            for (k, slot) in numbers.iter_mut().enumerate() {
                *slot = ((offset + k * 8) % 45 + 1) as u8;
            }
            Draw {
                round: (n - i) as u32,
                date: format!("2024-{:02}-{:02}", (i / 28) % 12 + 1, (i % 28) + 1),
                numbers,
                bonus: ((offset + 3) % 45 + 1) as u8,
            }
        })
        .collect()
}
