use ndarray::Array1;

use lotto_db::models::{Draw, POOL_SIZE};

pub const FEATURE_DIM: usize = POOL_SIZE;

/// Vecteur indicateur : l'élément `i` vaut 1.0 si le numéro `i + 1` est sorti (bonus exclu).
pub fn encode_draw(draw: &Draw) -> Array1<f64> {
    let mut v = Array1::zeros(FEATURE_DIM);
    for &n in &draw.numbers {
        v[(n - 1) as usize] = 1.0;
    }
    v
}

/// Exemples (tirage `i` → présence de la cible au tirage `i + 1`) d'une fenêtre.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub inputs: Vec<Array1<f64>>,
    pub labels: Vec<f64>,
}

impl TrainingSet {
    /// `window[0]` = tirage le plus récent. Une fenêtre de n tirages donne n - 1 exemples.
    pub fn build(window: &[Draw], target: u8) -> Self {
        let inputs = encode_window(window);
        Self::from_encoded(inputs, window, target)
    }

    /// Variante qui réutilise des entrées déjà encodées (`encode_window`).
    pub fn from_encoded(inputs: Vec<Array1<f64>>, window: &[Draw], target: u8) -> Self {
        let labels = window
            .iter()
            .skip(1)
            .map(|next| if next.contains(target) { 1.0 } else { 0.0 })
            .collect();
        Self { inputs, labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Encode tous les tirages de la fenêtre sauf le dernier (qui n'a pas de successeur).
pub fn encode_window(window: &[Draw]) -> Vec<Array1<f64>> {
    let n = window.len().saturating_sub(1);
    window.iter().take(n).map(encode_draw).collect()
}
