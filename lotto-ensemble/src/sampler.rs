use rand::Rng;

use lotto_db::models::Draw;

use crate::config::GeneratorConfig;
use crate::error::{EngineError, Result};

/// Fenêtre d'entraînement : `draws[0]` est le tirage le plus récent de la fenêtre.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pub start: usize,
    pub draws: &'a [Draw],
}

impl Window<'_> {
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

/// Politique de tirage des fenêtres d'entraînement. La source d'aléa est injectée
/// pour qu'un test puisse la fixer avec `StdRng::seed_from_u64`.
pub trait WindowSampler {
    fn sample<'a, R: Rng>(
        &self,
        draws: &'a [Draw],
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Result<Window<'a>>;
}

/// Taille uniforme dans `[min_window, max_window]`, puis départ uniforme dans
/// `[0, len - taille]` ; la fenêtre est la tranche contiguë correspondante.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContiguousSampler;

impl WindowSampler for ContiguousSampler {
    fn sample<'a, R: Rng>(
        &self,
        draws: &'a [Draw],
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Result<Window<'a>> {
        let size = rng.random_range(config.min_window..=config.max_window);
        if draws.is_empty() || size > draws.len() {
            return Err(EngineError::DataUnavailable {
                required: size,
                available: draws.len(),
            });
        }
        let start = rng.random_range(0..=draws.len() - size);
        Ok(Window {
            start,
            draws: &draws[start..start + size],
        })
    }
}
