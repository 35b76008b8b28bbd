use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const POOL_SIZE: usize = 45;
pub const PICK_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub round: u32,
    pub date: String,
    pub numbers: [u8; 6],
    pub bonus: u8,
}

impl Draw {
    pub fn sorted_numbers(&self) -> [u8; 6] {
        let mut sorted = self.numbers;
        sorted.sort_unstable();
        sorted
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }
}

/// Une grille générée : 6 numéros distincts, triés par ordre croissant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionSet(pub [u8; 6]);

impl PredictionSet {
    pub fn numbers(&self) -> &[u8; 6] {
        &self.0
    }
}

impl std::fmt::Display for PredictionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.0
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionBatch {
    pub id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub sets: Vec<PredictionSet>,
    /// Moyenne (arrondie à l'inférieur) des tailles de fenêtre des grilles déjà générées.
    pub training_size: u32,
    pub window_sizes: Vec<u32>,
}

pub fn validate_draw(numbers: &[u8; 6], bonus: u8) -> Result<()> {
    for &n in numbers {
        if !(1..=POOL_SIZE as u8).contains(&n) {
            bail!("Numéro {} hors limites (1-{})", n, POOL_SIZE);
        }
    }
    if !(1..=POOL_SIZE as u8).contains(&bonus) {
        bail!("Bonus {} hors limites (1-{})", bonus, POOL_SIZE);
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

/// Vérifie chaque tirage, puis que la série est triée par tour décroissant, sans doublon de tour.
pub fn validate_series(draws: &[Draw]) -> Result<()> {
    for draw in draws {
        validate_draw(&draw.numbers, draw.bonus)
            .with_context(|| format!("Tirage {} invalide", draw.round))?;
    }
    for pair in draws.windows(2) {
        if pair[0].round <= pair[1].round {
            bail!(
                "Série mal ordonnée : tour {} suivi de {}",
                pair[0].round,
                pair[1].round
            );
        }
    }
    Ok(())
}
