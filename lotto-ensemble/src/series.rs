use lotto_db::models::Draw;

use crate::analysis::{compute_stats, Stats};

/// Historique des tirages (tour décroissant) et statistiques associées.
/// Les statistiques sont recalculées à chaque modification, jamais modifiées sur place.
#[derive(Debug, Clone)]
pub struct DrawSeries {
    draws: Vec<Draw>,
    stats: Stats,
}

impl DrawSeries {
    pub fn new(draws: Vec<Draw>) -> Self {
        let stats = compute_stats(&draws);
        Self { draws, stats }
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn replace(&mut self, draws: Vec<Draw>) {
        self.stats = compute_stats(&draws);
        self.draws = draws;
    }

    /// Insère un tirage à sa place (tour décroissant). Un tour déjà présent est ignoré.
    pub fn push(&mut self, draw: Draw) -> bool {
        match self.draws.binary_search_by(|d| draw.round.cmp(&d.round)) {
            Ok(_) => false,
            Err(pos) => {
                self.draws.insert(pos, draw);
                self.stats = compute_stats(&self.draws);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::make_test_draws;

    fn draw(round: u32, numbers: [u8; 6]) -> Draw {
        Draw {
            round,
            date: String::new(),
            numbers,
            bonus: 45,
        }
    }

    #[test]
    fn test_stats_follow_series() {
        let mut series = DrawSeries::new(make_test_draws(10));
        assert_eq!(series.stats().total_draws, 10);

        series.replace(make_test_draws(25));
        assert_eq!(series.len(), 25);
        assert_eq!(series.stats().frequency.iter().sum::<u32>(), 6 * 25);
    }

    #[test]
    fn test_push_keeps_descending_order() {
        let mut series = DrawSeries::new(vec![draw(5, [1, 2, 3, 4, 5, 6]), draw(2, [7, 8, 9, 10, 11, 12])]);

        assert!(series.push(draw(6, [13, 14, 15, 16, 17, 18])));
        assert!(series.push(draw(3, [19, 20, 21, 22, 23, 24])));
        assert!(!series.push(draw(5, [40, 41, 42, 43, 44, 45])));

        let rounds: Vec<u32> = series.draws().iter().map(|d| d.round).collect();
        assert_eq!(rounds, vec![6, 5, 3, 2]);
        assert_eq!(series.stats().total_draws, 4);
        assert_eq!(series.stats().frequency_of(40), 0);
    }

    #[test]
    fn test_empty_series() {
        let series = DrawSeries::new(Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.stats().total_draws, 0);
    }
}
