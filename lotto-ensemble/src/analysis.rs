use std::collections::BTreeMap;

use serde::Serialize;

use lotto_db::models::{Draw, POOL_SIZE};

/// Les tendances long terme ne portent que sur les tirages les plus récents.
pub const TREND_WINDOW: usize = 500;

pub const TREND_BINS: [(u8, u8); 5] = [(1, 9), (10, 19), (20, 29), (30, 39), (40, 45)];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddEvenRatio {
    pub odd: f64,
    pub even: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SumStats {
    pub min: u32,
    pub max: u32,
    pub average: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendBin {
    pub start: u8,
    pub end: u8,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub numbers: [u8; 6],
    pub count: u32,
    /// Dans l'ordre de la série (le plus récent d'abord).
    pub rounds: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total_draws: usize,
    /// `frequency[n - 1]` = nombre de tirages contenant `n` (bonus exclu).
    pub frequency: Vec<u32>,
    pub odd_even: OddEvenRatio,
    pub sum_stats: SumStats,
    pub consecutive_numbers: u32,
    pub long_term_trends: Vec<TrendBin>,
    pub duplicate_winnings: Vec<DuplicateGroup>,
}

impl Stats {
    pub fn frequency_of(&self, number: u8) -> u32 {
        self.frequency[(number - 1) as usize]
    }
}

/// Résumé de tout l'historique. Fonction pure : même série, même résultat.
pub fn compute_stats(draws: &[Draw]) -> Stats {
    Stats {
        total_draws: draws.len(),
        frequency: frequencies(draws),
        odd_even: odd_even_ratio(draws),
        sum_stats: sum_stats(draws),
        consecutive_numbers: draws.iter().map(consecutive_pairs).sum(),
        long_term_trends: long_term_trends(draws),
        duplicate_winnings: duplicate_winnings(draws),
    }
}

fn frequencies(draws: &[Draw]) -> Vec<u32> {
    let mut freq = vec![0u32; POOL_SIZE];
    for draw in draws {
        for &n in &draw.numbers {
            freq[(n - 1) as usize] += 1;
        }
    }
    freq
}

fn odd_even_ratio(draws: &[Draw]) -> OddEvenRatio {
    let total = draws.len() * 6;
    if total == 0 {
        return OddEvenRatio { odd: 0.0, even: 0.0 };
    }
    let odd = draws
        .iter()
        .flat_map(|d| d.numbers.iter())
        .filter(|&&n| n % 2 == 1)
        .count();
    let odd_pct = odd as f64 * 100.0 / total as f64;
    OddEvenRatio {
        odd: odd_pct,
        even: 100.0 - odd_pct,
    }
}

fn sum_stats(draws: &[Draw]) -> SumStats {
    let sums: Vec<u32> = draws
        .iter()
        .map(|d| d.numbers.iter().map(|&n| n as u32).sum())
        .collect();
    if sums.is_empty() {
        return SumStats { min: 0, max: 0, average: 0 };
    }
    let total: u64 = sums.iter().map(|&s| s as u64).sum();
    SumStats {
        min: sums.iter().copied().min().unwrap_or(0),
        max: sums.iter().copied().max().unwrap_or(0),
        average: (total as f64 / sums.len() as f64).round() as u32,
    }
}

/// Paires adjacentes (après tri) qui se suivent : 12,13,14 compte pour 2.
pub fn consecutive_pairs(draw: &Draw) -> u32 {
    draw.sorted_numbers()
        .windows(2)
        .filter(|w| w[1] == w[0] + 1)
        .count() as u32
}

fn long_term_trends(draws: &[Draw]) -> Vec<TrendBin> {
    let mut bins: Vec<TrendBin> = TREND_BINS
        .iter()
        .map(|&(start, end)| TrendBin { start, end, count: 0 })
        .collect();

    for draw in draws.iter().take(TREND_WINDOW) {
        for &n in &draw.numbers {
            if let Some(bin) = bins.iter_mut().find(|b| (b.start..=b.end).contains(&n)) {
                bin.count += 1;
            }
        }
    }
    bins
}

fn duplicate_winnings(draws: &[Draw]) -> Vec<DuplicateGroup> {
    let mut by_combination: BTreeMap<[u8; 6], Vec<u32>> = BTreeMap::new();
    for draw in draws {
        by_combination
            .entry(draw.sorted_numbers())
            .or_default()
            .push(draw.round);
    }

    let mut groups: Vec<DuplicateGroup> = by_combination
        .into_iter()
        .filter(|(_, rounds)| rounds.len() > 1)
        .map(|(numbers, rounds)| DuplicateGroup {
            numbers,
            count: rounds.len() as u32,
            rounds,
        })
        .collect();
    // Tri stable : à égalité, ordre croissant des combinaisons.
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
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
    fn test_frequency_sums_to_six_per_draw() {
        let draws = make_test_draws(73);
        let stats = compute_stats(&draws);
        assert_eq!(stats.frequency.len(), 45);
        assert_eq!(stats.frequency.iter().sum::<u32>(), 6 * 73);
    }

    #[test]
    fn test_bonus_not_counted() {
        let stats = compute_stats(&[draw(1, [1, 2, 3, 4, 5, 6])]);
        assert_eq!(stats.frequency_of(45), 0);
        assert_eq!(stats.frequency_of(1), 1);
    }

    #[test]
    fn test_odd_even_sums_to_hundred() {
        let stats = compute_stats(&make_test_draws(31));
        assert!((stats.odd_even.odd + stats.odd_even.even - 100.0).abs() < 1e-9);

        let stats = compute_stats(&[draw(1, [1, 3, 5, 7, 2, 4])]);
        assert!((stats.odd_even.odd - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_series() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total_draws, 0);
        assert_eq!(stats.odd_even, OddEvenRatio { odd: 0.0, even: 0.0 });
        assert_eq!(stats.sum_stats, SumStats { min: 0, max: 0, average: 0 });
        assert!(stats.duplicate_winnings.is_empty());
        assert!(stats.long_term_trends.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_sum_stats() {
        let draws = vec![
            draw(3, [1, 2, 3, 4, 5, 6]),       // 21
            draw(2, [40, 41, 42, 43, 44, 45]), // 255
            draw(1, [10, 11, 12, 13, 14, 16]), // 76
        ];
        let stats = compute_stats(&draws);
        // 352 / 3 = 117.33
        assert_eq!(stats.sum_stats, SumStats { min: 21, max: 255, average: 117 });
    }

    #[test]
    fn test_sum_average_rounds_half_up() {
        let draws = vec![draw(2, [1, 2, 3, 4, 5, 6]), draw(1, [1, 2, 3, 4, 5, 7])];
        // (21 + 22) / 2 = 21.5
        assert_eq!(compute_stats(&draws).sum_stats.average, 22);
    }

    #[test]
    fn test_consecutive_numbers() {
        assert_eq!(compute_stats(&[draw(1, [1, 2, 3, 4, 5, 6])]).consecutive_numbers, 5);
        assert_eq!(consecutive_pairs(&draw(1, [14, 12, 30, 13, 40, 42])), 2);
        assert_eq!(consecutive_pairs(&draw(1, [1, 3, 5, 7, 9, 11])), 0);

        let draws = vec![draw(2, [12, 13, 20, 30, 40, 45]), draw(1, [1, 2, 3, 10, 20, 30])];
        assert_eq!(compute_stats(&draws).consecutive_numbers, 3);
    }

    #[test]
    fn test_long_term_trend_bins() {
        let stats = compute_stats(&[draw(1, [1, 9, 10, 29, 39, 40])]);
        let counts: Vec<u32> = stats.long_term_trends.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1, 1, 1]);
    }

    #[test]
    fn test_long_term_trends_limited_to_recent() {
        let mut draws: Vec<Draw> = (0..TREND_WINDOW)
            .map(|i| draw((TREND_WINDOW + 10 - i) as u32, [1, 2, 3, 4, 5, 6]))
            .collect();
        draws.push(draw(5, [40, 41, 42, 43, 44, 45]));

        let stats = compute_stats(&draws);
        assert_eq!(stats.long_term_trends[0].count, 6 * TREND_WINDOW as u32);
        assert_eq!(stats.long_term_trends[4].count, 0);
        assert_eq!(stats.frequency_of(45), 1);
    }

    #[test]
    fn test_duplicate_winnings_scenario() {
        let draws = vec![
            draw(3, [1, 2, 3, 4, 5, 6]),
            draw(2, [7, 8, 9, 10, 11, 12]),
            draw(1, [6, 5, 4, 3, 2, 1]),
        ];
        let stats = compute_stats(&draws);
        assert_eq!(
            stats.duplicate_winnings,
            vec![DuplicateGroup { numbers: [1, 2, 3, 4, 5, 6], count: 2, rounds: vec![3, 1] }]
        );
    }

    #[test]
    fn test_duplicate_groups_sorted_by_count() {
        let draws = vec![
            draw(6, [7, 8, 9, 10, 11, 12]),
            draw(5, [1, 2, 3, 4, 5, 6]),
            draw(4, [20, 21, 22, 23, 24, 25]),
            draw(3, [20, 21, 22, 23, 24, 25]),
            draw(2, [20, 21, 22, 23, 24, 25]),
            draw(1, [1, 2, 3, 4, 5, 6]),
        ];
        let groups = compute_stats(&draws).duplicate_winnings;
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].numbers, [20, 21, 22, 23, 24, 25]);
        assert_eq!(groups[0].rounds, vec![4, 3, 2]);
        assert_eq!(groups[1].count, 2);
    }

    #[test]
    fn test_stats_idempotent() {
        let draws = make_test_draws(120);
        assert_eq!(compute_stats(&draws), compute_stats(&draws));
    }
}
