use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use lotto_db::models::{Draw, PredictionBatch};
use lotto_ensemble::analysis::Stats;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Couleur par dizaine, comme les boules du tirage.
fn number_color(n: u8) -> Color {
    match n {
        1..=10 => Color::Yellow,
        11..=20 => Color::Blue,
        21..=30 => Color::Red,
        31..=40 => Color::Green,
        _ => Color::Magenta,
    }
}

fn numbers_str(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["Tour", "Date", "Numéros", "Bonus"]);

    for draw in draws {
        table.add_row(vec![
            draw.round.to_string(),
            draw.date.clone(),
            numbers_str(&draw.sorted_numbers()),
            format!("{:2}", draw.bonus),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_stats(stats: &Stats, top: usize) {
    println!("\n📊 Statistiques sur {} tirages\n", stats.total_draws);

    println!("── Numéros les plus fréquents ──");
    let mut table = new_table();
    table.set_header(vec!["Numéro", "Fréquence"]);

    let mut ranked: Vec<(u8, u32)> = (1..=45u8).map(|n| (n, stats.frequency_of(n))).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    for (n, freq) in ranked.iter().take(top) {
        table.add_row(vec![
            Cell::new(format!("{:2}", n)).fg(number_color(*n)),
            Cell::new(freq),
        ]);
    }
    println!("{table}");

    println!("\n── Résumé ──");
    let mut table = new_table();
    table.set_header(vec!["Indicateur", "Valeur"]);
    table.add_row(vec![
        "Impairs / pairs".to_string(),
        format!("{:.1} % / {:.1} %", stats.odd_even.odd, stats.odd_even.even),
    ]);
    table.add_row(vec![
        "Somme min / moy / max".to_string(),
        format!(
            "{} / {} / {}",
            stats.sum_stats.min, stats.sum_stats.average, stats.sum_stats.max
        ),
    ]);
    table.add_row(vec![
        "Paires consécutives".to_string(),
        stats.consecutive_numbers.to_string(),
    ]);
    println!("{table}");

    println!("\n── Tendances (500 derniers tirages) ──");
    let mut table = new_table();
    table.set_header(vec!["Tranche", "Sorties"]);
    for bin in &stats.long_term_trends {
        table.add_row(vec![format!("{}-{}", bin.start, bin.end), bin.count.to_string()]);
    }
    println!("{table}");

    if !stats.duplicate_winnings.is_empty() {
        println!("\n── Combinaisons déjà sorties plusieurs fois ──");
        let mut table = new_table();
        table.set_header(vec!["Numéros", "Occurrences", "Tours"]);
        for group in &stats.duplicate_winnings {
            let rounds = group.rounds.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", ");
            table.add_row(vec![numbers_str(&group.numbers), group.count.to_string(), rounds]);
        }
        println!("{table}");
    }
}

pub fn display_batch(batch: &PredictionBatch) {
    println!(
        "\n🎲 Grilles générées le {} (apprentissage moyen : {} tirages)\n",
        batch.created_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S"),
        batch.training_size
    );

    let mut table = new_table();
    table.set_header(vec!["Grille", "N1", "N2", "N3", "N4", "N5", "N6", "Fenêtre"]);

    for (i, set) in batch.sets.iter().enumerate() {
        let mut numbers = set.numbers()
            .iter()
            .map(|&n| Cell::new(format!("{:2}", n)).fg(number_color(n)))
            .collect::<Vec<_>>();
        let window = batch.window_sizes.get(i).map(|w| w.to_string()).unwrap_or_default();
        let mut row = vec![Cell::new(format!("SET {}", i + 1))];
        row.append(&mut numbers);
        row.push(Cell::new(window));
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_history(history: &[PredictionBatch]) {
    if history.is_empty() {
        println!("Aucune prédiction enregistrée.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["Date", "Apprentissage", "Grilles"]);

    for batch in history {
        let sets = batch.sets.iter().map(|s| s.to_string()).collect::<Vec<_>>().join("\n");
        table.add_row(vec![
            batch.created_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string(),
            format!("{} tirages", batch.training_size),
            sets,
        ]);
    }
    println!("{table}");
}
