mod display;
mod import;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;

use lotto_db::db::{
    count_draws, db_path, fetch_all_draws, fetch_last_draws, fetch_predictions, insert_prediction,
    migrate, open_db,
};
use lotto_db::models::{PredictionBatch, validate_series};
use lotto_ensemble::progress::{ProgressEvent, ProgressSink};
use lotto_ensemble::{DrawSeries, EnsembleGenerator, GeneratorConfig};
use crate::display::{display_batch, display_draws, display_history, display_import_summary, display_stats};

#[derive(Parser)]
#[command(name = "lotto", about = "Générateur de grilles Lotto 6/45 par régression logistique")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV (tour, date, 6 numéros, bonus)
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "assets/lotto.csv")]
        file: PathBuf,

        /// Séparateur de colonnes
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Statistiques sur tout l'historique
    Stats {
        /// Nombre de numéros affichés dans le classement des fréquences
        #[arg(short, long, default_value = "10")]
        top: usize,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Générer 5 grilles
    Generate {
        /// Fichier de configuration JSON (min_window, max_window)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Taille minimale des fenêtres d'apprentissage
        #[arg(long)]
        min_window: Option<usize>,

        /// Taille maximale des fenêtres d'apprentissage
        #[arg(long)]
        max_window: Option<usize>,

        /// Seed pour la reproductibilité (défaut : aléa du système)
        #[arg(long)]
        seed: Option<u64>,

        /// Ne pas enregistrer le résultat dans l'historique
        #[arg(long)]
        no_save: bool,
    },

    /// Historique des prédictions
    History {
        /// Nombre de prédictions
        #[arg(short, long, default_value = "10")]
        last: u32,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file, delimiter } => cmd_import(&conn, &file, delimiter),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { top, json } => cmd_stats(&conn, top, json),
        Command::Generate { config, min_window, max_window, seed, no_save } => {
            let config = resolve_config(config, min_window, max_window)?;
            cmd_generate(&conn, config, seed, no_save)
        }
        Command::History { last } => cmd_history(&conn, last),
    }
}

fn cmd_import(conn: &lotto_db::rusqlite::Connection, file: &PathBuf, delimiter: char) -> Result<()> {
    if !delimiter.is_ascii() {
        bail!("Séparateur non ASCII : '{}'", delimiter);
    }
    let result = import::import_csv(conn, file, delimiter as u8)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &lotto_db::rusqlite::Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : lotto import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn load_series(conn: &lotto_db::rusqlite::Connection) -> Result<DrawSeries> {
    let n = count_draws(conn)?;
    if n == 0 {
        bail!("Base vide. Lancez d'abord : lotto import");
    }
    let draws = fetch_all_draws(conn)?;
    validate_series(&draws)?;
    Ok(DrawSeries::new(draws))
}

fn cmd_stats(conn: &lotto_db::rusqlite::Connection, top: usize, json: bool) -> Result<()> {
    let series = load_series(conn)?;
    if json {
        println!("{}", serde_json::to_string_pretty(series.stats())?);
    } else {
        display_stats(series.stats(), top);
    }
    Ok(())
}

fn resolve_config(
    path: Option<PathBuf>,
    min_window: Option<usize>,
    max_window: Option<usize>,
) -> Result<GeneratorConfig> {
    let mut config = match path {
        Some(path) => GeneratorConfig::load(&path)
            .with_context(|| format!("Impossible de charger la configuration {:?}", path))?,
        None => GeneratorConfig::default(),
    };
    if let Some(min) = min_window {
        config.min_window = min;
    }
    if let Some(max) = max_window {
        config.max_window = max;
    }
    config.validate()?;
    Ok(config)
}

/// Relaie la progression du moteur vers une barre indicatif.
struct BarSink {
    pb: ProgressBar,
}

impl ProgressSink for BarSink {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.pb.set_length(event.total);
        self.pb.set_position(event.current);
        self.pb.set_message(format!("{} : {}", event.stage, event.detail));
    }

    fn on_batch(&mut self, batch: &PredictionBatch) {
        if let Some(set) = batch.sets.last() {
            self.pb.println(format!(
                "  SET {} : {}  (apprentissage moyen : {} tirages)",
                batch.sets.len(),
                set,
                batch.training_size
            ));
        }
    }
}

fn cmd_generate(
    conn: &lotto_db::rusqlite::Connection,
    config: GeneratorConfig,
    seed: Option<u64>,
    no_save: bool,
) -> Result<()> {
    let series = load_series(conn)?;
    let generator = EnsembleGenerator::new(config)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!(
        "Génération sur {} tirages (fenêtres de {} à {})...",
        series.len(),
        config.min_window,
        config.max_window
    );

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent:>3}% {msg}")?
            .progress_chars("=> "),
    );
    let mut sink = BarSink { pb };

    let batch = generator
        .generate(series.draws(), &mut rng, &mut sink)
        .context("Échec de la génération")?;
    sink.pb.finish_and_clear();

    display_batch(&batch);

    if !no_save {
        insert_prediction(conn, &batch)?;
    }
    Ok(())
}

fn cmd_history(conn: &lotto_db::rusqlite::Connection, last: u32) -> Result<()> {
    let history = fetch_predictions(conn, last)?;
    display_history(&history);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_config_defaults() {
        let config = resolve_config(None, None, None).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_resolve_config_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_window": 40, "max_window": 90}}"#).unwrap();

        let config = resolve_config(Some(file.path().to_path_buf()), None, Some(120)).unwrap();
        assert_eq!(config.min_window, 40);
        assert_eq!(config.max_window, 120);
    }

    #[test]
    fn test_resolve_config_rejects_inverted_bounds() {
        assert!(resolve_config(None, Some(150), Some(100)).is_err());
    }

    #[test]
    fn test_load_series_empty_db() {
        let conn = lotto_db::rusqlite::Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert!(load_series(&conn).is_err());
    }

    #[test]
    fn test_load_series_rejects_corrupted_row() {
        let conn = lotto_db::rusqlite::Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn.execute(
            "INSERT INTO draws (round, date, n_1, n_2, n_3, n_4, n_5, n_6, bonus)
             VALUES (1, '2024-01-06', 0, 2, 3, 4, 5, 6, 7)",
            [],
        )
        .unwrap();
        assert!(load_series(&conn).is_err());
    }
}
