use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{Draw, PredictionBatch, PredictionSet};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    round     INTEGER PRIMARY KEY,
    date      TEXT NOT NULL,
    n_1       INTEGER NOT NULL,
    n_2       INTEGER NOT NULL,
    n_3       INTEGER NOT NULL,
    n_4       INTEGER NOT NULL,
    n_5       INTEGER NOT NULL,
    n_6       INTEGER NOT NULL,
    bonus     INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS predictions (
    id             INTEGER PRIMARY KEY,
    created_at     TEXT NOT NULL,
    training_size  INTEGER NOT NULL,
    sets           TEXT NOT NULL,
    window_sizes   TEXT NOT NULL DEFAULT '[]'
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotto.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (round, date, n_1, n_2, n_3, n_4, n_5, n_6, bonus)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            draw.round,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.bonus,
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn row_to_draw(row: &rusqlite::Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        round: row.get(0)?,
        date: row.get(1)?,
        numbers: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
        bonus: row.get(8)?,
    })
}

/// Tirages les plus récents d'abord (tour décroissant).
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT round, date, n_1, n_2, n_3, n_4, n_5, n_6, bonus
         FROM draws ORDER BY round DESC LIMIT ?1"
    )?;
    let draws = stmt.query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let n = count_draws(conn)?;
    fetch_last_draws(conn, n)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

pub fn insert_prediction(conn: &Connection, batch: &PredictionBatch) -> Result<()> {
    let sets = serde_json::to_string(&batch.sets)?;
    let window_sizes = serde_json::to_string(&batch.window_sizes)?;
    conn.execute(
        "INSERT INTO predictions (id, created_at, training_size, sets, window_sizes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            batch.id,
            batch.created_at.to_rfc3339(),
            batch.training_size,
            sets,
            window_sizes,
        ],
    ).context("Échec de l'enregistrement de la prédiction")?;
    log::info!("Prédiction {} enregistrée ({} grilles)", batch.id, batch.sets.len());
    Ok(())
}

/// Historique des prédictions, la plus récente d'abord.
pub fn fetch_predictions(conn: &Connection, limit: u32) -> Result<Vec<PredictionBatch>> {
    let mut stmt = conn.prepare(
        "SELECT id, created_at, training_size, sets, window_sizes
         FROM predictions ORDER BY id DESC LIMIT ?1"
    )?;
    let rows = stmt.query_map([limit], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, u32>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?.collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, created_at, training_size, sets, window_sizes)| {
            let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
                .with_context(|| format!("Date invalide pour la prédiction {id}"))?
                .with_timezone(&chrono::Utc);
            let sets: Vec<PredictionSet> = serde_json::from_str(&sets)
                .with_context(|| format!("Grilles invalides pour la prédiction {id}"))?;
            let window_sizes: Vec<u32> = serde_json::from_str(&window_sizes)
                .with_context(|| format!("Fenêtres invalides pour la prédiction {id}"))?;
            Ok(PredictionBatch { id, created_at, sets, training_size, window_sizes })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_draw(round: u32, numbers: [u8; 6]) -> Draw {
        Draw {
            round,
            date: format!("2024-01-{:02}", round % 28 + 1),
            numbers,
            bonus: 45,
        }
    }

    fn test_batch(id: i64) -> PredictionBatch {
        PredictionBatch {
            id,
            created_at: chrono::Utc.with_ymd_and_hms(2025, 1, 4, 20, 35, 0).unwrap(),
            sets: vec![PredictionSet([1, 2, 3, 4, 5, 6]), PredictionSet([7, 12, 19, 23, 31, 44])],
            training_size: 57,
            window_sizes: vec![50, 65],
        }
    }

    #[test]
    fn test_insert_and_count() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw(1, [1, 2, 3, 4, 5, 6])).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let inserted = insert_draw(&conn, &test_draw(1, [1, 2, 3, 4, 5, 6])).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw(1, [7, 8, 9, 10, 11, 12])).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_order() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw(1, [1, 2, 3, 4, 5, 6])).unwrap();
        insert_draw(&conn, &test_draw(3, [7, 8, 9, 10, 11, 12])).unwrap();
        insert_draw(&conn, &test_draw(2, [13, 14, 15, 16, 17, 18])).unwrap();

        let draws = fetch_all_draws(&conn).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].round, 3);
        assert_eq!(draws[1].round, 2);
        assert_eq!(draws[2].round, 1);
        assert_eq!(draws[0].numbers, [7, 8, 9, 10, 11, 12]);

        let last = fetch_last_draws(&conn, 2).unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(last[1].round, 2);
    }

    #[test]
    fn test_prediction_history_roundtrip() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_prediction(&conn, &test_batch(100)).unwrap();
        insert_prediction(&conn, &test_batch(200)).unwrap();

        let history = fetch_predictions(&conn, 10).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, 200);
        assert_eq!(history[1], test_batch(100));
    }

    #[test]
    fn test_prediction_same_id_not_overwritten() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_prediction(&conn, &test_batch(100)).unwrap();
        let mut other = test_batch(100);
        other.sets = vec![PredictionSet([40, 41, 42, 43, 44, 45])];
        assert!(insert_prediction(&conn, &other).is_err());

        let history = fetch_predictions(&conn, 10).unwrap();
        assert_eq!(history, vec![test_batch(100)]);
    }

    #[test]
    fn test_prediction_history_limit() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        for id in 1..=5 {
            insert_prediction(&conn, &test_batch(id)).unwrap();
        }
        let history = fetch_predictions(&conn, 3).unwrap();
        assert_eq!(history.iter().map(|b| b.id).collect::<Vec<_>>(), vec![5, 4, 3]);
    }
}
