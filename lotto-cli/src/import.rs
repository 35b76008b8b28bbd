use anyhow::{Context, Result, bail};
use lotto_db::rusqlite::Connection;
use std::path::Path;

use lotto_db::db::insert_draw;
use lotto_db::models::{Draw, validate_draw};

/// Colonnes attendues : tour, date, 6 numéros, bonus.
const COLUMN_COUNT: usize = 9;

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    if record.len() < COLUMN_COUNT {
        bail!("{} colonnes au lieu de {}", record.len(), COLUMN_COUNT);
    }

    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let round_str = get(0)?;
    let round: u32 = round_str
        .replace(',', "")
        .parse()
        .with_context(|| format!("Tour invalide : '{}'", round_str))?;
    if round == 0 {
        bail!("Tour invalide : 0");
    }

    let date = parse_date(&get(1)?)?;

    let numbers: [u8; 6] = [
        get_u8(2)?,
        get_u8(3)?,
        get_u8(4)?,
        get_u8(5)?,
        get_u8(6)?,
        get_u8(7)?,
    ];
    let bonus = get_u8(8)?;

    validate_draw(&numbers, bonus)?;

    Ok(Draw { round, date, numbers, bonus })
}

/// Accepte AAAA.MM.JJ, AAAA/MM/JJ, AAAA-MM-JJ ou JJ/MM/AAAA ; renvoie AAAA-MM-JJ.
pub fn parse_date(raw: &str) -> Result<String> {
    let parts: Vec<&str> = raw
        .trim()
        .trim_end_matches('.')
        .split(['.', '/', '-'])
        .map(|p| p.trim())
        .collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit())) {
        bail!("Format de date invalide: '{}'", raw);
    }
    let (y, m, d) = if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else if parts[2].len() == 4 {
        (parts[2], parts[1], parts[0])
    } else {
        bail!("Format de date invalide: '{}'", raw);
    };
    Ok(format!("{}-{:0>2}-{:0>2}", y, m, d))
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path, delimiter: u8) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => {
                match parse_record(&record) {
                    Ok(draw) => {
                        match insert_draw(&tx, &draw) {
                            Ok(true) => result.inserted += 1,
                            Ok(false) => result.skipped += 1,
                            Err(e) => {
                                log::warn!("Erreur insertion tirage {}: {}", result.total_records, e);
                                result.errors += 1;
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!("Erreur parsing ligne {}: {:#}", result.total_records, e);
                        result.errors += 1;
                    }
                }
            }
            Err(e) => {
                log::warn!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}
