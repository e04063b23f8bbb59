// src/file/export.rs
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context, anyhow};
use csv::Reader;
use serde_json::{Number, Value};
use tempfile::NamedTempFile;

use crate::analysis::{Row, Section};

/// Writes a downloaded export into `dir` as `<section>_analysis.csv`.
///
/// The bytes go to a temporary file in the same directory first; it is
/// renamed into place on success and deleted when dropped on any error.
pub fn save_export(dir: &Path, section: Section, bytes: &[u8]) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(anyhow!("Download directory does not exist: {}", dir.display()));
    }

    let target = dir.join(section.file_name());
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    temp.write_all(bytes)?;
    temp.flush()?;

    temp.persist(&target)
        .map_err(|e| anyhow!("Failed to save {}: {}", target.display(), e.error))?;
    Ok(target)
}

/// Reads an exported CSV back into rows. Cells that parse as integers or
/// floats become numbers, empty cells null, anything else stays a string.
/// Columns that held strings in `sent` are kept as strings, so identifiers
/// like `"007"` survive the trip.
pub fn read_exported_csv(path: &Path, sent: &[Row]) -> Result<Vec<Row>> {
    let content = fs::read(path)
        .with_context(|| format!("Failed to read export file: {}", path.display()))?;
    parse_csv_rows(&content, sent)
}

pub fn parse_csv_rows(content: &[u8], sent: &[Row]) -> Result<Vec<Row>> {
    let mut reader = Reader::from_reader(content);
    let headers = reader.headers()?.clone();
    let text_columns: HashSet<&str> = headers
        .iter()
        .filter(|name| {
            sent.iter()
                .find_map(|row| row.get(*name).filter(|v| !v.is_null()))
                .is_some_and(Value::is_string)
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.to_string(), cell_value(cell, text_columns.contains(name))))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn cell_value(cell: &str, text: bool) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if text {
        return Value::String(cell.to_string());
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn saves_under_section_file_name() {
        let dir = tempdir().unwrap();
        let path = save_export(dir.path(), Section::BestHours, b"pickup_hour,avg_fare\n5,20.5\n").unwrap();

        assert_eq!(path, dir.path().join("best_hours_analysis.csv"));
        assert_eq!(fs::read(&path).unwrap(), b"pickup_hour,avg_fare\n5,20.5\n");
        // only the final file remains
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn overwrites_previous_export() {
        let dir = tempdir().unwrap();
        save_export(dir.path(), Section::BestZones, b"old").unwrap();
        let path = save_export(dir.path(), Section::BestZones, b"new").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"new");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(save_export(&missing, Section::BestZones, b"x").is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn cells_are_typed_back() {
        let rows = parse_csv_rows(b"zone,avg_fare,trip_count,note\nJFK,12.345,42,\n", &[]).unwrap();
        assert_eq!(
            Value::Object(rows[0].clone()),
            json!({"zone": "JFK", "avg_fare": 12.345, "trip_count": 42, "note": null})
        );
    }

    #[test]
    fn string_columns_stay_strings() {
        let sent: Vec<Row> = vec![
            serde_json::from_value(json!({"zone_id": null, "avg_fare": 9.5})).unwrap(),
            serde_json::from_value(json!({"zone_id": "007", "avg_fare": 12.0})).unwrap(),
        ];
        let rows = parse_csv_rows(b"zone_id,avg_fare\n,9.5\n007,12\n132,3\n", &sent).unwrap();

        assert_eq!(rows[0]["zone_id"], Value::Null);
        assert_eq!(rows[1]["zone_id"], json!("007"));
        assert_eq!(rows[2]["zone_id"], json!("132"));
        assert_eq!(rows[2]["avg_fare"], json!(3));
    }
}
