use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WageError};
use crate::models::{Observation, SourceKind};

/// FRED writes a lone dot for observations it has no value for.
const FRED_MISSING: &str = ".";

// ---------------------------------------------------------------------------
// Source layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub file: String,
    pub date_column: String,
    pub value_column: String,
}

impl SourceSpec {
    /// Layout of a CSV downloaded straight from FRED.
    pub fn fred(kind: SourceKind) -> Self {
        Self {
            file: kind.default_file(),
            date_column: "observation_date".to_string(),
            value_column: kind.default_column().to_string(),
        }
    }
}

/// How several observations falling in the same calendar year collapse to one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearlyAggregate {
    /// Earliest observation of the year.
    #[default]
    First,
    Mean,
}

/// One source reduced to at most one value per year.
#[derive(Debug, Clone)]
pub struct Series {
    pub kind: SourceKind,
    pub by_year: BTreeMap<i32, f64>,
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Parse a date cell into (year, day-of-year). Accepts ISO dates and bare
/// four-digit years.
pub fn parse_year(raw: &str) -> Option<(i32, u32)> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some((date.year(), date.ordinal()));
    }
    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        return raw.parse().ok().map(|y| (y, 0));
    }
    None
}

/// Returns `Some(None)` for a blank or FRED-missing cell, `None` when the cell
/// is not a number at all.
pub fn parse_value(raw: &str) -> Option<Option<f64>> {
    let s = raw.trim();
    if s.is_empty() || s == FRED_MISSING {
        return Some(None);
    }
    let s = s.replace([',', '$'], "");
    s.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

fn column_index(headers: &csv::StringRecord, name: &str, file: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().trim_start_matches('\u{feff}') == name)
        .ok_or_else(|| WageError::MissingColumn {
            file: file.to_string(),
            column: name.to_string(),
        })
}

pub fn read_observations(file_path: &Path, spec: &SourceSpec) -> Result<Vec<Observation>> {
    if !file_path.exists() {
        return Err(WageError::MissingSource(file_path.to_path_buf()));
    }
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&spec.file)
        .to_string();

    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let headers = rdr.headers()?.clone();
    let idx_date = column_index(&headers, &spec.date_column, &file_name)?;
    let idx_value = column_index(&headers, &spec.value_column, &file_name)?;

    let mut observations = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let date_cell = record.get(idx_date).unwrap_or("");
        if date_cell.trim().is_empty() && record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let (year, ordinal) = parse_year(date_cell).ok_or_else(|| WageError::BadDate {
            file: file_name.clone(),
            line,
            value: date_cell.to_string(),
        })?;
        let value_cell = record.get(idx_value).unwrap_or("");
        let value = parse_value(value_cell).ok_or_else(|| WageError::BadValue {
            file: file_name.clone(),
            line,
            value: value_cell.to_string(),
        })?;
        let Some(value) = value else {
            tracing::debug!(file = %file_name, line, "skipping missing observation");
            continue;
        };
        observations.push(Observation {
            year,
            ordinal,
            value,
        });
    }
    Ok(observations)
}

pub fn reduce_by_year(observations: &[Observation], aggregate: YearlyAggregate) -> BTreeMap<i32, f64> {
    let mut grouped: BTreeMap<i32, Vec<&Observation>> = BTreeMap::new();
    for obs in observations {
        grouped.entry(obs.year).or_default().push(obs);
    }
    grouped
        .into_iter()
        .map(|(year, mut group)| {
            let value = match aggregate {
                YearlyAggregate::First => {
                    // Stable sort keeps file order for same-day rows
                    group.sort_by_key(|o| o.ordinal);
                    group[0].value
                }
                YearlyAggregate::Mean => {
                    group.iter().map(|o| o.value).sum::<f64>() / group.len() as f64
                }
            };
            (year, value)
        })
        .collect()
}

pub fn load_series(
    data_dir: &Path,
    kind: SourceKind,
    spec: &SourceSpec,
    aggregate: YearlyAggregate,
) -> Result<Series> {
    let path = data_dir.join(&spec.file);
    let observations = read_observations(&path, spec)?;
    let by_year = reduce_by_year(&observations, aggregate);
    tracing::info!(
        source = %kind,
        file = %path.display(),
        observations = observations.len(),
        years = by_year.len(),
        "loaded series"
    );
    Ok(Series { kind, by_year })
}
