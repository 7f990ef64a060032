use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, WageError};
use crate::loader::SourceSpec;
use crate::models::{SourceKind, ALL_SOURCES};
use crate::settings::{load_settings, resolve_data_dir, Sources};

pub const FIRST_YEAR: i32 = 1994;
pub const LAST_YEAR: i32 = 2023;

/// Fixed seed so every `demo` run writes the same files.
const SEED: u64 = 0x5eed_1994;

/// Sampling cadence, base value in FIRST_YEAR, yearly growth and jitter of each
/// sample series. Shaped after the FRED series they stand in for.
struct SampleShape {
    cadence: Cadence,
    base: f64,
    growth: f64,
    jitter: f64,
}

#[derive(Clone, Copy)]
enum Cadence {
    Annual,
    Quarterly,
    Monthly,
    Weekly,
}

fn shape(kind: SourceKind) -> SampleShape {
    match kind {
        SourceKind::Income => SampleShape { cadence: Cadence::Annual, base: 61_500.0, growth: 0.007, jitter: 0.015 },
        SourceKind::House => SampleShape { cadence: Cadence::Quarterly, base: 130_000.0, growth: 0.042, jitter: 0.03 },
        SourceKind::Chicken => SampleShape { cadence: Cadence::Monthly, base: 0.98, growth: 0.021, jitter: 0.03 },
        SourceKind::Gas => SampleShape { cadence: Cadence::Weekly, base: 1.08, growth: 0.036, jitter: 0.05 },
    }
}

fn observation_dates(year: i32, cadence: Cadence) -> Vec<NaiveDate> {
    let months: &[u32] = match cadence {
        Cadence::Annual => &[1],
        Cadence::Quarterly => &[1, 4, 7, 10],
        Cadence::Monthly => &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
        Cadence::Weekly => {
            let Some(mut day) = NaiveDate::from_weekday_of_month_opt(year, 1, Weekday::Mon, 1) else {
                return Vec::new();
            };
            let mut dates = Vec::new();
            while day.year() == year {
                dates.push(day);
                day += Duration::days(7);
            }
            return dates;
        }
    };
    months
        .iter()
        .filter_map(|&m| NaiveDate::from_ymd_opt(year, m, 1))
        .collect()
}

/// Deterministic sample observations for one series, FIRST_YEAR..=LAST_YEAR.
pub fn sample_series(kind: SourceKind, rng: &mut StdRng) -> Vec<(NaiveDate, f64)> {
    let shape = shape(kind);
    let mut rows = Vec::new();
    for year in FIRST_YEAR..=LAST_YEAR {
        let trend = shape.base * (1.0 + shape.growth).powi(year - FIRST_YEAR);
        for date in observation_dates(year, shape.cadence) {
            let noise = 1.0 + rng.gen_range(-shape.jitter..shape.jitter);
            rows.push((date, trend * noise));
        }
    }
    rows
}

fn write_series(path: &Path, spec: &SourceSpec, rows: &[(NaiveDate, f64)]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([spec.date_column.as_str(), spec.value_column.as_str()])?;
    for (date, value) in rows {
        let value = if *value >= 1000.0 {
            format!("{value:.0}")
        } else {
            format!("{value:.3}")
        };
        wtr.write_record([date.format("%Y-%m-%d").to_string(), value])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the four sample CSVs into `data_dir`. Returns the files written.
pub fn write_samples(
    data_dir: &Path,
    sources: &Sources,
    force: bool,
) -> Result<Vec<String>> {
    std::fs::create_dir_all(data_dir)?;
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut written = Vec::new();
    for &kind in ALL_SOURCES {
        let spec = sources.get(kind);
        // Generate even when skipping so each series keeps its random stream
        let rows = sample_series(kind, &mut rng);
        let path = data_dir.join(&spec.file);
        if path.exists() && !force {
            tracing::info!(file = %path.display(), "keeping existing file");
            continue;
        }
        write_series(&path, spec, &rows)?;
        written.push(spec.file.clone());
    }
    Ok(written)
}

pub fn run(data_dir: Option<&str>, force: bool) -> Result<()> {
    let settings = load_settings();
    let dir = resolve_data_dir(&settings, data_dir);
    let written = write_samples(&dir, &settings.sources, force)?;
    if written.is_empty() {
        return Err(WageError::Other(format!(
            "Data files already exist in {} (use --force to overwrite)",
            dir.display()
        )));
    }
    println!("Sample data written to {}", dir.display());
    for file in &written {
        println!("  {file}");
    }
    println!("  Years: {FIRST_YEAR}-{LAST_YEAR}");
    Ok(())
}
