use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Result, WageError};
use crate::loader::{load_series, Series, YearlyAggregate};
use crate::models::{SourceKind, YearRecord, ALL_SOURCES};
use crate::settings::Sources;

/// The joined, read-only table every metric is computed from.
#[derive(Debug, Clone)]
pub struct DataContext {
    records: Vec<YearRecord>,
}

impl DataContext {
    /// Inner-join the four series on year. Years missing from any source are
    /// dropped.
    pub fn join(income: &Series, house: &Series, chicken: &Series, gas: &Series) -> Result<Self> {
        let mut records = Vec::new();
        for (&year, &income_value) in &income.by_year {
            let (Some(&house_value), Some(&chicken_value), Some(&gas_value)) = (
                house.by_year.get(&year),
                chicken.by_year.get(&year),
                gas.by_year.get(&year),
            ) else {
                tracing::debug!(year, "dropping year not present in every source");
                continue;
            };
            records.push(YearRecord {
                year,
                income: income_value,
                house: house_value,
                chicken: chicken_value,
                gas: gas_value,
            });
        }
        for series in [income, house, chicken, gas] {
            tracing::debug!(
                source = %series.kind,
                years = series.by_year.len(),
                dropped = series.by_year.len().saturating_sub(records.len()),
                "joined series"
            );
        }
        if records.is_empty() {
            return Err(WageError::EmptyJoin);
        }
        Ok(Self { records })
    }

    /// Load all four sources from `data_dir` and join them.
    pub fn load(data_dir: &Path, sources: &Sources, aggregate: YearlyAggregate) -> Result<Self> {
        let mut loaded: BTreeMap<SourceKind, Series> = BTreeMap::new();
        for &kind in ALL_SOURCES {
            loaded.insert(kind, load_series(data_dir, kind, sources.get(kind), aggregate)?);
        }
        let ctx = Self::join(
            &loaded[&SourceKind::Income],
            &loaded[&SourceKind::House],
            &loaded[&SourceKind::Chicken],
            &loaded[&SourceKind::Gas],
        )?;
        if let Some((first, last)) = ctx.year_range() {
            tracing::info!(years = ctx.len(), first, last, "joined data sources");
        }
        Ok(ctx)
    }

    /// Build directly from records. Records are sorted and later duplicates of a
    /// year are discarded.
    #[cfg(test)]
    pub fn from_records(mut records: Vec<YearRecord>) -> Self {
        records.sort_by_key(|r| r.year);
        records.dedup_by_key(|r| r.year);
        Self { records }
    }

    pub fn get(&self, year: i32) -> Option<&YearRecord> {
        self.records
            .binary_search_by_key(&year, |r| r.year)
            .ok()
            .map(|i| &self.records[i])
    }

    pub fn records(&self) -> &[YearRecord] {
        &self.records
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.records.iter().map(|r| r.year)
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        Some((self.records.first()?.year, self.records.last()?.year))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Next table year after `year` (`delta >= 0`) or before it, skipping gaps
    /// in the data.
    pub fn step_year(&self, year: i32, delta: i32) -> Option<i32> {
        if delta >= 0 {
            self.years().find(|&y| y > year)
        } else {
            self.years().filter(|&y| y < year).last()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(kind: SourceKind, values: &[(i32, f64)]) -> Series {
        Series {
            kind,
            by_year: values.iter().copied().collect(),
        }
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_join_is_inner() {
        let income = series(SourceKind::Income, &[(2000, 41990.0), (2001, 42228.0), (2002, 42409.0)]);
        let house = series(SourceKind::House, &[(2001, 175000.0), (2002, 187000.0)]);
        let chicken = series(SourceKind::Chicken, &[(2000, 1.05), (2001, 1.08), (2002, 1.05)]);
        let gas = series(SourceKind::Gas, &[(2001, 1.45), (2002, 1.14), (2003, 1.48)]);
        let ctx = DataContext::join(&income, &house, &chicken, &gas).unwrap();
        assert_eq!(ctx.years().collect::<Vec<_>>(), vec![2001, 2002]);
        assert_eq!(ctx.year_range(), Some((2001, 2002)));
    }

    #[test]
    fn test_join_round_trips_source_values() {
        let income = series(SourceKind::Income, &[(2010, 49276.0), (2011, 50054.0)]);
        let house = series(SourceKind::House, &[(2010, 222900.0), (2011, 226900.0)]);
        let chicken = series(SourceKind::Chicken, &[(2010, 1.27), (2011, 1.27)]);
        let gas = series(SourceKind::Gas, &[(2010, 2.72), (2011, 3.07)]);
        let ctx = DataContext::join(&income, &house, &chicken, &gas).unwrap();
        let rec = ctx.get(2011).unwrap();
        assert_eq!(rec.income, 50054.0);
        assert_eq!(rec.house, 226900.0);
        assert_eq!(rec.chicken, 1.27);
        assert_eq!(rec.gas, 3.07);
    }

    #[test]
    fn test_join_without_common_years_fails() {
        let income = series(SourceKind::Income, &[(2000, 1.0)]);
        let house = series(SourceKind::House, &[(2001, 1.0)]);
        let chicken = series(SourceKind::Chicken, &[(2000, 1.0)]);
        let gas = series(SourceKind::Gas, &[(2000, 1.0)]);
        assert!(matches!(
            DataContext::join(&income, &house, &chicken, &gas),
            Err(WageError::EmptyJoin)
        ));
    }

    #[test]
    fn test_load_from_fred_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "income.csv", "observation_date,MEHOINUSA672N\n2019-01-01,68703\n2020-01-01,67521\n");
        write(
            dir.path(),
            "house.csv",
            "observation_date,MSPUS\n2019-01-01,313000\n2019-04-01,322500\n2020-01-01,329000\n",
        );
        write(
            dir.path(),
            "chicken.csv",
            "observation_date,APU0000706111\n2019-01-01,1.49\n2019-02-01,1.51\n2020-01-01,1.58\n",
        );
        write(
            dir.path(),
            "gas.csv",
            "observation_date,GASREGCOVW\n2019-01-07,2.24\n2019-01-14,2.21\n2020-01-06,2.58\n",
        );
        let ctx = DataContext::load(dir.path(), &Sources::default(), YearlyAggregate::First).unwrap();
        assert_eq!(ctx.len(), 2);
        let rec = ctx.get(2019).unwrap();
        assert_eq!(rec.house, 313000.0);
        assert_eq!(rec.chicken, 1.49);
        assert_eq!(rec.gas, 2.24);
    }

    #[test]
    fn test_load_missing_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "income.csv", "observation_date,MEHOINUSA672N\n2019-01-01,68703\n");
        assert!(matches!(
            DataContext::load(dir.path(), &Sources::default(), YearlyAggregate::First),
            Err(WageError::MissingSource(_))
        ));
    }

    #[test]
    fn test_get_and_step_year() {
        let rec = |year| YearRecord { year, income: 1.0, house: 1.0, chicken: 1.0, gas: 1.0 };
        let ctx = DataContext::from_records(vec![rec(2005), rec(2001), rec(2003), rec(2003)]);
        assert_eq!(ctx.len(), 3);
        assert!(ctx.get(2002).is_none());
        assert_eq!(ctx.get(2003).map(|r| r.year), Some(2003));
        assert_eq!(ctx.step_year(2001, 1), Some(2003));
        assert_eq!(ctx.step_year(2003, -1), Some(2001));
        assert_eq!(ctx.step_year(2005, 1), None);
        assert_eq!(ctx.step_year(2001, -1), None);
        assert_eq!(ctx.step_year(2002, 1), Some(2003));
    }
}
