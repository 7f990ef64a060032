use serde::Serialize;

use crate::dataset::DataContext;
use crate::error::{Result, WageError};
use crate::models::{SourceKind, ALL_SOURCES};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub raw: f64,
    /// ln(raw) rescaled so the series' minimum is 0 and maximum is 1.
    pub normalized: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub kind: SourceKind,
    pub name: &'static str,
    pub points: Vec<TrendPoint>,
}

/// Every series on one shared 0..1 axis, so income in tens of thousands and gas
/// in dollars can be compared by shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub first_year: i32,
    pub last_year: i32,
    pub series: Vec<TrendSeries>,
}

/// Natural log then min-max normalize. A flat series maps to all zeros.
pub fn log_min_max(values: &[(i32, f64)], series: &str) -> Result<Vec<TrendPoint>> {
    let mut logs = Vec::with_capacity(values.len());
    for &(year, value) in values {
        if value <= 0.0 || !value.is_finite() {
            return Err(WageError::NonPositiveSeries {
                series: series.to_string(),
                year,
                value,
            });
        }
        logs.push(value.ln());
    }
    let min = logs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    Ok(values
        .iter()
        .zip(&logs)
        .map(|(&(year, raw), &ln)| TrendPoint {
            year,
            raw,
            normalized: if span > 0.0 { (ln - min) / span } else { 0.0 },
        })
        .collect())
}

pub fn trend_chart(ctx: &DataContext) -> Result<TrendChart> {
    let (first_year, last_year) = ctx.year_range().ok_or(WageError::EmptyJoin)?;
    let mut series = Vec::with_capacity(ALL_SOURCES.len());
    for &kind in ALL_SOURCES {
        let values: Vec<(i32, f64)> = ctx.records().iter().map(|r| (r.year, r.value(kind))).collect();
        series.push(TrendSeries {
            kind,
            name: kind.label(),
            points: log_min_max(&values, kind.key())?,
        });
    }
    Ok(TrendChart {
        first_year,
        last_year,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::YearRecord;

    fn ctx() -> DataContext {
        DataContext::from_records(vec![
            YearRecord { year: 1995, income: 34076.0, house: 133900.0, chicken: 1.05, gas: 1.09 },
            YearRecord { year: 2005, income: 46326.0, house: 232500.0, chicken: 1.06, gas: 1.78 },
            YearRecord { year: 2015, income: 56516.0, house: 289200.0, chicken: 1.48, gas: 2.22 },
        ])
    }

    #[test]
    fn test_each_series_spans_zero_to_one() {
        let chart = trend_chart(&ctx()).unwrap();
        assert_eq!(chart.series.len(), 4);
        assert_eq!((chart.first_year, chart.last_year), (1995, 2015));
        for s in &chart.series {
            let norm: Vec<f64> = s.points.iter().map(|p| p.normalized).collect();
            let min = norm.iter().copied().fold(f64::INFINITY, f64::min);
            let max = norm.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(min, 0.0, "{}", s.name);
            assert!((max - 1.0).abs() < 1e-12, "{}", s.name);
        }
    }

    #[test]
    fn test_log_scaling_midpoint() {
        // ln-equidistant values: 1, e, e^2 -> 0, 0.5, 1
        let e = std::f64::consts::E;
        let points = log_min_max(&[(1, 1.0), (2, e), (3, e * e)], "x").unwrap();
        assert!((points[1].normalized - 0.5).abs() < 1e-12);
        assert_eq!(points[2].raw, e * e);
    }

    #[test]
    fn test_flat_series_is_zero() {
        let points = log_min_max(&[(1, 2.5), (2, 2.5)], "flat").unwrap();
        assert!(points.iter().all(|p| p.normalized == 0.0));
    }

    #[test]
    fn test_non_positive_value_is_an_error() {
        let err = log_min_max(&[(2001, 1.0), (2002, 0.0)], "gas").unwrap_err();
        match err {
            WageError::NonPositiveSeries { series, year, value } => {
                assert_eq!(series, "gas");
                assert_eq!(year, 2002);
                assert_eq!(value, 0.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_trend_chart_reports_offending_series() {
        let ctx = DataContext::from_records(vec![
            YearRecord { year: 2000, income: 1.0, house: 1.0, chicken: -1.0, gas: 1.0 },
        ]);
        assert!(matches!(
            trend_chart(&ctx),
            Err(WageError::NonPositiveSeries { ref series, .. }) if series == "chicken"
        ));
    }
}
