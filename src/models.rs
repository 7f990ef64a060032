use std::fmt;

use serde::{Deserialize, Serialize};

/// The four economic series the dashboard is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Income,
    House,
    Chicken,
    Gas,
}

pub const ALL_SOURCES: &[SourceKind] = &[
    SourceKind::Income,
    SourceKind::House,
    SourceKind::Chicken,
    SourceKind::Gas,
];

impl SourceKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::House => "house",
            Self::Chicken => "chicken",
            Self::Gas => "gas",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Household income",
            Self::House => "House price",
            Self::Chicken => "Chicken ($/lb)",
            Self::Gas => "Gas ($/gal)",
        }
    }

    /// FRED series id of the default download for this source.
    pub fn default_column(&self) -> &'static str {
        match self {
            Self::Income => "MEHOINUSA672N",
            Self::House => "MSPUS",
            Self::Chicken => "APU0000706111",
            Self::Gas => "GASREGCOVW",
        }
    }

    pub fn default_file(&self) -> String {
        format!("{}.csv", self.key())
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One parsed CSV row, already keyed by calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub year: i32,
    /// Day of year ordinal used to order observations within a year; 0 when the
    /// source only carries a year.
    pub ordinal: u32,
    pub value: f64,
}

/// One joined row of all four series for a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: i32,
    pub income: f64,
    pub house: f64,
    pub chicken: f64,
    pub gas: f64,
}

impl YearRecord {
    pub fn value(&self, kind: SourceKind) -> f64 {
        match kind {
            SourceKind::Income => self.income,
            SourceKind::House => self.house,
            SourceKind::Chicken => self.chicken,
            SourceKind::Gas => self.gas,
        }
    }
}

/// Transient input state owned by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserSelection {
    pub year: i32,
    pub miles: f64,
    pub meals: f64,
    pub planning_years: u32,
}
