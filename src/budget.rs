use serde::{Deserialize, Serialize};

use crate::dataset::DataContext;
use crate::fmt::money;
use crate::models::YearRecord;

// ---------------------------------------------------------------------------
// Assumptions
// ---------------------------------------------------------------------------

/// Share of the house price carried as a loan.
pub const DEFAULT_OCCUPANCY_FRACTION: f64 = 0.85;
/// Years the loan is spread over.
pub const DEFAULT_LOAN_TERM_YEARS: f64 = 30.0;
/// Fuel economy of the average car.
pub const DEFAULT_MILES_PER_GALLON: f64 = 25.0;
/// A meal uses about five ounces of chicken, roughly a third of a pound.
pub const DEFAULT_MEALS_PER_POUND: f64 = 3.0;

/// Policy constants behind the housing, gas and food figures. None of these
/// come from the data; they are editable in settings.json.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    pub occupancy_fraction: f64,
    pub loan_term_years: f64,
    pub miles_per_gallon: f64,
    pub meals_per_pound: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            occupancy_fraction: DEFAULT_OCCUPANCY_FRACTION,
            loan_term_years: DEFAULT_LOAN_TERM_YEARS,
            miles_per_gallon: DEFAULT_MILES_PER_GALLON,
            meals_per_pound: DEFAULT_MEALS_PER_POUND,
        }
    }
}

impl Assumptions {
    pub fn monthly_housing(&self, house_price: f64) -> f64 {
        if self.loan_term_years <= 0.0 {
            return 0.0;
        }
        house_price * self.occupancy_fraction / self.loan_term_years / 12.0
    }

    pub fn cost_per_mile(&self, gas_price: f64) -> f64 {
        if self.miles_per_gallon <= 0.0 {
            return 0.0;
        }
        gas_price / self.miles_per_gallon
    }

    pub fn cost_per_meal(&self, chicken_price: f64) -> f64 {
        if self.meals_per_pound <= 0.0 {
            return 0.0;
        }
        chicken_price / self.meals_per_pound
    }
}

// ---------------------------------------------------------------------------
// Breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Allocated,
    /// The selected year is not in the table: everything shows as savings.
    YearNotFound,
    /// Housing eats the whole income: everything shows as unallocated.
    NoDisposableIncome,
}

/// Monthly figures for one year and one set of slider values. Percentages are
/// shares of disposable income and `gas + food + savings + unallocated == 100`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetBreakdown {
    pub year: i32,
    pub status: BudgetStatus,
    pub monthly_income: f64,
    pub monthly_housing: f64,
    pub disposable_income: f64,
    pub cost_per_mile: f64,
    pub cost_per_meal: f64,
    pub gas_cost: f64,
    pub food_cost: f64,
    pub savings: f64,
    pub gas_percent: f64,
    pub food_percent: f64,
    pub savings_percent: f64,
    pub unallocated_percent: f64,
}

impl BudgetBreakdown {
    fn year_not_found(year: i32) -> Self {
        Self {
            year,
            status: BudgetStatus::YearNotFound,
            monthly_income: 0.0,
            monthly_housing: 0.0,
            disposable_income: 0.0,
            cost_per_mile: 0.0,
            cost_per_meal: 0.0,
            gas_cost: 0.0,
            food_cost: 0.0,
            savings: 0.0,
            gas_percent: 0.0,
            food_percent: 0.0,
            savings_percent: 100.0,
            unallocated_percent: 0.0,
        }
    }

    /// Sum of the shares, counted in the hundredths they are held at.
    pub fn total_percent(&self) -> f64 {
        [
            self.gas_percent,
            self.food_percent,
            self.savings_percent,
            self.unallocated_percent,
        ]
        .iter()
        .map(|p| (p * SHARE_STEPS).round())
        .sum::<f64>()
            / SHARE_STEPS
    }
}

/// Shares are held in hundredths of a percent.
const SHARE_STEPS: f64 = 100.0;

/// Bar and legend labels show tenths of a percent.
const LABEL_STEPS: f64 = 10.0;

/// Round gas and food to `steps` per percent and give savings the rest, so the
/// three always total 100 at that precision.
fn quantize_shares(gas_percent: f64, food_percent: f64, steps: f64) -> (f64, f64, f64) {
    let whole = 100.0 * steps;
    let gas = (gas_percent * steps).round().clamp(0.0, whole);
    let food = (food_percent * steps).round().clamp(0.0, whole - gas);
    let savings = whole - gas - food;
    (gas / steps, food / steps, savings / steps)
}

pub fn compute_budget(
    ctx: &DataContext,
    year: i32,
    miles: f64,
    meals: f64,
    assumptions: &Assumptions,
) -> BudgetBreakdown {
    match ctx.get(year) {
        Some(record) => compute_for_record(record, miles, meals, assumptions),
        None => {
            tracing::debug!(year, "year not in table, returning neutral budget");
            BudgetBreakdown::year_not_found(year)
        }
    }
}

pub fn compute_for_record(
    record: &YearRecord,
    miles: f64,
    meals: f64,
    assumptions: &Assumptions,
) -> BudgetBreakdown {
    let monthly_income = record.income / 12.0;
    let monthly_housing = assumptions.monthly_housing(record.house);
    let disposable_income = (monthly_income - monthly_housing).max(0.0);
    let cost_per_mile = assumptions.cost_per_mile(record.gas);
    let cost_per_meal = assumptions.cost_per_meal(record.chicken);

    if disposable_income <= 0.0 {
        return BudgetBreakdown {
            year: record.year,
            status: BudgetStatus::NoDisposableIncome,
            monthly_income,
            monthly_housing,
            disposable_income: 0.0,
            cost_per_mile,
            cost_per_meal,
            gas_cost: 0.0,
            food_cost: 0.0,
            savings: 0.0,
            gas_percent: 0.0,
            food_percent: 0.0,
            savings_percent: 0.0,
            unallocated_percent: 100.0,
        };
    }

    let gas_cost = miles.max(0.0) * cost_per_mile;
    let food_cost = meals.max(0.0) * cost_per_meal;

    let mut gas_percent = (gas_cost / disposable_income * 100.0).clamp(0.0, 100.0);
    let mut food_percent = (food_cost / disposable_income * 100.0).clamp(0.0, 100.0);
    let spent = gas_percent + food_percent;
    if spent > 100.0 {
        // Overspending: keep the gas/food ratio and fill exactly 100
        gas_percent = gas_percent / spent * 100.0;
        food_percent = 100.0 - gas_percent;
    }
    let (gas_percent, food_percent, savings_percent) =
        quantize_shares(gas_percent, food_percent, SHARE_STEPS);

    BudgetBreakdown {
        year: record.year,
        status: BudgetStatus::Allocated,
        monthly_income,
        monthly_housing,
        disposable_income,
        cost_per_mile,
        cost_per_meal,
        gas_cost,
        food_cost,
        savings: (disposable_income - gas_cost - food_cost).max(0.0),
        gas_percent,
        food_percent,
        savings_percent,
        unallocated_percent: 0.0,
    }
}

/// Monthly income for the year as a dollar string; `$0.00` when the year is
/// missing.
pub fn starting_amount(ctx: &DataContext, year: i32) -> String {
    money(ctx.get(year).map(|r| r.income / 12.0).unwrap_or(0.0))
}

// ---------------------------------------------------------------------------
// Bar segments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Chicken,
    Gas,
    Savings,
    Unallocated,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Chicken => "Chicken",
            Self::Gas => "Gas",
            Self::Savings => "Savings",
            Self::Unallocated => "Unallocated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    pub category: Category,
    pub label: &'static str,
    pub percent: f64,
    /// Monthly dollars behind the segment.
    pub amount: f64,
}

impl BarSegment {
    fn new(category: Category, percent: f64, amount: f64) -> Self {
        Self {
            category,
            label: category.label(),
            percent,
            amount,
        }
    }
}

/// Segments of the stacked allocation bar, largest first. Ties keep the order
/// chicken, gas, savings. Percentages are rounded to label precision with
/// savings absorbing the remainder, so the labels add up to 100.0.
pub fn bar_segments(breakdown: &BudgetBreakdown) -> Vec<BarSegment> {
    if breakdown.status == BudgetStatus::NoDisposableIncome {
        return vec![BarSegment::new(
            Category::Unallocated,
            breakdown.unallocated_percent,
            breakdown.monthly_income,
        )];
    }
    let (gas_percent, food_percent, savings_percent) =
        quantize_shares(breakdown.gas_percent, breakdown.food_percent, LABEL_STEPS);
    let mut segments = vec![
        BarSegment::new(Category::Chicken, food_percent, breakdown.food_cost),
        BarSegment::new(Category::Gas, gas_percent, breakdown.gas_cost),
        BarSegment::new(Category::Savings, savings_percent, breakdown.savings),
    ];
    segments.sort_by(|a, b| b.percent.total_cmp(&a.percent));
    segments
}

// ---------------------------------------------------------------------------
// Savings projection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub start_year: i32,
    pub years_requested: u32,
    /// Table years inside the window; gaps and years past the data are skipped.
    pub years_covered: u32,
    pub ending_amount: f64,
}

/// Savings accumulated over `years` calendar years starting at `start_year`,
/// each year priced with its own data.
pub fn project_savings(
    ctx: &DataContext,
    start_year: i32,
    years: u32,
    miles: f64,
    meals: f64,
    assumptions: &Assumptions,
) -> Projection {
    let end_year = start_year.saturating_add(years.min(i32::MAX as u32) as i32);
    let mut years_covered = 0;
    let mut ending_amount = 0.0;
    for record in ctx.records().iter().filter(|r| r.year >= start_year && r.year < end_year) {
        let breakdown = compute_for_record(record, miles, meals, assumptions);
        ending_amount += breakdown.savings * 12.0;
        years_covered += 1;
    }
    Projection {
        start_year,
        years_requested: years,
        years_covered,
        ending_amount,
    }
}
