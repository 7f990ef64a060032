use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::budget::{Assumptions, BudgetStatus};
use crate::charts::{budget_view, build_charts, BudgetView};
use crate::cli::load_context;
use crate::error::Result;
use crate::fmt::{money, percent};
use crate::models::UserSelection;

pub fn run(data_dir: Option<&str>, selection: UserSelection, json: bool) -> Result<()> {
    let (settings, ctx) = load_context(data_dir)?;
    if json {
        let charts = build_charts(&ctx, &selection, &settings.assumptions)?;
        println!("{}", serde_json::to_string_pretty(&charts)?);
        return Ok(());
    }
    let view = budget_view(&ctx, &selection, &settings.assumptions);
    println!("{}", format_budget(&view, &settings.assumptions));
    Ok(())
}

pub fn format_budget(view: &BudgetView, assumptions: &Assumptions) -> String {
    let b = &view.breakdown;
    let mut out = format!("Monthly Budget Breakdown {}\n", b.year);

    match b.status {
        BudgetStatus::YearNotFound => {
            out.push_str(&format!(
                "{}\nStart amount: {}  (100% savings)\n",
                format!("No data for {}.", b.year).yellow(),
                view.starting_amount
            ));
            return out;
        }
        BudgetStatus::NoDisposableIncome => {
            let mut table = Table::new();
            table.set_header(vec!["", "Monthly"]);
            table.add_row(vec![Cell::new("Start amount"), Cell::new(&view.starting_amount)]);
            table.add_row(vec![Cell::new("Housing"), Cell::new(money(b.monthly_housing))]);
            out.push_str(&format!("{table}\n"));
            out.push_str(&format!(
                "{}\n",
                "Housing takes the whole income: nothing left to allocate.".red().bold()
            ));
            return out;
        }
        BudgetStatus::Allocated => {}
    }

    let mut summary = Table::new();
    summary.set_header(vec!["", "Monthly"]);
    summary.add_row(vec![Cell::new("Start amount"), Cell::new(&view.starting_amount)]);
    summary.add_row(vec![Cell::new("Housing"), Cell::new(money(b.monthly_housing))]);
    summary.add_row(vec![
        Cell::new("Disposable income".bold()),
        Cell::new(money(b.disposable_income)),
    ]);
    summary.add_row(vec![
        Cell::new(format!("Cost per mile ({} mpg)", assumptions.miles_per_gallon)),
        Cell::new(money(b.cost_per_mile)),
    ]);
    summary.add_row(vec![
        Cell::new(format!("Cost per meal ({} per lb)", assumptions.meals_per_pound)),
        Cell::new(money(b.cost_per_meal)),
    ]);
    out.push_str(&format!("{summary}\n"));

    let mut allocation = Table::new();
    allocation.set_header(vec!["Category", "Amount", "%"]);
    for segment in &view.bar {
        allocation.add_row(vec![
            Cell::new(segment.label),
            Cell::new(money(segment.amount)),
            Cell::new(percent(segment.percent)),
        ]);
    }
    out.push_str(&format!("{allocation}\n"));

    let p = &view.projection;
    if p.years_requested > 1 {
        out.push_str(&format!(
            "Ending amount after {} year(s) of data: {}\n",
            p.years_covered,
            money(p.ending_amount)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DataContext;
    use crate::models::YearRecord;

    fn ctx() -> DataContext {
        DataContext::from_records(vec![
            YearRecord { year: 2020, income: 60000.0, house: 300000.0, chicken: 3.0, gas: 3.0 },
            YearRecord { year: 2021, income: 12000.0, house: 900000.0, chicken: 3.0, gas: 3.0 },
        ])
    }

    fn selection(year: i32, planning_years: u32) -> UserSelection {
        UserSelection { year, miles: 100.0, meals: 30.0, planning_years }
    }

    #[test]
    fn test_format_allocated() {
        let a = Assumptions::default();
        let view = budget_view(&ctx(), &selection(2020, 1), &a);
        let s = format_budget(&view, &a);
        assert!(s.starts_with("Monthly Budget Breakdown 2020\n"));
        assert!(s.contains("$5,000.00"));
        assert!(s.contains("$708.33"));
        assert!(s.contains("$4,291.67"));
        assert!(s.contains("99.0%"));
        assert!(s.contains("Chicken"));
        assert!(!s.contains("Ending amount"));
    }

    #[test]
    fn test_format_projection() {
        let a = Assumptions::default();
        let view = budget_view(&ctx(), &selection(2020, 5), &a);
        let s = format_budget(&view, &a);
        assert!(s.contains("Ending amount after 2 year(s)"));
    }

    #[test]
    fn test_format_missing_year() {
        let a = Assumptions::default();
        let view = budget_view(&ctx(), &selection(1990, 1), &a);
        let s = format_budget(&view, &a);
        assert!(s.contains("No data for 1990."));
        assert!(s.contains("$0.00"));
    }

    #[test]
    fn test_format_no_disposable_income() {
        let a = Assumptions::default();
        let view = budget_view(&ctx(), &selection(2021, 1), &a);
        let s = format_budget(&view, &a);
        assert!(s.contains("nothing left to allocate"));
    }
}
