use comfy_table::{Cell, CellAlignment, Table};

use crate::budget::Assumptions;
use crate::cli::load_context;
use crate::dataset::DataContext;
use crate::error::{Result, WageError};
use crate::fmt::{dollars, money};

pub fn run(data_dir: Option<&str>, year: Option<i32>) -> Result<()> {
    let (settings, ctx) = load_context(data_dir)?;
    if let Some(y) = year {
        if ctx.get(y).is_none() {
            let (first, last) = ctx.year_range().unwrap_or((y, y));
            return Err(WageError::Other(format!(
                "No data for {y} (table covers {first}-{last})"
            )));
        }
    }
    println!("{}", format_table(&ctx, year, &settings.assumptions));
    Ok(())
}

pub fn format_table(ctx: &DataContext, year: Option<i32>, assumptions: &Assumptions) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        "Year",
        "Income",
        "House",
        "Chicken/lb",
        "Gas/gal",
        "Income/mo",
        "Housing/mo",
        "Per mile",
        "Per meal",
    ]);
    for r in ctx.records().iter().filter(|r| year.map_or(true, |y| r.year == y)) {
        let row = vec![
            Cell::new(r.year),
            Cell::new(dollars(r.income)),
            Cell::new(dollars(r.house)),
            Cell::new(money(r.chicken)),
            Cell::new(money(r.gas)),
            Cell::new(money(r.income / 12.0)),
            Cell::new(money(assumptions.monthly_housing(r.house))),
            Cell::new(money(assumptions.cost_per_mile(r.gas))),
            Cell::new(money(assumptions.cost_per_meal(r.chicken))),
        ];
        table.add_row(row);
    }
    for i in 1..9 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    format!("Summary by year\n{table}")
}
