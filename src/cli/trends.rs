use comfy_table::{Cell, Table};

use crate::cli::load_context;
use crate::error::Result;
use crate::trends::{trend_chart, TrendChart};

pub fn run(data_dir: Option<&str>, json: bool) -> Result<()> {
    let (_, ctx) = load_context(data_dir)?;
    let chart = trend_chart(&ctx)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&chart)?);
    } else {
        println!("{}", format_trends(&chart));
    }
    Ok(())
}

/// Normalized values per year, one column per series.
pub fn format_trends(chart: &TrendChart) -> String {
    let mut table = Table::new();
    let mut header = vec!["Year".to_string()];
    header.extend(chart.series.iter().map(|s| s.name.to_string()));
    table.set_header(header);

    let rows = chart.series.first().map(|s| s.points.len()).unwrap_or(0);
    for i in 0..rows {
        let mut cells = Vec::with_capacity(chart.series.len() + 1);
        let year = chart.series[0].points[i].year;
        cells.push(Cell::new(year));
        for s in &chart.series {
            cells.push(Cell::new(format!("{:.3}", s.points[i].normalized)));
        }
        table.add_row(cells);
    }
    format!(
        "Cost of living over time, {}\u{2013}{} (ln, scaled 0..1)\n{table}",
        chart.first_year, chart.last_year
    )
}
