use serde::Serialize;

use crate::budget::{
    bar_segments, compute_budget, project_savings, starting_amount, Assumptions, BarSegment,
    BudgetBreakdown, Projection,
};
use crate::dataset::DataContext;
use crate::error::Result;
use crate::models::UserSelection;
use crate::trends::{trend_chart, TrendChart};

/// Everything the dashboard draws for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartInputs {
    pub starting_amount: String,
    pub breakdown: BudgetBreakdown,
    pub bar: Vec<BarSegment>,
    pub projection: Projection,
    pub trends: TrendChart,
}

/// The selection-dependent part, recomputed on every input change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetView {
    pub starting_amount: String,
    pub breakdown: BudgetBreakdown,
    pub bar: Vec<BarSegment>,
    pub projection: Projection,
}

pub fn budget_view(ctx: &DataContext, selection: &UserSelection, assumptions: &Assumptions) -> BudgetView {
    let breakdown = compute_budget(ctx, selection.year, selection.miles, selection.meals, assumptions);
    let bar = bar_segments(&breakdown);
    let projection = project_savings(
        ctx,
        selection.year,
        selection.planning_years,
        selection.miles,
        selection.meals,
        assumptions,
    );
    BudgetView {
        starting_amount: starting_amount(ctx, selection.year),
        breakdown,
        bar,
        projection,
    }
}

pub fn build_charts(
    ctx: &DataContext,
    selection: &UserSelection,
    assumptions: &Assumptions,
) -> Result<ChartInputs> {
    let view = budget_view(ctx, selection, assumptions);
    Ok(ChartInputs {
        starting_amount: view.starting_amount,
        breakdown: view.breakdown,
        bar: view.bar,
        projection: view.projection,
        trends: trend_chart(ctx)?,
    })
}
