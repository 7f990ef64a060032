use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph, Tabs},
    DefaultTerminal, Frame,
};

use crate::budget::{compute_for_record, Assumptions, BudgetStatus};
use crate::charts::{budget_view, BudgetView};
use crate::cli::load_context;
use crate::dataset::DataContext;
use crate::error::Result;
use crate::fmt::{format_k, money};
use crate::models::{UserSelection, YearRecord};
use crate::trends::{trend_chart, TrendChart};
use crate::tui::{
    install_panic_hook, legend_line, money_span, series_color, slider, stacked_bar, wrap_text,
    BOLD, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE,
};

pub const MILES_MAX: f64 = 100.0;
pub const MILES_STEP: f64 = 5.0;
pub const DEFAULT_MILES: f64 = 10.0;
pub const MEALS_MAX: f64 = 90.0;
pub const MEALS_STEP: f64 = 5.0;
pub const DEFAULT_MEALS: f64 = 50.0;

const SLIDER_CELLS: usize = 20;

const LEARN_TEXT: &[&str] = &[
    "How far does a typical paycheck go? This dashboard takes the median US \
     household income for a year and works out what is left each month once \
     a house is paid for, then splits the rest between driving, eating chicken \
     and saving.",
    "Housing assumes a 30 year loan on 85% of the median house price, with no \
     interest. Gas assumes a car doing 25 miles per gallon. A pound of chicken \
     makes three meals. These numbers can be changed in settings.json.",
    "On the Play tab, pick a year and say how many miles you drive and how many \
     chicken meals you eat in a month. The bar shows where the disposable income \
     goes. The chart below it puts every series on the same 0 to 1 scale so \
     you can see which prices outgrew income.",
    "The Results tab lists every year in the data with the monthly figures \
     behind the budget.",
];

const TAB_TITLES: &[&str] = &["Learn", "Play", "Results"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Learn,
    Play,
    Results,
}

impl Tab {
    fn index(self) -> usize {
        match self {
            Tab::Learn => 0,
            Tab::Play => 1,
            Tab::Results => 2,
        }
    }

    fn next(self) -> Self {
        match self {
            Tab::Learn => Tab::Play,
            Tab::Play => Tab::Results,
            Tab::Results => Tab::Learn,
        }
    }

    fn prev(self) -> Self {
        match self {
            Tab::Learn => Tab::Results,
            Tab::Play => Tab::Learn,
            Tab::Results => Tab::Play,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Miles,
    Meals,
    Year,
    PlanningYears,
}

const CONTROLS: &[Control] = &[
    Control::Miles,
    Control::Meals,
    Control::Year,
    Control::PlanningYears,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    Continue,
    Quit,
}

struct Dashboard<'a> {
    ctx: &'a DataContext,
    assumptions: Assumptions,
    /// Trend lines do not depend on the selection, so they are computed once.
    trends: std::result::Result<TrendChart, String>,
    trend_points: Vec<Vec<(f64, f64)>>,
    tab: Tab,
    focus: usize,
    selection: UserSelection,
    max_planning_years: u32,
    view: BudgetView,
    table_scroll: u16,
}

impl<'a> Dashboard<'a> {
    fn new(ctx: &'a DataContext, assumptions: Assumptions) -> Self {
        let (first, last) = ctx.year_range().unwrap_or((0, 0));
        let span = (last - first + 1).max(1) as u32;
        let selection = UserSelection {
            year: last,
            miles: DEFAULT_MILES,
            meals: DEFAULT_MEALS,
            planning_years: span,
        };
        let trends = trend_chart(ctx).map_err(|e| {
            tracing::warn!(error = %e, "trend chart unavailable");
            e.to_string()
        });
        let trend_points = match &trends {
            Ok(chart) => chart
                .series
                .iter()
                .map(|s| s.points.iter().map(|p| (p.year as f64, p.normalized)).collect())
                .collect(),
            Err(_) => Vec::new(),
        };
        Self {
            ctx,
            assumptions,
            trends,
            trend_points,
            tab: Tab::Play,
            focus: 0,
            selection,
            max_planning_years: span,
            view: budget_view(ctx, &selection, &assumptions),
            table_scroll: 0,
        }
    }

    fn recompute(&mut self) {
        self.view = budget_view(self.ctx, &self.selection, &self.assumptions);
        tracing::debug!(
            year = self.selection.year,
            miles = self.selection.miles,
            meals = self.selection.meals,
            savings_percent = self.view.breakdown.savings_percent,
            total_percent = self.view.breakdown.total_percent(),
            "recomputed budget"
        );
    }

    fn focused(&self) -> Control {
        CONTROLS[self.focus]
    }

    fn handle_key(&mut self, key: KeyEvent) -> DashboardAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return DashboardAction::Quit;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return DashboardAction::Quit,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char('1') => self.tab = Tab::Learn,
            KeyCode::Char('2') => self.tab = Tab::Play,
            KeyCode::Char('3') => self.tab = Tab::Results,
            KeyCode::Up => match self.tab {
                Tab::Results => self.table_scroll = self.table_scroll.saturating_sub(1),
                _ => self.focus = self.focus.saturating_sub(1),
            },
            KeyCode::Down => match self.tab {
                Tab::Results => {
                    let max = self.ctx.len().saturating_sub(1) as u16;
                    self.table_scroll = (self.table_scroll + 1).min(max);
                }
                _ => self.focus = (self.focus + 1).min(CONTROLS.len() - 1),
            },
            KeyCode::Left if self.tab == Tab::Play => self.adjust(-1),
            KeyCode::Right if self.tab == Tab::Play => self.adjust(1),
            _ => {}
        }
        DashboardAction::Continue
    }

    fn adjust(&mut self, delta: i32) {
        let control = self.focused();
        let s = &mut self.selection;
        match control {
            Control::Miles => {
                s.miles = (s.miles + MILES_STEP * delta as f64).clamp(0.0, MILES_MAX);
            }
            Control::Meals => {
                s.meals = (s.meals + MEALS_STEP * delta as f64).clamp(0.0, MEALS_MAX);
            }
            Control::Year => {
                if let Some(year) = self.ctx.step_year(s.year, delta) {
                    s.year = year;
                }
            }
            Control::PlanningYears => {
                let years = s.planning_years as i64 + delta as i64;
                s.planning_years = years.clamp(1, self.max_planning_years as i64) as u32;
            }
        }
        self.recompute();
    }

    fn draw(&self, frame: &mut Frame) {
        let [header_area, tabs_area, body_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(" Wage Explore: how far a median US income goes").style(HEADER_STYLE),
            header_area,
        );
        frame.render_widget(
            Tabs::new(TAB_TITLES.iter().copied())
                .select(self.tab.index())
                .highlight_style(SELECTED_STYLE)
                .divider("|"),
            tabs_area,
        );

        match self.tab {
            Tab::Learn => self.draw_learn(frame, body_area),
            Tab::Play => self.draw_play(frame, body_area),
            Tab::Results => self.draw_results(frame, body_area),
        }

        let hints = match self.tab {
            Tab::Play => " Tab switch  \u{2191}\u{2193} select  \u{2190}\u{2192} adjust  q quit",
            Tab::Results => " Tab switch  \u{2191}\u{2193} scroll  q quit",
            Tab::Learn => " Tab switch  q quit",
        };
        frame.render_widget(Paragraph::new(hints).style(FOOTER_STYLE), hints_area);
    }

    fn draw_learn(&self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(4) as usize;
        let mut lines = Vec::new();
        for para in LEARN_TEXT {
            let (wrapped, _) = wrap_text(para, width);
            lines.extend(wrapped.lines().map(|l| Line::from(format!(" {l}"))));
            lines.push(Line::default());
        }
        frame.render_widget(
            Paragraph::new(lines).block(Block::bordered().title(" About ")),
            area,
        );
    }

    fn draw_play(&self, frame: &mut Frame, area: Rect) {
        let [left, right] =
            Layout::horizontal([Constraint::Length(48), Constraint::Fill(1)]).areas(area);
        let [bar_area, chart_area] =
            Layout::vertical([Constraint::Length(8), Constraint::Fill(1)]).areas(right);

        frame.render_widget(
            Paragraph::new(self.control_lines()).block(Block::bordered().title(" Inputs ")),
            left,
        );
        self.draw_bar(frame, bar_area);
        self.draw_trends(frame, chart_area);
    }

    fn control_lines(&self) -> Vec<Line<'static>> {
        let s = &self.selection;
        let b = &self.view.breakdown;
        let mut lines = Vec::new();
        for (i, control) in CONTROLS.iter().enumerate() {
            let (label, value, bar) = match control {
                Control::Miles => ("Miles / month", format!("{:.0}", s.miles), slider(s.miles, MILES_MAX, SLIDER_CELLS)),
                Control::Meals => ("Meals / month", format!("{:.0}", s.meals), slider(s.meals, MEALS_MAX, SLIDER_CELLS)),
                Control::Year => ("Year", s.year.to_string(), String::new()),
                Control::PlanningYears => ("Planning years", s.planning_years.to_string(), String::new()),
            };
            let text = format!(" {label:<15}{value:>5}  {bar}");
            let style = if i == self.focus {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            lines.push(Line::styled(text, style));
        }
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::raw(" Start amount     "),
            Span::styled(self.view.starting_amount.clone(), BOLD),
        ]));
        if b.status != BudgetStatus::YearNotFound {
            lines.push(Line::from(vec![
                Span::raw(" Housing          "),
                Span::raw(money(b.monthly_housing)),
            ]));
            lines.push(Line::from(vec![
                Span::raw(" Disposable       "),
                money_span(b.disposable_income),
            ]));
            lines.push(Line::from(format!(" Cost per mile    {}", money(b.cost_per_mile))));
            lines.push(Line::from(format!(" Cost per meal    {}", money(b.cost_per_meal))));
        }
        let p = &self.view.projection;
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::raw(format!(" Saved over {} yr  ", p.years_covered)),
            money_span(p.ending_amount),
        ]));
        lines
    }

    fn draw_bar(&self, frame: &mut Frame, area: Rect) {
        let b = &self.view.breakdown;
        let inner_width = area.width.saturating_sub(2);
        let mut lines = vec![
            stacked_bar(&self.view.bar, inner_width),
            stacked_bar(&self.view.bar, inner_width),
            Line::default(),
        ];
        match b.status {
            BudgetStatus::YearNotFound => lines.push(Line::styled(
                format!(" No data for {}: all of it shows as savings.", b.year),
                Style::new().fg(Color::Yellow),
            )),
            BudgetStatus::NoDisposableIncome => lines.push(Line::styled(
                " Housing takes the whole income: nothing left to allocate.",
                Style::new().fg(Color::Red),
            )),
            BudgetStatus::Allocated => {}
        }
        lines.extend(
            self.view
                .bar
                .iter()
                .enumerate()
                .map(|(rank, segment)| legend_line(segment, rank)),
        );
        let title = format!(" Monthly Budget Breakdown {} ", b.year);
        frame.render_widget(Paragraph::new(lines).block(Block::bordered().title(title)), area);
    }

    fn draw_trends(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title(" Cost of living over time (ln, scaled) ");
        let chart = match &self.trends {
            Ok(chart) => chart,
            Err(msg) => {
                frame.render_widget(
                    Paragraph::new(format!(" {msg}"))
                        .style(Style::new().fg(Color::Red))
                        .block(block),
                    area,
                );
                return;
            }
        };

        let year = self.selection.year as f64;
        let marker = [(year, 0.0), (year, 1.0)];
        let mut datasets: Vec<Dataset> = chart
            .series
            .iter()
            .zip(&self.trend_points)
            .map(|(s, points)| {
                Dataset::default()
                    .name(s.name)
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::new().fg(series_color(s.kind)))
                    .data(points)
            })
            .collect();
        if self.ctx.get(self.selection.year).is_some() {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(FOOTER_STYLE)
                    .data(&marker),
            );
        }

        let x_axis = Axis::default()
            .bounds([chart.first_year as f64, chart.last_year as f64])
            .labels(vec![chart.first_year.to_string(), chart.last_year.to_string()])
            .style(FOOTER_STYLE);
        let y_axis = Axis::default()
            .bounds([0.0, 1.0])
            .labels(vec!["0", "1"])
            .style(FOOTER_STYLE);
        frame.render_widget(
            Chart::new(datasets).block(block).x_axis(x_axis).y_axis(y_axis),
            area,
        );
    }

    fn draw_results(&self, frame: &mut Frame, area: Rect) {
        let header = format!(
            " {:<6}{:>12}{:>14}{:>12}{:>12}{:>10}{:>10}",
            "Year", "Income/mo", "House", "Housing/mo", "Disposable", "$/mile", "$/meal"
        );
        let mut lines = vec![Line::styled(header, BOLD)];
        for r in self.ctx.records().iter().skip(self.table_scroll as usize) {
            let text = results_row(r, &self.assumptions);
            let style = if r.year == self.selection.year {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            lines.push(Line::styled(text, style));
        }
        frame.render_widget(
            Paragraph::new(lines).block(Block::bordered().title(" Summary by year ")),
            area,
        );
    }
}

/// One Results row. Figures come from the same computation as the budget, so
/// disposable income never shows below zero.
fn results_row(record: &YearRecord, assumptions: &Assumptions) -> String {
    let b = compute_for_record(record, 0.0, 0.0, assumptions);
    format!(
        " {:<6}{:>12}{:>14}{:>12}{:>12}{:>10}{:>10}",
        record.year,
        money(b.monthly_income),
        format_k(record.house),
        money(b.monthly_housing),
        money(b.disposable_income),
        money(b.cost_per_mile),
        money(b.cost_per_meal),
    )
}

fn event_loop(terminal: &mut DefaultTerminal, dashboard: &mut Dashboard) -> Result<()> {
    loop {
        terminal.draw(|frame| dashboard.draw(frame))?;
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if dashboard.handle_key(key) == DashboardAction::Quit {
                return Ok(());
            }
        }
    }
}

pub fn run(data_dir: Option<&str>) -> Result<()> {
    // Load before touching the terminal so data errors print normally.
    let (settings, ctx) = load_context(data_dir)?;
    let mut dashboard = Dashboard::new(&ctx, settings.assumptions);

    install_panic_hook();
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut dashboard);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DataContext {
        DataContext::from_records(vec![
            YearRecord { year: 2018, income: 58000.0, house: 290000.0, chicken: 2.9, gas: 2.7 },
            YearRecord { year: 2020, income: 60000.0, house: 300000.0, chicken: 3.0, gas: 3.0 },
            YearRecord { year: 2021, income: 61000.0, house: 310000.0, chicken: 3.1, gas: 3.2 },
        ])
    }

    fn press(d: &mut Dashboard, code: KeyCode) -> DashboardAction {
        d.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_defaults() {
        let ctx = ctx();
        let d = Dashboard::new(&ctx, Assumptions::default());
        assert_eq!(d.selection.year, 2021);
        assert_eq!(d.selection.miles, DEFAULT_MILES);
        assert_eq!(d.selection.meals, DEFAULT_MEALS);
        assert_eq!(d.selection.planning_years, 4);
        assert_eq!(d.tab, Tab::Play);
        assert!(d.trends.is_ok());
        assert_eq!(d.trend_points.len(), 4);
    }

    #[test]
    fn test_sliders_step_and_clamp() {
        let ctx = ctx();
        let mut d = Dashboard::new(&ctx, Assumptions::default());
        press(&mut d, KeyCode::Right);
        assert_eq!(d.selection.miles, 15.0);
        for _ in 0..30 {
            press(&mut d, KeyCode::Right);
        }
        assert_eq!(d.selection.miles, MILES_MAX);

        press(&mut d, KeyCode::Down);
        for _ in 0..30 {
            press(&mut d, KeyCode::Left);
        }
        assert_eq!(d.selection.meals, 0.0);
        for _ in 0..30 {
            press(&mut d, KeyCode::Right);
        }
        assert_eq!(d.selection.meals, MEALS_MAX);
    }

    #[test]
    fn test_year_steps_over_gaps() {
        let ctx = ctx();
        let mut d = Dashboard::new(&ctx, Assumptions::default());
        press(&mut d, KeyCode::Down);
        press(&mut d, KeyCode::Down);
        press(&mut d, KeyCode::Left);
        assert_eq!(d.selection.year, 2020);
        press(&mut d, KeyCode::Left);
        assert_eq!(d.selection.year, 2018);
        press(&mut d, KeyCode::Left);
        assert_eq!(d.selection.year, 2018);
        assert_eq!(d.view.breakdown.year, 2018);
    }

    #[test]
    fn test_planning_years_bounds() {
        let ctx = ctx();
        let mut d = Dashboard::new(&ctx, Assumptions::default());
        for _ in 0..5 {
            press(&mut d, KeyCode::Down);
        }
        assert_eq!(d.focused(), Control::PlanningYears);
        press(&mut d, KeyCode::Right);
        assert_eq!(d.selection.planning_years, 4);
        for _ in 0..10 {
            press(&mut d, KeyCode::Left);
        }
        assert_eq!(d.selection.planning_years, 1);
    }

    #[test]
    fn test_recomputes_view_on_change() {
        let ctx = ctx();
        let mut d = Dashboard::new(&ctx, Assumptions::default());
        let before = d.view.breakdown.gas_cost;
        press(&mut d, KeyCode::Right);
        assert!(d.view.breakdown.gas_cost > before);
    }

    #[test]
    fn test_tabs_and_quit() {
        let ctx = ctx();
        let mut d = Dashboard::new(&ctx, Assumptions::default());
        press(&mut d, KeyCode::Tab);
        assert_eq!(d.tab, Tab::Results);
        press(&mut d, KeyCode::Tab);
        assert_eq!(d.tab, Tab::Learn);
        press(&mut d, KeyCode::BackTab);
        assert_eq!(d.tab, Tab::Results);

        // Arrows scroll the table instead of moving the sliders
        press(&mut d, KeyCode::Right);
        press(&mut d, KeyCode::Down);
        assert_eq!(d.selection.miles, DEFAULT_MILES);
        assert_eq!(d.table_scroll, 1);

        assert_eq!(press(&mut d, KeyCode::Char('x')), DashboardAction::Continue);
        assert_eq!(press(&mut d, KeyCode::Char('q')), DashboardAction::Quit);
        assert_eq!(
            d.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            DashboardAction::Quit
        );
    }

    #[test]
    fn test_results_row_floors_disposable_income() {
        let underwater = YearRecord { year: 2008, income: 24000.0, house: 900000.0, chicken: 1.5, gas: 3.5 };
        let row = results_row(&underwater, &Assumptions::default());
        assert!(row.contains("$0.00"), "{row}");
        assert!(!row.contains('-'), "{row}");

        let row = results_row(&ctx().records()[1], &Assumptions::default());
        assert!(row.contains("$4,291.67"), "{row}");
    }

    #[test]
    fn test_trend_error_is_kept_for_display() {
        let ctx = DataContext::from_records(vec![YearRecord {
            year: 2000,
            income: 40000.0,
            house: 100000.0,
            chicken: 1.0,
            gas: 0.0,
        }]);
        let d = Dashboard::new(&ctx, Assumptions::default());
        assert!(d.trends.as_ref().unwrap_err().contains("gas"));
        assert!(d.trend_points.is_empty());
    }
}
