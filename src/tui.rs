use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::budget::{BarSegment, Category};
use crate::fmt::money;
use crate::models::SourceKind;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const BOLD: Style = Style::new().add_modifier(Modifier::BOLD);

pub const AMOUNT_POS_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const AMOUNT_NEG_STYLE: Style = Style::new().fg(Color::Red);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

/// Allocation bar shades, darkest for the largest segment.
pub const BAR_SHADES: &[Color] = &[
    Color::Rgb(31, 119, 180),
    Color::Rgb(77, 136, 255),
    Color::Rgb(166, 198, 255),
];

pub const UNALLOCATED_COLOR: Color = Color::DarkGray;

pub fn series_color(kind: SourceKind) -> Color {
    match kind {
        SourceKind::Income => Color::Rgb(60, 181, 33),
        SourceKind::House => Color::Rgb(253, 126, 20),
        SourceKind::Chicken => Color::Rgb(68, 110, 155),
        SourceKind::Gas => Color::Rgb(205, 2, 0),
    }
}

/// Format an amount as a colored Span (green when positive, red when negative).
pub fn money_span(amount: f64) -> Span<'static> {
    let style = if amount < 0.0 {
        AMOUNT_NEG_STYLE
    } else {
        AMOUNT_POS_STYLE
    };
    Span::styled(money(amount), style)
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

/// Split `width` cells between percentages using largest remainders, so the
/// cells always add up to `width` when the percentages add up to 100.
pub fn segment_widths(percents: &[f64], width: u16) -> Vec<u16> {
    let total: f64 = percents.iter().map(|p| p.max(0.0)).sum();
    if total <= 0.0 || width == 0 {
        return vec![0; percents.len()];
    }
    let exact: Vec<f64> = percents
        .iter()
        .map(|p| p.max(0.0) / total * width as f64)
        .collect();
    let mut cells: Vec<u16> = exact.iter().map(|e| e.floor() as u16).collect();
    let assigned: u16 = cells.iter().sum();
    let mut order: Vec<usize> = (0..exact.len()).collect();
    order.sort_by(|&a, &b| (exact[b] - exact[b].floor()).total_cmp(&(exact[a] - exact[a].floor())));
    for &i in order.iter().take(width.saturating_sub(assigned) as usize) {
        cells[i] += 1;
    }
    cells
}

fn segment_color(segment: &BarSegment, rank: usize) -> Color {
    if segment.category == Category::Unallocated {
        UNALLOCATED_COLOR
    } else {
        BAR_SHADES[rank.min(BAR_SHADES.len() - 1)]
    }
}

/// One terminal row of the stacked allocation bar, percentages printed inside
/// segments wide enough to hold them.
pub fn stacked_bar(segments: &[BarSegment], width: u16) -> Line<'static> {
    let percents: Vec<f64> = segments.iter().map(|s| s.percent).collect();
    let widths = segment_widths(&percents, width);
    let spans: Vec<Span<'static>> = segments
        .iter()
        .zip(widths)
        .enumerate()
        .filter(|(_, (_, w))| *w > 0)
        .map(|(rank, (segment, w))| {
            let w = w as usize;
            let text = format!(" {:.1}%", segment.percent);
            let content = if text.len() <= w {
                format!("{text:<w$}")
            } else {
                " ".repeat(w)
            };
            Span::styled(
                content,
                Style::new().fg(Color::White).bg(segment_color(segment, rank)),
            )
        })
        .collect();
    Line::from(spans)
}

/// Legend line for one segment: swatch, label, percent, monthly dollars.
pub fn legend_line(segment: &BarSegment, rank: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled("  ", Style::new().bg(segment_color(segment, rank))),
        Span::raw(format!(" {:<12}{:>7.1}%   ", segment.label, segment.percent)),
        money_span(segment.amount),
    ])
}

/// Text slider: `[■■■■□□□□□□]` filled in proportion to `value / max`.
pub fn slider(value: f64, max: f64, cells: usize) -> String {
    let filled = if max > 0.0 {
        ((value / max).clamp(0.0, 1.0) * cells as f64).round() as usize
    } else {
        0
    };
    format!("[{}{}]", "\u{25a0}".repeat(filled), "\u{25a1}".repeat(cells - filled))
}

/// Restore the terminal before the default panic message is printed.
pub fn install_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(category: Category, percent: f64) -> BarSegment {
        BarSegment {
            category,
            label: category.label(),
            percent,
            amount: 0.0,
        }
    }

    #[test]
    fn test_segment_widths_fill_exactly() {
        let widths = segment_widths(&[99.02, 0.70, 0.28], 40);
        assert_eq!(widths.iter().sum::<u16>(), 40);
        assert_eq!(widths[0], 40);

        let widths = segment_widths(&[33.4, 33.3, 33.3], 10);
        assert_eq!(widths.iter().sum::<u16>(), 10);
        assert_eq!(widths, vec![4, 3, 3]);
    }

    #[test]
    fn test_segment_widths_degenerate() {
        assert_eq!(segment_widths(&[0.0, 0.0], 10), vec![0, 0]);
        assert_eq!(segment_widths(&[50.0, 50.0], 0), vec![0, 0]);
    }

    #[test]
    fn test_stacked_bar_width() {
        let segments = vec![
            segment(Category::Savings, 60.0),
            segment(Category::Chicken, 30.0),
            segment(Category::Gas, 10.0),
        ];
        let line = stacked_bar(&segments, 50);
        assert_eq!(line.width(), 50);
        assert!(line.spans[0].content.starts_with(" 60.0%"));
    }

    #[test]
    fn test_slider() {
        assert_eq!(slider(50.0, 100.0, 4), "[\u{25a0}\u{25a0}\u{25a1}\u{25a1}]");
        assert_eq!(slider(0.0, 90.0, 3), "[\u{25a1}\u{25a1}\u{25a1}]");
        assert_eq!(slider(200.0, 100.0, 2), "[\u{25a0}\u{25a0}]");
    }

    #[test]
    fn test_wrap_text() {
        let (wrapped, lines) = wrap_text("one two three four", 9);
        assert_eq!(lines, 3);
        assert!(wrapped.contains('\n'));
    }
}
