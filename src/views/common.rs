use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::theme::ResolvedTheme;

/// Render an error message in a bordered block.
pub fn render_error(frame: &mut Frame, error: &str, theme: &ResolvedTheme, area: Rect) {
    let widget = Paragraph::new(error)
        .style(theme.error_style())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title("Error"),
        );
    frame.render_widget(widget, area);
}

/// Render a title and a dimmed hint, centered in `area`.
pub fn render_notice(
    frame: &mut Frame,
    title: &str,
    hint: &str,
    theme: &ResolvedTheme,
    area: Rect,
) {
    let top_pad = area.height.saturating_sub(2) / 2;
    let mut lines: Vec<Line> = (0..top_pad).map(|_| Line::from("")).collect();
    lines.push(Line::styled(title.to_string(), theme.title_style()));
    lines.push(Line::styled(hint.to_string(), theme.dim_style()));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Compact count for view and like totals: `999`, `1.2K`, `3.4M`.
pub fn format_count(n: u64) -> String {
    match n {
        0..=999 => n.to_string(),
        1_000..=999_999 => trim_tenths(n as f64 / 1_000.0, "K"),
        _ => trim_tenths(n as f64 / 1_000_000.0, "M"),
    }
}

fn trim_tenths(value: f64, suffix: &str) -> String {
    let rounded = (value * 10.0).floor() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}{suffix}")
    } else {
        format!("{rounded:.1}{suffix}")
    }
}
