use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::api::ContentSource;
use crate::app::App;

pub fn render<S: ContentSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .title(" Debug ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.foreground_dim));

    let mut lines = Vec::new();

    let task_count = app.debug.running_tasks.len();
    let state = app.feed.state();
    lines.push(Line::from(vec![
        Span::styled("Tasks: ", Style::default().fg(theme.foreground_dim)),
        Span::styled(
            task_count.to_string(),
            Style::default().fg(if task_count > 0 {
                theme.spinner
            } else {
                theme.foreground
            }),
        ),
        Span::styled(
            format!(
                "  gen {}{}  items {}  offset {:.1}/{:.1}  playhead {}",
                app.feed.generation(),
                if app.feed.is_mounted() { "" } else { " (unmounted)" },
                state.len(),
                app.scroll_offset,
                app.scroll_extent(),
                if app.playhead.is_running() { "running" } else { "idle" }
            ),
            Style::default().fg(theme.foreground_dim),
        ),
    ]));

    for task in &app.debug.running_tasks {
        let elapsed = task.started_at.elapsed();
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("[{}] ", task.id),
                Style::default().fg(theme.foreground_dim),
            ),
            Span::styled(&task.description, Style::default().fg(theme.foreground)),
            Span::styled(
                format!(" ({:.1?})", elapsed),
                Style::default().fg(theme.channel),
            ),
        ]));
    }

    if !app.debug.running_tasks.is_empty() {
        lines.push(Line::from(""));
    }

    // Newest first, as many as fit under the header
    let available_lines = area.height.saturating_sub(3) as usize;
    let log_lines = available_lines.saturating_sub(app.debug.running_tasks.len() + 1);

    for entry in app.debug.log.iter().rev().take(log_lines) {
        lines.push(Line::from(vec![Span::styled(
            format!("  {}", entry.message),
            Style::default().fg(theme.foreground_dim),
        )]));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestAppBuilder, sample_videos};
    use crate::views::tests::render_to_string;

    #[test]
    fn shows_tasks_and_recent_log() {
        let mut app = TestAppBuilder::new().with_videos(sample_videos()).debug().build();
        app.debug.start_task(7, "Load more (cursor c2)");
        app.debug.log("+5 videos");

        let output = render_to_string(80, 10, |frame| {
            render(frame, &app, frame.area());
        });

        assert!(output.contains("Debug"));
        assert!(output.contains("Tasks: 1"));
        assert!(output.contains("[7] Load more (cursor c2)"));
        assert!(output.contains("+5 videos"));
        assert!(output.contains("items 5"));
    }
}
