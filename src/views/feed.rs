use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::api::{ContentSource, VideoItem};
use crate::app::{App, Message};
use crate::feed::DisplayState;
use crate::help::feed_help;
use crate::keys::{JUMP_KEYS, Keymap, feed_keymap, format_key, global_keymap};
use crate::theme::ResolvedTheme;
use crate::time::{format_duration, format_relative};
use crate::views::common::{format_count, render_error, render_notice};
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::{PlayState, StatusBar};

pub fn render<S: ContentSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Dot indicator
        Constraint::Min(0),    // Card
        Constraint::Length(1), // Load indicator
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_dots(frame, app, chunks[0]);
    render_card(frame, app, chunks[1]);
    render_load_indicator(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_dots<S: ContentSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let theme = &app.theme;
    let state = app.feed.state();

    let mut spans: Vec<Span> = (0..state.len().min(JUMP_KEYS))
        .map(|i| {
            if i == state.current_index() {
                Span::styled("● ", Style::default().fg(theme.dot_active))
            } else {
                Span::styled("○ ", Style::default().fg(theme.dot_inactive))
            }
        })
        .collect();

    if state.len() > JUMP_KEYS {
        spans.push(Span::styled(
            format!("+{} ", state.len() - JUMP_KEYS),
            theme.dim_style(),
        ));
    }

    if app.should_show_spinner() {
        spans.push(Span::styled(
            spinner_frame(app.loading_start),
            theme.spinner_style(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_card<S: ContentSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let theme = &app.theme;
    let state = app.feed.state();

    let Some(item) = state.current_item() else {
        if let Some(err) = &app.error {
            render_error(frame, &with_retry_hint(err), theme, area);
        } else if state.is_loading() {
            render_notice(frame, "Loading videos...", "", theme, area);
        } else {
            render_notice(
                frame,
                "No Videos Available",
                "Check back later for new content!",
                theme,
                area,
            );
        }
        return;
    };

    let current = state.current_index();
    let play_state = play_state(app);
    let marker = format!("{} {}", play_state.glyph(), play_state.label());
    let marker_style = match play_state {
        PlayState::Playing => theme.active_style(),
        PlayState::Paused | PlayState::Ended => theme.dim_style(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Line::from(vec![
            Span::raw(" "),
            Span::styled(marker, marker_style),
            Span::raw(" "),
        ]))
        .title_bottom(Line::styled(
            format!(" {}/{} ", current + 1, state.len()),
            theme.dim_style(),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [body, gauge_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let lines = card_lines(item, theme, app, body.width);
    frame.render_widget(Paragraph::new(lines), body);

    let progress = if app.playhead.owner() == Some(current) {
        app.playhead.progress()
    } else {
        0.0
    };
    let position = if app.playhead.owner() == Some(current) {
        app.playhead.position()
    } else {
        Default::default()
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.progress))
        .ratio(progress)
        .label(format!(
            "{} / {}",
            format_duration(position),
            format_duration(item.duration())
        ));
    frame.render_widget(gauge, gauge_area);
}

fn feed_keys() -> Keymap {
    global_keymap().extend(feed_keymap())
}

fn with_retry_hint(err: &str) -> String {
    match feed_keys().find_key(&Message::Refresh) {
        Some((code, mods)) => format!("{err}\n\nPress {} to retry", format_key(code, mods)),
        None => err.to_string(),
    }
}

/// An item that played to the end keeps its playback slot but no longer runs.
fn play_state<S: ContentSource>(app: &App<S>) -> PlayState {
    let state = app.feed.state();
    let current = state.current_index();
    match state.display_state(current) {
        DisplayState::VisiblePlaying
            if app.playhead.owner() == Some(current) && !app.playhead.is_running() =>
        {
            PlayState::Ended
        }
        DisplayState::VisiblePlaying => PlayState::Playing,
        _ => PlayState::Paused,
    }
}

fn card_lines<'a, S: ContentSource>(
    item: &'a VideoItem,
    theme: &ResolvedTheme,
    app: &App<S>,
    width: u16,
) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    for row in textwrap::wrap(&item.title, usize::from(width.max(1))) {
        lines.push(Line::styled(row.into_owned(), theme.title_style()));
    }

    let mut byline = Vec::new();
    if let Some(channel) = &item.channel_name {
        byline.push(Span::styled(
            channel.as_str(),
            Style::default().fg(theme.channel),
        ));
        byline.push(Span::styled(" · ", theme.dim_style()));
    }
    byline.push(Span::styled(
        format_relative(item.published_at, app.clock.now()),
        theme.dim_style(),
    ));
    lines.push(Line::from(byline));

    lines.push(Line::from(vec![
        Span::styled(
            format!("{} views", format_count(item.view_count)),
            Style::default().fg(theme.views),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} likes", format_count(item.like_count)),
            Style::default().fg(theme.likes),
        ),
        Span::raw("  "),
        Span::styled(format_duration(item.duration()), theme.dim_style()),
    ]));

    if !item.tags.is_empty() {
        let tags: Vec<Span> = item
            .tags
            .iter()
            .map(|tag| {
                Span::styled(
                    format!("#{tag} "),
                    Style::default()
                        .fg(theme.tag)
                        .add_modifier(Modifier::ITALIC),
                )
            })
            .collect();
        lines.push(Line::from(tags));
    }

    if !item.description.is_empty() {
        lines.push(Line::from(""));
        for row in textwrap::wrap(&item.description, usize::from(width.max(1))) {
            lines.push(Line::styled(
                row.into_owned(),
                Style::default().fg(theme.foreground),
            ));
        }
    }

    lines
}

fn render_load_indicator<S: ContentSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let theme = &app.theme;
    let state = app.feed.state();

    if state.is_empty() {
        return;
    }

    let line = if let Some(err) = &app.error {
        Line::styled(err.clone(), theme.error_style())
    } else if state.is_loading() {
        Line::from(vec![
            Span::styled(spinner_frame(app.loading_start), theme.spinner_style()),
            Span::styled(" Loading more videos...", theme.dim_style()),
        ])
    } else if state.has_more() {
        Line::styled("Scroll for more videos", theme.dim_style())
    } else {
        Line::styled("You've reached the end!", theme.dim_style())
    };

    frame.render_widget(Paragraph::new(line).centered(), area);
}

fn render_status_bar<S: ContentSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let keymap = feed_keys();
    let expanded = feed_help().format(&keymap, true);
    let state = app.feed.state();

    // Fall back to the compact help when the full line would be cut off.
    let help_text = if expanded.width() + 40 <= usize::from(area.width) {
        expanded
    } else {
        feed_help().format(&keymap, false)
    };

    let loading_text = format!("{} Loading...", spinner_frame(app.loading_start));
    let mut bar = StatusBar::new(&app.theme).label("Shorts").help(&help_text);
    if app.should_show_spinner() {
        bar = bar.loading(&loading_text);
    }
    if let Some(item) = state.current_item() {
        let current = state.current_index();
        let elapsed = if app.playhead.owner() == Some(current) {
            app.playhead.position()
        } else {
            Default::default()
        };
        bar = bar
            .playback(play_state(app), elapsed, item.duration())
            .position(current + 1, state.len(), state.has_more());
    }
    bar.render(frame, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestAppBuilder, VideoBuilder, sample_videos};
    use crate::views::tests::render_to_string;

    fn render_app<S: ContentSource>(app: &App<S>) -> String {
        render_to_string(80, 24, |frame| {
            render(frame, app, frame.area());
        })
    }

    #[test]
    fn card_shows_current_video() {
        let app = TestAppBuilder::new().with_videos(sample_videos()).build();
        let output = render_app(&app);

        assert!(output.contains("Council votes on harbour redevelopment"));
        assert!(output.contains("The Cliff News · 1d ago"));
        assert!(output.contains("15.2K views"));
        assert!(output.contains("842 likes"));
        assert!(output.contains("#local"));
        assert!(output.contains("Residents packed the chamber"));
        assert!(output.contains("▶ Playing"));
        assert!(output.contains("0:00 / 0:45"));
    }

    #[test]
    fn paused_card_shows_paused_marker() {
        let app = TestAppBuilder::new()
            .with_videos(sample_videos())
            .current(2)
            .paused()
            .build();
        let output = render_app(&app);

        assert!(output.contains("Late winner settles the county derby"));
        assert!(output.contains("Paused"));
        assert!(!output.contains("▶ Playing"));
    }

    #[test]
    fn dots_mark_current_and_count_overflow() {
        let mut videos = sample_videos();
        videos.push(VideoBuilder::new().id("extra1").build());
        videos.push(VideoBuilder::new().id("extra2").build());
        let app = TestAppBuilder::new().with_videos(videos).current(1).build();
        let output = render_app(&app);

        let first_line = output.lines().next().unwrap_or_default();
        assert!(first_line.starts_with("○ ● ○ ○ ○ +2"));
    }

    #[test]
    fn load_indicator_reflects_feed_state() {
        let more = TestAppBuilder::new()
            .with_videos(sample_videos())
            .cursor("c2")
            .build();
        assert!(render_app(&more).contains("Scroll for more videos"));

        let loading = TestAppBuilder::new()
            .with_videos(sample_videos())
            .cursor("c2")
            .loading()
            .build();
        assert!(render_app(&loading).contains("Loading more videos..."));

        let done = TestAppBuilder::new().with_videos(sample_videos()).build();
        assert!(render_app(&done).contains("You've reached the end!"));
    }

    #[test]
    fn empty_feed_shows_placeholder() {
        let app = TestAppBuilder::new().build();
        let output = render_app(&app);

        assert!(output.contains("No Videos Available"));
        assert!(output.contains("Check back later for new content!"));
        assert!(!output.contains("reached the end"));
    }

    #[test]
    fn failed_initial_load_shows_error_box() {
        let app = TestAppBuilder::new()
            .error("Network error: Could not reach server.")
            .build();
        let output = render_app(&app);

        assert!(output.contains("Error"));
        assert!(output.contains("Could not reach server"));
        assert!(output.contains("Press r to retry"));
        assert!(!output.contains("No Videos Available"));
    }

    #[test]
    fn failed_backfill_keeps_card_and_shows_banner() {
        let app = TestAppBuilder::new()
            .with_videos(sample_videos())
            .cursor("c2")
            .error("Server error. Please try again later.")
            .build();
        let output = render_app(&app);

        assert!(output.contains("Council votes on harbour redevelopment"));
        assert!(output.contains("Server error. Please try again later."));
    }

    #[test]
    fn status_bar_shows_position_and_help() {
        let app = TestAppBuilder::new()
            .with_videos(sample_videos())
            .current(3)
            .build();
        let output = render_app(&app);
        let last_line = output.lines().last().unwrap_or_default();

        assert!(last_line.contains("Shorts"));
        assert!(last_line.contains("▶ 0:00/"));
        assert!(last_line.contains("4/5 |"));
        assert!(last_line.contains("?:help"));
    }

    #[test]
    fn status_bar_marks_more_pages() {
        let app = TestAppBuilder::new()
            .with_videos(sample_videos())
            .cursor("c2")
            .build();
        let last_line = render_app(&app).lines().last().unwrap_or_default().to_string();

        assert!(last_line.contains("1/5+"));
    }

    #[tokio::test]
    async fn last_item_finishing_shows_ended() {
        let videos = vec![VideoBuilder::new().id("only").duration_secs(2).build()];
        let mut app = TestAppBuilder::new().with_videos(videos).build();

        app.update(Message::Tick(std::time::Duration::from_secs(1)));
        assert!(render_app(&app).contains("▶ Playing"));

        app.update(Message::Tick(std::time::Duration::from_secs(1)));
        let output = render_app(&app);
        assert!(output.contains("■ Ended"));
        assert!(!output.contains("▶ Playing"));
        assert!(output.contains("0:02 / 0:02"));

        app.update(Message::Tick(std::time::Duration::from_secs(1)));
        assert!(render_app(&app).contains("■ Ended"));
    }
}
