use std::time::Duration;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::theme::ResolvedTheme;
use crate::time::format_duration;

/// What the current card is doing, as shown to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Playing,
    Paused,
    /// Held the playhead to the end with nothing to advance to.
    Ended,
}

impl PlayState {
    pub fn glyph(self) -> &'static str {
        match self {
            PlayState::Playing => "▶",
            PlayState::Paused => "‖",
            PlayState::Ended => "■",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayState::Playing => "Playing",
            PlayState::Paused => "Paused",
            PlayState::Ended => "Ended",
        }
    }
}

/// Builder for the feed's bottom line:
/// `[Label] [Loading?] ▶ 0:12/0:45 | 3/12 | Help Text`
///
/// The position reads `3/12+` while more pages can still be fetched.
pub struct StatusBar<'a> {
    theme: &'a ResolvedTheme,
    label: &'a str,
    loading_text: Option<&'a str>,
    playback: Option<(PlayState, Duration, Duration)>,
    position: Option<(usize, usize, bool)>,
    help_text: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a ResolvedTheme) -> Self {
        Self {
            theme,
            label: "",
            loading_text: None,
            playback: None,
            position: None,
            help_text: "",
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn loading(mut self, text: &'a str) -> Self {
        self.loading_text = Some(text);
        self
    }

    pub fn playback(mut self, state: PlayState, elapsed: Duration, total: Duration) -> Self {
        self.playback = Some((state, elapsed, total));
        self
    }

    pub fn position(mut self, current: usize, total: usize, has_more: bool) -> Self {
        self.position = Some((current, total, has_more));
        self
    }

    pub fn help(mut self, text: &'a str) -> Self {
        self.help_text = text;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let dim = Style::default().fg(theme.foreground_dim);
        let mut spans = vec![
            Span::styled(format!(" {} ", self.label), theme.status_bar_style()),
            Span::raw(" "),
        ];

        if let Some(loading) = self.loading_text {
            spans.push(Span::styled(loading, theme.spinner_style()));
            spans.push(Span::raw(" | "));
        }

        if let Some((state, elapsed, total)) = self.playback {
            let style = match state {
                PlayState::Playing => theme.active_style(),
                PlayState::Paused | PlayState::Ended => dim,
            };
            spans.push(Span::styled(format!("{} ", state.glyph()), style));
            spans.push(Span::styled(
                format!("{}/{}", format_duration(elapsed), format_duration(total)),
                Style::default().fg(theme.progress),
            ));
            spans.push(Span::raw(" | "));
        }

        if let Some((current, total, has_more)) = self.position {
            let more = if has_more { "+" } else { "" };
            spans.push(Span::styled(format!("{current}/{total}{more}"), dim));
            spans.push(Span::raw(" | "));
        }

        spans.push(Span::styled(self.help_text, dim));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
