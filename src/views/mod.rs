pub mod common;
pub mod debug;
pub mod feed;
pub mod help_overlay;
pub mod spinner;
pub mod status_bar;


use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::api::ContentSource;
use crate::app::App;

/// Height of the debug pane when it is open.
pub const DEBUG_PANE_ROWS: u16 = 10;

/// Draws the whole screen: feed, optional debug pane, then the help overlay.
pub fn render<S: ContentSource>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();

    let (main_area, debug_area) = if app.debug.visible {
        let chunks = Layout::vertical([
            Constraint::Min(0),     // Main content
            Constraint::Length(DEBUG_PANE_ROWS),
        ])
        .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    feed::render(frame, app, main_area);

    if let Some(debug_area) = debug_area {
        debug::render(frame, app, debug_area);
    }

    help_overlay::render(frame, app, area);
}

#[cfg(test)]
mod screen_tests {
    use super::*;
    use crate::test_utils::{TestAppBuilder, sample_videos};
    use crate::views::tests::render_to_string;

    #[test]
    fn debug_pane_renders_below_feed() {
        let app = TestAppBuilder::new()
            .with_videos(sample_videos())
            .debug()
            .build();
        let output = render_to_string(80, 30, |frame| render(frame, &app));

        assert!(output.contains("Council votes on harbour redevelopment"));
        assert!(output.contains("Debug"));
    }

    #[test]
    fn help_overlay_draws_over_feed() {
        let app = TestAppBuilder::new()
            .with_videos(sample_videos())
            .help_overlay()
            .build();
        let output = render_to_string(80, 30, |frame| render(frame, &app));

        assert!(output.contains("Help"));
        assert!(output.contains("refresh feed"));
    }
}
