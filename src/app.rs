use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::{ContentSource, ShortsClient};
use crate::feed::{Completion, Direction, FeedController, FeedEvent, FetchStarted, PageResult, Playhead};
use crate::settings::{
    DEFAULT_LOOKAHEAD_MARGIN, DEFAULT_SCROLL_STEP, DEFAULT_SWIPE_THRESHOLD, Settings,
};
use crate::theme::ResolvedTheme;
use crate::time::Clock;

/// Rows taken by the header, load indicator and status bar around the card.
pub const CHROME_ROWS: u16 = 3;
/// Card height assumed until the terminal reports its size.
const DEFAULT_VIEWPORT_ROWS: f64 = 20.0;
/// Rows the load indicator adds to the scrollable extent.
const INDICATOR_ROWS: f64 = 1.0;

#[derive(Debug)]
pub struct TaskInfo {
    pub id: u64,
    pub description: String,
    pub started_at: Instant,
}

#[derive(Debug)]
pub struct LogEntry {
    pub message: String,
}

/// Debug panel state: task tracking and log messages.
#[derive(Debug, Default)]
pub struct DebugState {
    pub visible: bool,
    pub running_tasks: Vec<TaskInfo>,
    pub log: VecDeque<LogEntry>,
}

impl DebugState {
    const MAX_LOG_ENTRIES: usize = 50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        self.log.push_back(LogEntry {
            message: msg.into(),
        });
        if self.log.len() > Self::MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
    }

    pub fn start_task(&mut self, id: u64, description: impl Into<String>) {
        let desc = description.into();
        self.log(format!("Started: {}", desc));
        self.running_tasks.push(TaskInfo {
            id,
            description: desc,
            started_at: Instant::now(),
        });
    }

    pub fn end_task(&mut self, id: u64, outcome: &str) {
        if let Some(pos) = self.running_tasks.iter().position(|t| t.id == id) {
            let task = self.running_tasks.remove(pos);
            let elapsed = task.started_at.elapsed();
            self.log(format!("{} {}: {:.2?}", task.description, outcome, elapsed));
        }
    }

    /// Ends every running task with the same outcome. Used when a new
    /// session supersedes fetches that will never report back.
    pub fn end_all_tasks(&mut self, outcome: &str) {
        let ids: Vec<u64> = self.running_tasks.iter().map(|t| t.id).collect();
        for id in ids {
            self.end_task(id, outcome);
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

/// Tunables for turning terminal input into feed events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedConfig {
    pub lookahead_margin: f64,
    pub swipe_threshold: f64,
    pub scroll_step: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            lookahead_margin: DEFAULT_LOOKAHEAD_MARGIN,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            scroll_step: DEFAULT_SCROLL_STEP,
        }
    }
}

impl From<&Settings> for FeedConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            lookahead_margin: settings.lookahead_margin,
            swipe_threshold: settings.swipe_threshold,
            scroll_step: settings.scroll_step,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Next,
    Previous,
    JumpTo(usize),
    TogglePlay,
    ScrollDown,
    ScrollUp,
    DragStart(u16),
    DragEnd(u16),
    Tick(Duration),
    OpenMedia,
    Refresh,
    ToggleHelp,
    ToggleDebug,
    Quit,
    UpdateViewportHeight(u16),
}

pub struct App<S: ContentSource = ShortsClient> {
    pub feed: FeedController<S>,
    pub playhead: Playhead,
    pub config: FeedConfig,
    /// Continuous scroll position in rows; item `i` starts at `i * viewport`.
    pub scroll_offset: f64,
    pub drag_start: Option<u16>,
    pub viewport_height: Option<u16>,
    pub should_quit: bool,
    pub help_overlay: bool,
    pub error: Option<String>,
    pub loading_start: Option<Instant>,
    pub theme: ResolvedTheme,
    pub clock: Arc<dyn Clock>,
    pub debug: DebugState,
}

impl<S: ContentSource> App<S> {
    pub fn new(source: S, config: FeedConfig, theme: ResolvedTheme) -> Self {
        Self {
            feed: FeedController::new(source, config.lookahead_margin),
            playhead: Playhead::new(),
            config,
            scroll_offset: 0.0,
            drag_start: None,
            viewport_height: None,
            should_quit: false,
            help_overlay: false,
            error: None,
            loading_start: None,
            theme,
            clock: crate::time::system_clock(),
            debug: DebugState::new(),
        }
    }

    /// Mounts the feed and requests its first page.
    pub fn load_feed(&mut self) {
        self.scroll_offset = 0.0;
        self.error = None;
        self.debug.end_all_tasks("cancelled");
        let started = self.feed.mount();
        self.sync_playhead();
        if let Some(started) = started {
            self.track_fetch(started, "Load feed");
        }
    }

    pub fn is_loading(&self) -> bool {
        self.feed.state().is_loading()
    }

    /// Keeps the spinner up for a short minimum so quick loads don't flicker.
    pub fn should_show_spinner(&self) -> bool {
        const MIN_SPINNER_DURATION: Duration = Duration::from_millis(500);
        match self.loading_start {
            Some(start) => self.is_loading() || start.elapsed() < MIN_SPINNER_DURATION,
            None => false,
        }
    }

    /// Card height in rows, the unit all scroll geometry is measured in.
    pub fn viewport(&self) -> f64 {
        self.viewport_height
            .map(|h| f64::from(h.saturating_sub(CHROME_ROWS).max(1)))
            .unwrap_or(DEFAULT_VIEWPORT_ROWS)
    }

    pub fn scroll_extent(&self) -> f64 {
        self.feed.state().len() as f64 * self.viewport() + INDICATOR_ROWS
    }

    fn max_scroll_offset(&self) -> f64 {
        (self.scroll_extent() - self.viewport()).max(0.0)
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::Next => self.dispatch(FeedEvent::Advance(Direction::Next)),
            Message::Previous => self.dispatch(FeedEvent::Advance(Direction::Previous)),
            Message::JumpTo(index) => self.dispatch(FeedEvent::JumpTo(index)),
            Message::TogglePlay => self.toggle_play(),
            Message::ScrollDown => self.scroll_by(self.config.scroll_step),
            Message::ScrollUp => self.scroll_by(-self.config.scroll_step),
            Message::DragStart(row) => self.drag_start = Some(row),
            Message::DragEnd(row) => self.end_drag(row),
            Message::Tick(elapsed) => {
                if let Some(index) = self.playhead.tick(elapsed) {
                    self.debug.log(format!("Item {} ended", index + 1));
                    self.dispatch(FeedEvent::ItemEnded(index));
                }
            }
            Message::OpenMedia => self.open_media(),
            Message::Refresh => self.refresh(),
            Message::ToggleHelp => self.help_overlay = !self.help_overlay,
            Message::ToggleDebug => self.debug.toggle(),
            Message::Quit => self.quit(),
            Message::UpdateViewportHeight(height) => {
                if self.viewport_height != Some(height) {
                    self.viewport_height = Some(height);
                    self.align_scroll();
                    self.check_backfill();
                }
            }
        }
    }

    /// Runs one event through the feed, then brings scroll position, the
    /// playhead and backfill in line with the new state.
    fn dispatch(&mut self, event: FeedEvent) {
        let before = self.feed.state().current_index();
        if let Some(started) = self.feed.dispatch(event) {
            self.track_fetch(started, "Load more");
        }
        if self.feed.state().current_index() != before {
            self.align_scroll();
            tracing::debug!(
                from = before,
                to = self.feed.state().current_index(),
                "current item changed"
            );
        }
        self.sync_playhead();
        self.check_backfill();
    }

    fn toggle_play(&mut self) {
        let current = self.feed.state().current_index();
        self.dispatch(FeedEvent::TogglePlay(current));
    }

    fn scroll_by(&mut self, delta: f64) {
        self.scroll_offset = (self.scroll_offset + delta).clamp(0.0, self.max_scroll_offset());
        let viewport = self.viewport();
        self.dispatch(FeedEvent::Scrolled {
            offset: self.scroll_offset,
            viewport,
        });
    }

    /// A press and release on the same row is a tap and toggles playback;
    /// anything else is a swipe.
    fn end_drag(&mut self, row: u16) {
        let Some(start) = self.drag_start.take() else {
            return;
        };
        if start == row {
            self.toggle_play();
            return;
        }
        self.dispatch(FeedEvent::Swiped {
            start_y: f64::from(start),
            end_y: f64::from(row),
            threshold: self.config.swipe_threshold,
        });
    }

    fn align_scroll(&mut self) {
        self.scroll_offset = self.feed.state().current_index() as f64 * self.viewport();
    }

    fn sync_playhead(&mut self) {
        let state = self.feed.state();
        self.playhead.sync(state.playback(), state.items());
    }

    fn check_backfill(&mut self) {
        if self.feed.state().is_empty() {
            return;
        }
        let event = FeedEvent::NearEnd {
            offset: self.scroll_offset,
            viewport: self.viewport(),
            extent: self.scroll_extent(),
        };
        if let Some(started) = self.feed.dispatch(event) {
            self.track_fetch(started, "Load more");
        }
    }

    fn track_fetch(&mut self, started: FetchStarted, label: &str) {
        let description = match &started.cursor {
            Some(cursor) => format!("{label} (cursor {cursor})"),
            None => label.to_string(),
        };
        self.debug.start_task(started.request_id, description);
        self.loading_start = Some(Instant::now());
    }

    pub fn handle_page_result(&mut self, result: PageResult) {
        let before = self.feed.state().current_index();
        match self.feed.apply_result(result) {
            Completion::Loaded {
                request_id,
                added,
                has_more,
            } => {
                self.debug.end_task(request_id, "completed");
                self.error = None;
                if !has_more {
                    self.debug.log(format!("+{added} videos, end of feed"));
                } else {
                    self.debug.log(format!("+{added} videos"));
                }
                if self.feed.state().current_index() != before {
                    self.align_scroll();
                }
                self.sync_playhead();
                if added > 0 {
                    self.check_backfill();
                }
            }
            Completion::Failed { request_id, error } => {
                self.debug.end_task(request_id, "failed");
                self.error = Some(error.user_message());
            }
            Completion::Stale { request_id } => {
                self.debug.end_task(request_id, "discarded (stale)");
            }
        }
    }

    fn open_media(&mut self) {
        let Some(url) = self.feed.state().current_item().map(|v| v.media_url.clone()) else {
            return;
        };
        if let Err(e) = open::that(&url) {
            tracing::warn!(%url, error = %e, "failed to open media url");
            self.debug.log(format!("Failed to open {url}: {e}"));
        }
    }

    fn refresh(&mut self) {
        self.scroll_offset = 0.0;
        self.error = None;
        self.debug.end_all_tasks("cancelled");
        let started = self.feed.refresh();
        self.sync_playhead();
        if let Some(started) = started {
            self.track_fetch(started, "Refresh feed");
        }
    }

    fn quit(&mut self) {
        self.feed.unmount();
        self.playhead.release();
        self.should_quit = true;
    }
}
