//! Test data builders and a scripted content source.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Notify;

use crate::api::{ApiError, ContentSource, Page, VideoItem};
use crate::app::{App, FeedConfig};
use crate::feed::{FeedController, FeedState};
use crate::theme::{ResolvedTheme, ThemeVariant, default_for_variant};
use crate::time::fixed_clock;

/// Base publish time for sample data: 2023-11-14 22:13:20 UTC.
pub const BASE_TS: i64 = 1_700_000_000;

/// Fixed "now" for deterministic tests, one day after [`BASE_TS`], so
/// sample videos show as "1d ago".
pub fn test_now() -> DateTime<Utc> {
    Utc.timestamp_opt(BASE_TS + 86_400, 0).unwrap()
}

pub fn page(items: Vec<VideoItem>, next_cursor: Option<&str>) -> Page {
    Page {
        items,
        next_cursor: next_cursor.map(str::to_string),
    }
}

pub struct VideoBuilder {
    id: String,
    title: String,
    description: String,
    media_url: String,
    published_at: i64,
    view_count: u64,
    like_count: u64,
    duration_secs: u64,
    tags: Vec<String>,
    channel_name: Option<String>,
}

impl Default for VideoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl VideoBuilder {
    pub fn new() -> Self {
        Self {
            id: "v1".to_string(),
            title: "Test Video".to_string(),
            description: String::new(),
            media_url: "https://youtube.com/shorts/v1".to_string(),
            published_at: BASE_TS,
            view_count: 100,
            like_count: 10,
            duration_secs: 30,
            tags: vec![],
            channel_name: None,
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self.media_url = format!("https://youtube.com/shorts/{id}");
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn views(mut self, views: u64) -> Self {
        self.view_count = views;
        self
    }

    pub fn likes(mut self, likes: u64) -> Self {
        self.like_count = likes;
        self
    }

    pub fn duration_secs(mut self, secs: u64) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn published_at(mut self, ts: i64) -> Self {
        self.published_at = ts;
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn channel(mut self, name: &str) -> Self {
        self.channel_name = Some(name.to_string());
        self
    }

    pub fn build(self) -> VideoItem {
        VideoItem {
            id: self.id,
            title: self.title,
            description: self.description,
            thumbnail: None,
            media_url: self.media_url,
            published_at: Utc.timestamp_opt(self.published_at, 0).unwrap(),
            view_count: self.view_count,
            like_count: self.like_count,
            duration_secs: self.duration_secs,
            tags: self.tags,
            channel_name: self.channel_name,
        }
    }
}

pub fn sample_videos() -> Vec<VideoItem> {
    vec![
        VideoBuilder::new()
            .id("harbour")
            .title("Council votes on harbour redevelopment")
            .description("Residents packed the chamber as the council approved the first phase of the harbour plan.")
            .channel("The Cliff News")
            .views(15_230)
            .likes(842)
            .duration_secs(45)
            .tags(&["local", "politics"])
            .build(),
        VideoBuilder::new()
            .id("tide")
            .title("Storm surge warning for the coast")
            .channel("The Cliff News")
            .views(9_100)
            .likes(311)
            .duration_secs(38)
            .tags(&["weather"])
            .build(),
        VideoBuilder::new()
            .id("derby")
            .title("Late winner settles the county derby")
            .views(48_002)
            .likes(2_904)
            .duration_secs(59)
            .tags(&["sports"])
            .build(),
        VideoBuilder::new()
            .id("market")
            .title("Night market returns to the old square")
            .views(1_204)
            .likes(97)
            .duration_secs(27)
            .build(),
        VideoBuilder::new()
            .id("school")
            .title("Students build a weather station")
            .views(640)
            .likes(55)
            .duration_secs(51)
            .tags(&["education"])
            .build(),
    ]
}

#[derive(Default)]
struct StubInner {
    responses: Mutex<VecDeque<Result<Page, ApiError>>>,
    cursors: Mutex<Vec<Option<String>>>,
    calls: AtomicUsize,
    clears: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

/// A content source that replays scripted responses in order and records
/// what it was asked for. Once the script runs out it returns empty,
/// exhausted pages.
#[derive(Clone, Default)]
pub struct StubSource {
    inner: Arc<StubInner>,
}

#[allow(dead_code)]
impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose fetches wait until the returned `Notify` fires.
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let source = Self {
            inner: Arc::new(StubInner {
                gate: Some(Arc::clone(&gate)),
                ..Default::default()
            }),
        };
        (source, gate)
    }

    pub fn respond(self, page: Page) -> Self {
        self.inner.responses.lock().unwrap().push_back(Ok(page));
        self
    }

    pub fn fail(self, error: ApiError) -> Self {
        self.inner.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.inner.clears.load(Ordering::SeqCst)
    }

    pub fn cursors(&self) -> Vec<Option<String>> {
        self.inner.cursors.lock().unwrap().clone()
    }
}

impl ContentSource for StubSource {
    fn fetch_page(
        &self,
        cursor: Option<String>,
    ) -> impl Future<Output = Result<Page, ApiError>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            inner.calls.fetch_add(1, Ordering::SeqCst);
            inner.cursors.lock().unwrap().push(cursor);
            if let Some(gate) = &inner.gate {
                gate.notified().await;
            }
            let next = inner.responses.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(Page::default()))
        }
    }

    fn clear_cache(&self) -> impl Future<Output = ()> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            inner.clears.fetch_add(1, Ordering::SeqCst);
        }
    }
}

pub struct TestAppBuilder {
    videos: Vec<VideoItem>,
    cursor: Option<String>,
    current: usize,
    paused: bool,
    loading: bool,
    mounted: bool,
    error: Option<String>,
    help_overlay: bool,
    debug: bool,
    config: FeedConfig,
    theme: ResolvedTheme,
    viewport_height: Option<u16>,
    source: StubSource,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            videos: Vec::new(),
            cursor: None,
            current: 0,
            paused: false,
            loading: false,
            mounted: true,
            error: None,
            help_overlay: false,
            debug: false,
            config: FeedConfig::default(),
            theme: default_for_variant(ThemeVariant::Dark),
            viewport_height: None,
            source: StubSource::new(),
        }
    }

    pub fn with_videos(mut self, videos: Vec<VideoItem>) -> Self {
        self.videos = videos;
        self
    }

    /// Cursor for the page after the seeded videos; leaves `has_more` set.
    pub fn cursor(mut self, cursor: &str) -> Self {
        self.cursor = Some(cursor.to_string());
        self
    }

    pub fn current(mut self, index: usize) -> Self {
        self.current = index;
        self
    }

    pub fn paused(mut self) -> Self {
        self.paused = true;
        self
    }

    /// Marks a backfill as outstanding. Needs a cursor to take effect.
    pub fn loading(mut self) -> Self {
        self.loading = true;
        self
    }

    /// Leaves the feed unmounted, as before the first load.
    pub fn unmounted(mut self) -> Self {
        self.mounted = false;
        self
    }

    pub fn error(mut self, msg: &str) -> Self {
        self.error = Some(msg.to_string());
        self
    }

    pub fn help_overlay(mut self) -> Self {
        self.help_overlay = true;
        self
    }

    pub fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    pub fn scroll_step(mut self, step: f64) -> Self {
        self.config.scroll_step = step;
        self
    }

    pub fn theme(mut self, theme: ResolvedTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn viewport_height(mut self, height: u16) -> Self {
        self.viewport_height = Some(height);
        self
    }

    pub fn source(mut self, source: StubSource) -> Self {
        self.source = source;
        self
    }

    pub fn build(self) -> App<StubSource> {
        let mut app = App::new(self.source.clone(), self.config, self.theme);

        if self.mounted {
            let mut state = FeedState::new(
                page(self.videos, self.cursor.as_deref()),
                self.config.lookahead_margin,
            );
            state.jump_to(self.current);
            if self.paused {
                let current = state.current_index();
                state.toggle_play(current);
            }
            if self.loading {
                state.request_next_page();
                app.loading_start = Some(Instant::now());
            }
            app.feed = FeedController::with_state(self.source, state);
        }

        app.clock = fixed_clock(test_now());
        app.viewport_height = self.viewport_height;
        app.error = self.error;
        app.help_overlay = self.help_overlay;
        app.debug.visible = self.debug;
        let viewport = app.viewport();
        app.scroll_offset = app.feed.state().current_index() as f64 * viewport;
        let state = app.feed.state();
        app.playhead.sync(state.playback(), state.items());
        app
    }
}
