//! Feed state and its transitions.
//!
//! Every operation here is a total function over [`FeedState`]: out of
//! range indices, empty feeds and boundary moves are no-ops, never errors.
//! The only side effect an operation can ask for is a page fetch, returned
//! as a [`FetchRequest`] for the caller to execute.

use std::collections::HashSet;

use crate::api::{Page, VideoItem};

/// Which item, if any, holds the playback resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playback {
    #[default]
    Stopped,
    Playing(usize),
}

impl Playback {
    pub fn index(self) -> Option<usize> {
        match self {
            Playback::Stopped => None,
            Playback::Playing(index) => Some(index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Per-item view derived from the feed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Hidden,
    VisiblePaused,
    VisiblePlaying,
}

/// Request for the page following `cursor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub cursor: Option<String>,
}

/// Every input the feed reacts to.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Advance(Direction),
    JumpTo(usize),
    ItemEnded(usize),
    TogglePlay(usize),
    Scrolled { offset: f64, viewport: f64 },
    Swiped { start_y: f64, end_y: f64, threshold: f64 },
    NearEnd { offset: f64, viewport: f64, extent: f64 },
    PageLoaded(Page),
    PageFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    items: Vec<VideoItem>,
    seen_ids: HashSet<String>,
    current: usize,
    playback: Playback,
    loading: bool,
    has_more: bool,
    cursor: Option<String>,
    lookahead_margin: f64,
}

impl FeedState {
    /// A feed with nothing loaded yet. `has_more` starts true so the first
    /// page can be requested.
    pub fn empty(lookahead_margin: f64) -> Self {
        Self {
            items: Vec::new(),
            seen_ids: HashSet::new(),
            current: 0,
            playback: Playback::Stopped,
            loading: false,
            has_more: true,
            cursor: None,
            lookahead_margin,
        }
    }

    /// A feed seeded with its first page. Item 0 starts playing.
    pub fn new(first_page: Page, lookahead_margin: f64) -> Self {
        let mut state = Self::empty(lookahead_margin);
        state.append(first_page);
        state
    }

    pub fn items(&self) -> &[VideoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_item(&self) -> Option<&VideoItem> {
        self.items.get(self.current)
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn display_state(&self, index: usize) -> DisplayState {
        if self.playback == Playback::Playing(index) {
            DisplayState::VisiblePlaying
        } else if index == self.current && index < self.items.len() {
            DisplayState::VisiblePaused
        } else {
            DisplayState::Hidden
        }
    }

    /// Makes `index` current and hands it the playback resource.
    fn activate(&mut self, index: usize) {
        self.current = index;
        self.playback = Playback::Playing(index);
    }

    /// Moves one step, clamped to the loaded items.
    pub fn advance(&mut self, direction: Direction) -> bool {
        let target = match direction {
            Direction::Next => self.current + 1,
            Direction::Previous => match self.current.checked_sub(1) {
                Some(index) => index,
                None => return false,
            },
        };
        if target >= self.items.len() {
            return false;
        }
        self.activate(target);
        true
    }

    /// Jumping to the current item keeps its play/pause state.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.items.len() || index == self.current {
            return false;
        }
        self.activate(index);
        true
    }

    /// Autoplay: the current item finishing moves on to the next one.
    pub fn on_item_end(&mut self, index: usize) -> bool {
        if index != self.current {
            return false;
        }
        self.advance(Direction::Next)
    }

    /// Only the current item can be played or paused directly.
    pub fn toggle_play(&mut self, index: usize) -> bool {
        if index != self.current || index >= self.items.len() {
            return false;
        }
        self.playback = match self.playback {
            Playback::Playing(playing) if playing == index => Playback::Stopped,
            _ => Playback::Playing(index),
        };
        true
    }

    /// Snaps a continuous scroll offset to the nearest item.
    pub fn handle_scroll_position(&mut self, offset: f64, viewport: f64) -> bool {
        if !(viewport > 0.0) || !offset.is_finite() {
            return false;
        }
        let candidate = (offset / viewport).round();
        if candidate < 0.0 || candidate >= self.items.len() as f64 {
            return false;
        }
        self.jump_to(candidate as usize)
    }

    /// Positive deltas (finger moving up) go forward.
    pub fn handle_swipe(&mut self, start_y: f64, end_y: f64, threshold: f64) -> bool {
        let delta = start_y - end_y;
        if delta > threshold {
            self.advance(Direction::Next)
        } else if delta < -threshold {
            self.advance(Direction::Previous)
        } else {
            false
        }
    }

    /// Starts a backfill when the viewport bottom is within the lookahead
    /// margin of the scroll extent.
    pub fn maybe_load_more(
        &mut self,
        offset: f64,
        viewport: f64,
        extent: f64,
    ) -> Option<FetchRequest> {
        if offset + viewport >= extent - self.lookahead_margin {
            self.request_next_page()
        } else {
            None
        }
    }

    /// Marks a fetch as outstanding unless one already is or the source is
    /// exhausted.
    pub fn request_next_page(&mut self) -> Option<FetchRequest> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        Some(FetchRequest {
            cursor: self.cursor.clone(),
        })
    }

    /// Applies a successful fetch. Returns the number of items appended.
    pub fn complete_load(&mut self, page: Page) -> usize {
        if !self.loading {
            return 0;
        }
        self.loading = false;
        self.append(page)
    }

    /// A failed fetch only clears the outstanding flag.
    pub fn fail_load(&mut self) {
        self.loading = false;
    }

    fn append(&mut self, page: Page) -> usize {
        let was_empty = self.items.is_empty();
        let before = self.items.len();
        for item in page.items {
            if self.seen_ids.insert(item.id.clone()) {
                self.items.push(item);
            }
        }
        self.has_more = page.next_cursor.is_some();
        self.cursor = page.next_cursor;
        if was_empty && !self.items.is_empty() {
            self.activate(0);
        }
        self.items.len() - before
    }

    /// Single entry point for every input. Returns a fetch to start, if any.
    pub fn apply(&mut self, event: FeedEvent) -> Option<FetchRequest> {
        match event {
            FeedEvent::Advance(direction) => {
                self.advance(direction);
            }
            FeedEvent::JumpTo(index) => {
                self.jump_to(index);
            }
            FeedEvent::ItemEnded(index) => {
                self.on_item_end(index);
            }
            FeedEvent::TogglePlay(index) => {
                self.toggle_play(index);
            }
            FeedEvent::Scrolled { offset, viewport } => {
                self.handle_scroll_position(offset, viewport);
            }
            FeedEvent::Swiped {
                start_y,
                end_y,
                threshold,
            } => {
                self.handle_swipe(start_y, end_y, threshold);
            }
            FeedEvent::NearEnd {
                offset,
                viewport,
                extent,
            } => return self.maybe_load_more(offset, viewport, extent),
            FeedEvent::PageLoaded(page) => {
                self.complete_load(page);
            }
            FeedEvent::PageFailed => self.fail_load(),
        }
        None
    }
}
