use std::time::Duration;

use crate::api::VideoItem;

use super::Playback;

/// Position of the one item allowed to play.
///
/// The playhead is the exclusive playback resource: it belongs to a single
/// item at a time and is released before another item takes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playhead {
    owner: Option<usize>,
    position: Duration,
    duration: Duration,
    running: bool,
}

impl Playhead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles the playhead with the feed's playback state.
    pub fn sync(&mut self, playback: Playback, items: &[VideoItem]) {
        match playback {
            Playback::Playing(index) => {
                let Some(item) = items.get(index) else {
                    self.release();
                    return;
                };
                if self.owner != Some(index) {
                    self.release();
                    tracing::debug!(index, id = %item.id, "playhead acquired");
                    self.owner = Some(index);
                    self.duration = item.duration();
                }
                // A finished item holds at its end until paused and played again.
                self.running = !self.finished();
            }
            Playback::Stopped => {
                if self.owner.is_some_and(|index| index >= items.len()) {
                    self.release();
                } else {
                    if self.finished() {
                        self.position = Duration::ZERO;
                    }
                    self.running = false;
                }
            }
        }
    }

    /// Gives the resource up entirely.
    pub fn release(&mut self) {
        if let Some(index) = self.owner.take() {
            tracing::debug!(index, "playhead released");
        }
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.running = false;
    }

    fn finished(&self) -> bool {
        !self.duration.is_zero() && self.position >= self.duration
    }

    /// Advances the running item. Returns its index when it reaches the end.
    pub fn tick(&mut self, elapsed: Duration) -> Option<usize> {
        if !self.running || self.finished() {
            return None;
        }
        let index = self.owner?;
        self.position = self.position.saturating_add(elapsed);
        if self.finished() {
            self.position = self.duration;
            self.running = false;
            return Some(index);
        }
        None
    }

    pub fn owner(&self) -> Option<usize> {
        self.owner
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}
