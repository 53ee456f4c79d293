//! The vertical video feed: state, reducer, session controller and playhead.

mod controller;
mod playhead;
mod state;

pub use controller::{Completion, FeedController, FetchStarted, PageResult};
pub use playhead::Playhead;
pub use state::{Direction, DisplayState, FeedEvent, FeedState, Playback};
