mod client;
mod error;
mod source;
mod types;

pub use client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, ShortsClient, ShortsFilter};
pub use error::ApiError;
pub use source::ContentSource;
pub use types::{Page, VideoItem};
