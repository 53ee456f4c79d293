use std::future::Future;

use super::{ApiError, Page};

/// Where the feed pulls its pages from.
///
/// Implementations are cheap to clone; each fetch runs on its own task with
/// an owned clone of the source.
pub trait ContentSource: Clone + Send + Sync + 'static {
    /// Fetches the page after `cursor` (`None` for the first page).
    fn fetch_page(
        &self,
        cursor: Option<String>,
    ) -> impl Future<Output = Result<Page, ApiError>> + Send;

    /// Drops any cached pages so the next fetch hits the backend.
    fn clear_cache(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}
