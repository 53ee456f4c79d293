use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Url;
use tokio::sync::RwLock;

use super::source::ContentSource;
use super::types::{ApiResponse, Page, ShortItem, VideoItem};
use super::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PAGE_SIZE: usize = 10;
const CACHE_TTL: Duration = Duration::from_secs(10 * 60);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

struct CacheEntry<T> {
    data: T,
    fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() < CACHE_TTL
    }
}

/// Query filters forwarded to the shorts listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortsFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub featured: bool,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub page_size: usize,
    pub filter: ShortsFilter,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            filter: ShortsFilter::default(),
        }
    }
}

pub struct ShortsClient {
    http: reqwest::Client,
    base_url: Url,
    page_size: usize,
    filter: ShortsFilter,
    page_cache: Arc<RwLock<HashMap<Option<String>, CacheEntry<Page>>>>,
}

impl ShortsClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(config.base_url.trim())
            .map_err(|_| ApiError::InvalidBaseUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url));
        }
        // Joining path segments later needs a path without a trailing slash.
        let trimmed = base_url.path().trim_end_matches('/').to_string();
        base_url.set_path(&trimmed);

        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()?,
            base_url,
            page_size: config.page_size.max(1),
            filter: config.filter,
            page_cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn list_query(&self, cursor: Option<&str>) -> Vec<(&'static str, String)> {
        let mut query = vec![("limit", self.page_size.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        if let Some(category) = &self.filter.category {
            query.push(("category", category.clone()));
        }
        if let Some(search) = &self.filter.search {
            query.push(("search", search.clone()));
        }
        if self.filter.featured {
            query.push(("isFeatured", "true".to_string()));
        }
        query
    }

    pub async fn clear_cache(&self) {
        self.page_cache.write().await.clear();
    }

    /// Fetches one page of shorts, serving fresh pages from the cache.
    pub async fn fetch_shorts_page(&self, cursor: Option<String>) -> Result<Page, ApiError> {
        {
            let cache = self.page_cache.read().await;
            if let Some(entry) = cache.get(&cursor)
                && entry.is_fresh()
            {
                tracing::debug!(?cursor, "serving shorts page from cache");
                return Ok(entry.data.clone());
            }
        }

        let url = self.endpoint(&["youtube", "shorts"])?;
        let response: ApiResponse<Vec<serde_json::Value>> = self
            .http
            .get(url)
            .query(&self.list_query(cursor.as_deref()))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let page = Page::from_response(response)?;

        tracing::info!(
            ?cursor,
            items = page.items.len(),
            next = ?page.next_cursor,
            "fetched shorts page"
        );

        {
            let mut cache = self.page_cache.write().await;
            cache.insert(
                cursor,
                CacheEntry {
                    data: page.clone(),
                    fetched_at: Instant::now(),
                },
            );
        }

        Ok(page)
    }

    /// Fetches a single short by id.
    pub async fn fetch_short(&self, id: &str) -> Result<VideoItem, ApiError> {
        let url = self.endpoint(&["youtube", "shorts", id])?;
        let response: ApiResponse<ShortItem> = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .into_data()?
            .and_then(VideoItem::from_short)
            .ok_or_else(|| ApiError::Parse(format!("short {id} is missing required fields")))
    }
}

impl ContentSource for ShortsClient {
    fn fetch_page(
        &self,
        cursor: Option<String>,
    ) -> impl Future<Output = Result<Page, ApiError>> + Send {
        self.fetch_shorts_page(cursor)
    }

    fn clear_cache(&self) -> impl Future<Output = ()> + Send {
        ShortsClient::clear_cache(self)
    }
}

impl Clone for ShortsClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            page_size: self.page_size,
            filter: self.filter.clone(),
            page_cache: Arc::clone(&self.page_cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn short(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Short {id}"),
            "youtubeUrl": format!("https://youtube.com/shorts/{id}"),
            "publishedAt": "2023-11-14T10:00:00Z",
            "duration": 30
        })
    }

    fn client_for(server: &MockServer, filter: ShortsFilter) -> ShortsClient {
        ShortsClient::new(ClientConfig {
            base_url: format!("{}/api/", server.uri()),
            page_size: 2,
            filter,
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ShortsClient::new(ClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn test_first_page_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/youtube/shorts"))
            .and(query_param("limit", "2"))
            .and(query_param("category", "sports"))
            .and(query_param("isFeatured", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [short("a"), short("b")],
                "nextCursor": "c2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(
            &server,
            ShortsFilter {
                category: Some("sports".to_string()),
                search: None,
                featured: true,
            },
        );
        let page = client.fetch_shorts_page(None).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "a");
        assert_eq!(page.next_cursor.as_deref(), Some("c2"));
    }

    #[tokio::test]
    async fn test_cursor_forwarded_and_exhaustion() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/youtube/shorts"))
            .and(query_param("cursor", "c2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [short("c")]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, ShortsFilter::default());
        let page = client.fetch_shorts_page(Some("c2".to_string())).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_pages_are_cached_until_cleared() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/youtube/shorts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [short("a")],
                "nextCursor": "c2"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server, ShortsFilter::default());
        client.fetch_shorts_page(None).await.unwrap();
        client.fetch_shorts_page(None).await.unwrap();
        client.clear_cache().await;
        client.fetch_shorts_page(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server, ShortsFilter::default());
        let err = client.fetch_shorts_page(None).await.unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus(503, _)));
    }

    #[tokio::test]
    async fn test_garbage_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, ShortsFilter::default());
        let err = client.fetch_shorts_page(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_single_short() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/youtube/shorts/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": short("abc")
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, ShortsFilter::default());
        let item = client.fetch_short("abc").await.unwrap();
        assert_eq!(item.title, "Short abc");
    }

    #[tokio::test]
    async fn test_incomplete_single_short_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/youtube/shorts/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "id": "abc" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, ShortsFilter::default());
        assert!(client.fetch_short("abc").await.is_err());
    }
}
