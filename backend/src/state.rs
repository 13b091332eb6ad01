use std::sync::Arc;

use crate::fetcher::CalendarFetcher;
use crate::registry::SourceRegistry;

/// Shared handler state. Cheap to clone: the registry is behind an `Arc` and
/// the fetcher's HTTP client is reference counted internally.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<SourceRegistry>,
    pub fetcher: CalendarFetcher,
}

impl AppState {
    pub fn new(registry: SourceRegistry, fetcher: CalendarFetcher) -> Self {
        Self {
            registry: Arc::new(registry),
            fetcher,
        }
    }
}
