use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default delay between the last keystroke and running the search.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trailing-edge debouncer for search input.
///
/// Every call to [`SearchDebouncer::debounce`] supersedes the calls before
/// it; only the latest query resolves to `Some` once the delay has passed.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn debounce(&self, query: String) -> Option<String> {
        let ticket = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tokio::time::sleep(self.delay).await;

        if self.generation.load(Ordering::Acquire) == ticket {
            Some(query)
        } else {
            None
        }
    }
}
