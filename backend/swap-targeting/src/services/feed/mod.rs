// ============================================
// Listing Feed
// ============================================
//
// Infinite-scroll loader over a paginated listing source.
//
// - One fetch in flight at a time: a second `load_next_page` while the first
//   is pending is skipped, not queued
// - A page shorter than `page_size` marks the feed exhausted
// - Failed fetches keep what was already loaded and are not retried

pub mod debounce;

pub use debounce::SearchDebouncer;

use crate::error::Result;
use crate::models::Listing;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Paginated source of listings (the swap API in production).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one page; pages are 1-based.
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<Listing>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Number of new listings appended
    Loaded(usize),
    /// Another fetch was already in flight
    Skipped,
    /// The source has no more pages
    Exhausted,
    /// The feed was reset while the fetch was in flight; the page was dropped
    Stale,
}

#[derive(Debug)]
struct FeedState {
    listings: Vec<Listing>,
    seen: HashSet<Uuid>,
    next_page: u32,
    exhausted: bool,
    /// Bumped on every reset
    generation: u64,
}

impl FeedState {
    fn new(generation: u64) -> Self {
        Self {
            listings: Vec::new(),
            seen: HashSet::new(),
            next_page: 1,
            exhausted: false,
            generation,
        }
    }
}

/// Clears the loading flag however the fetch ends.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ListingFeed<S> {
    source: S,
    page_size: u32,
    loading: AtomicBool,
    state: RwLock<FeedState>,
}

impl<S: ListingSource> ListingFeed<S> {
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            loading: AtomicBool::new(false),
            state: RwLock::new(FeedState::new(0)),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub async fn is_exhausted(&self) -> bool {
        self.state.read().await.exhausted
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.listings.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Copy of everything loaded so far, in load order.
    pub async fn snapshot(&self) -> Vec<Listing> {
        self.state.read().await.listings.clone()
    }

    /// Drop loaded pages and start again from page 1.
    ///
    /// A fetch already in flight finishes as [`FetchOutcome::Stale`].
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        let generation = state.generation + 1;
        *state = FeedState::new(generation);
        debug!(generation = state.generation, "Listing feed reset");
    }

    /// Load the next page unless a fetch is already running.
    pub async fn load_next_page(&self) -> Result<FetchOutcome> {
        if self.state.read().await.exhausted {
            return Ok(FetchOutcome::Exhausted);
        }

        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Listing fetch already in flight, skipping");
            return Ok(FetchOutcome::Skipped);
        }
        let _guard = LoadingGuard(&self.loading);

        let (page, generation) = {
            let state = self.state.read().await;
            (state.next_page, state.generation)
        };
        let fetched = match self.source.fetch_page(page, self.page_size).await {
            Ok(listings) => listings,
            Err(e) => {
                warn!(page = page, error = %e, "Failed to load listing page");
                return Err(e);
            }
        };

        let fetched_count = fetched.len();
        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(page = page, "Feed reset during fetch, dropping page");
            return Ok(FetchOutcome::Stale);
        }
        let mut appended = 0;
        for listing in fetched {
            if state.seen.insert(listing.id) {
                state.listings.push(listing);
                appended += 1;
            }
        }
        state.next_page = page + 1;
        state.exhausted = fetched_count < self.page_size as usize;

        info!(
            page = page,
            fetched = fetched_count,
            appended = appended,
            total = state.listings.len(),
            exhausted = state.exhausted,
            "Listing page loaded"
        );

        Ok(FetchOutcome::Loaded(appended))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{
        AcceptanceMode, Booking, BookingStatus, ListingOwner, Location, SwapStatus,
    };
    use chrono::Utc;
    use mockall::predicate::eq;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn create_test_listing() -> Listing {
        Listing {
            id: Uuid::new_v4(),
            owner: ListingOwner {
                id: Uuid::new_v4(),
                verified: false,
                reputation: None,
            },
            booking: Booking {
                id: Uuid::new_v4(),
                title: "Cabin".to_string(),
                description: String::new(),
                booking_type: None,
                location: Location {
                    city: "Oslo".to_string(),
                    country: "Norway".to_string(),
                },
                date_range: None,
                value: 120.0,
                verified: false,
                status: BookingStatus::Available,
            },
            status: SwapStatus::Pending,
            mode: AcceptanceMode::OneForOne,
            payment_types: Vec::new(),
            cash_bounds: None,
            proposal_count: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_short_page_exhausts_feed() {
        let mut source = MockListingSource::new();
        source
            .expect_fetch_page()
            .with(eq(1), eq(2))
            .times(1)
            .returning(|_, _| Ok(vec![create_test_listing(), create_test_listing()]));
        source
            .expect_fetch_page()
            .with(eq(2), eq(2))
            .times(1)
            .returning(|_, _| Ok(vec![create_test_listing()]));

        let feed = ListingFeed::new(source, 2);
        assert_eq!(feed.load_next_page().await.unwrap(), FetchOutcome::Loaded(2));
        assert!(!feed.is_exhausted().await);
        assert_eq!(feed.load_next_page().await.unwrap(), FetchOutcome::Loaded(1));
        assert!(feed.is_exhausted().await);
        assert_eq!(feed.load_next_page().await.unwrap(), FetchOutcome::Exhausted);
        assert_eq!(feed.len().await, 3);
    }

    #[tokio::test]
    async fn test_error_keeps_loaded_listings() {
        let mut source = MockListingSource::new();
        source
            .expect_fetch_page()
            .with(eq(1), eq(1))
            .returning(|_, _| Ok(vec![create_test_listing()]));
        source
            .expect_fetch_page()
            .with(eq(2), eq(1))
            .returning(|_, _| Err(AppError::Network("connection reset".to_string())));

        let feed = ListingFeed::new(source, 1);
        feed.load_next_page().await.unwrap();
        assert!(feed.load_next_page().await.is_err());
        assert_eq!(feed.len().await, 1);
        assert!(!feed.is_loading());
    }

    #[tokio::test]
    async fn test_duplicate_listings_are_not_appended() {
        let repeated = create_test_listing();
        let mut source = MockListingSource::new();
        source
            .expect_fetch_page()
            .returning(move |_, _| Ok(vec![repeated.clone()]));

        let feed = ListingFeed::new(source, 1);
        assert_eq!(feed.load_next_page().await.unwrap(), FetchOutcome::Loaded(1));
        assert_eq!(feed.load_next_page().await.unwrap(), FetchOutcome::Loaded(0));
        assert_eq!(feed.len().await, 1);

        feed.reset().await;
        assert!(feed.is_empty().await);
    }

    /// Serves `limit` listings titled "page{n}"; page 3 waits for `release`.
    struct HeldSource {
        release: Notify,
    }

    #[async_trait]
    impl ListingSource for HeldSource {
        async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<Listing>> {
            if page == 3 {
                self.release.notified().await;
            }
            Ok((0..limit)
                .map(|_| {
                    let mut listing = create_test_listing();
                    listing.booking.title = format!("page{}", page);
                    listing
                })
                .collect())
        }
    }

    fn titles(listings: &[Listing]) -> Vec<String> {
        listings.iter().map(|l| l.booking.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_page() {
        let feed = Arc::new(ListingFeed::new(
            HeldSource {
                release: Notify::new(),
            },
            2,
        ));
        feed.load_next_page().await.unwrap();
        feed.load_next_page().await.unwrap();

        let in_flight = tokio::spawn({
            let feed = feed.clone();
            async move { feed.load_next_page().await }
        });
        while !feed.is_loading() {
            tokio::task::yield_now().await;
        }

        feed.reset().await;
        feed.source().release.notify_one();

        assert_eq!(in_flight.await.unwrap().unwrap(), FetchOutcome::Stale);
        assert!(feed.is_empty().await);
        assert!(!feed.is_loading());

        assert_eq!(feed.load_next_page().await.unwrap(), FetchOutcome::Loaded(2));
        assert_eq!(titles(&feed.snapshot().await), vec!["page1", "page1"]);
        feed.load_next_page().await.unwrap();
        assert_eq!(
            titles(&feed.snapshot().await),
            vec!["page1", "page1", "page2", "page2"]
        );
    }
}
