// ============================================
// Browse Pipeline
// ============================================
//
// Search → Exclusions → Structured filters → (Targeting) → Sort
//
// Runs synchronously over the in-memory listing list on every search tick,
// filter change or newly loaded page.

pub mod filters;

pub use filters::{SearchFilters, TargetingFilters};

use crate::models::{Listing, TargetabilityResult};
use crate::services::targeting::{TargetabilityEvaluator, TargetingContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Price,
    CheckIn,
    Location,
    #[default]
    Created,
    /// Best targetability first; only honoured in targeting mode
    Targetability,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowseQuery {
    pub search: String,
    pub filters: SearchFilters,
    pub sort_by: SortField,
    pub order: SortOrder,
    /// Score every candidate against the user's active listing
    pub targeting_mode: bool,
    pub targeting: TargetingFilters,
}

/// One listing as it will be rendered.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrowseEntry {
    pub listing: Listing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targetability: Option<TargetabilityResult>,
}

/// Counts of listings dropped at each stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub filtered_by_search: usize,
    pub filtered_own: usize,
    pub filtered_cancelled: usize,
    pub filtered_by_filters: usize,
    pub filtered_by_targeting: usize,
}

/// Browse pipeline
#[derive(Debug, Clone, Default)]
pub struct BrowsePipeline {
    evaluator: TargetabilityEvaluator,
}

impl BrowsePipeline {
    pub fn new(evaluator: TargetabilityEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &TargetabilityEvaluator {
        &self.evaluator
    }

    /// Filter and order `listings` for the browsing user.
    pub fn run(
        &self,
        listings: Vec<Listing>,
        query: &BrowseQuery,
        ctx: &TargetingContext<'_>,
        now: DateTime<Utc>,
    ) -> (Vec<BrowseEntry>, FilterStats) {
        let input_count = listings.len();
        let mut stats = FilterStats::default();

        let candidates: Vec<Listing> = listings
            .into_iter()
            .filter(|listing| {
                if !filters::matches_search(listing, &query.search) {
                    stats.filtered_by_search += 1;
                    return false;
                }
                if filters::is_own_listing(listing, ctx.current_user_id) {
                    stats.filtered_own += 1;
                    return false;
                }
                if filters::is_cancelled(listing) {
                    stats.filtered_cancelled += 1;
                    return false;
                }
                if !filters::passes_filters(listing, &query.filters) {
                    stats.filtered_by_filters += 1;
                    return false;
                }
                true
            })
            .collect();

        let mut entries: Vec<BrowseEntry> = candidates
            .into_iter()
            .filter_map(|listing| {
                if !query.targeting_mode {
                    return Some(BrowseEntry {
                        listing,
                        targetability: None,
                    });
                }

                let result = self.evaluator.evaluate(ctx, &listing, now);
                if !filters::passes_targeting_filters(&listing, &result, &query.targeting) {
                    stats.filtered_by_targeting += 1;
                    return None;
                }
                Some(BrowseEntry {
                    listing,
                    targetability: Some(result),
                })
            })
            .collect();

        sort_entries(&mut entries, query.sort_by, query.order, query.targeting_mode);

        info!(
            input_count = input_count,
            output_count = entries.len(),
            targeting_mode = query.targeting_mode,
            "Browse pipeline completed"
        );
        debug!(?stats, "Browse filter stats");

        (entries, stats)
    }
}

/// Stable sort of browse entries.
pub fn sort_entries(
    entries: &mut [BrowseEntry],
    sort_by: SortField,
    order: SortOrder,
    targeting_mode: bool,
) {
    let field = match sort_by {
        SortField::Targetability if !targeting_mode => SortField::Created,
        other => other,
    };

    if field == SortField::Targetability {
        // Note: NaN scores are treated as equal
        entries.sort_by(|a, b| {
            targetability_score(b)
                .partial_cmp(&targetability_score(a))
                .unwrap_or(Ordering::Equal)
        });
        return;
    }

    entries.sort_by(|a, b| {
        let (a, b) = (&a.listing, &b.listing);
        match field {
            SortField::Price => directed(
                a.booking
                    .value
                    .partial_cmp(&b.booking.value)
                    .unwrap_or(Ordering::Equal),
                order,
            ),
            SortField::CheckIn => cmp_missing_last(
                a.booking.date_range.map(|r| r.check_in),
                b.booking.date_range.map(|r| r.check_in),
                order,
            ),
            SortField::Location => directed(location_key(a).cmp(&location_key(b)), order),
            SortField::Created | SortField::Targetability => {
                directed(a.created_at.cmp(&b.created_at), order)
            }
        }
    });
}

fn targetability_score(entry: &BrowseEntry) -> f32 {
    entry
        .targetability
        .as_ref()
        .map(|t| t.score)
        .unwrap_or(0.0)
}

fn location_key(listing: &Listing) -> (String, String) {
    let loc = &listing.booking.location;
    (loc.city.to_lowercase(), loc.country.to_lowercase())
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Missing keys sort after present ones regardless of direction.
fn cmp_missing_last<T: Ord>(a: Option<T>, b: Option<T>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => directed(a.cmp(&b), order),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
