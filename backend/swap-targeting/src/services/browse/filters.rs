//! Pure filter predicates for the browse pipeline.

use crate::models::{BookingStatus, BookingType, Listing, SwapStatus, TargetabilityResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured filters, AND-combined.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    /// Any-of; empty means every type
    pub booking_types: Vec<BookingType>,
    pub status: Option<SwapStatus>,
    /// Case-insensitive substring of city or country
    pub location: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// The stay must lie within `[date_from, date_to]`
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self == &SearchFilters::default()
    }
}

/// Extra filters only applied while browsing in targeting mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetingFilters {
    /// Drop candidates that already have proposals, auction ones included
    pub exclude_with_pending_proposals: bool,
    pub hide_untargetable: bool,
    pub min_compatibility: Option<f32>,
}

/// Case-insensitive substring match over title, description and location.
pub fn matches_search(listing: &Listing, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let booking = &listing.booking;
    [
        booking.title.as_str(),
        booking.description.as_str(),
        booking.location.city.as_str(),
        booking.location.country.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

pub fn is_own_listing(listing: &Listing, current_user_id: Option<Uuid>) -> bool {
    current_user_id
        .map(|user_id| listing.is_owned_by(user_id))
        .unwrap_or(false)
}

pub fn is_cancelled(listing: &Listing) -> bool {
    listing.booking.status == BookingStatus::Cancelled
}

pub fn passes_filters(listing: &Listing, filters: &SearchFilters) -> bool {
    passes_type_filter(listing, &filters.booking_types)
        && passes_status_filter(listing, filters.status)
        && passes_location_filter(listing, filters.location.as_deref())
        && passes_price_filter(listing, filters.price_min, filters.price_max)
        && passes_date_filter(listing, filters.date_from, filters.date_to)
}

pub fn passes_type_filter(listing: &Listing, types: &[BookingType]) -> bool {
    if types.is_empty() {
        return true;
    }
    listing
        .booking
        .booking_type
        .map(|t| types.contains(&t))
        .unwrap_or(false)
}

pub fn passes_status_filter(listing: &Listing, status: Option<SwapStatus>) -> bool {
    status.map(|s| listing.status == s).unwrap_or(true)
}

pub fn passes_location_filter(listing: &Listing, location: Option<&str>) -> bool {
    let needle = match location.map(|l| l.trim().to_lowercase()) {
        Some(needle) if !needle.is_empty() => needle,
        _ => return true,
    };

    let loc = &listing.booking.location;
    loc.city.to_lowercase().contains(&needle) || loc.country.to_lowercase().contains(&needle)
}

pub fn passes_price_filter(listing: &Listing, min: Option<f64>, max: Option<f64>) -> bool {
    let value = listing.booking.value;
    min.map(|m| value >= m).unwrap_or(true) && max.map(|m| value <= m).unwrap_or(true)
}

pub fn passes_date_filter(
    listing: &Listing,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }

    listing
        .booking
        .date_range
        .map(|range| {
            range.within(
                from.unwrap_or(NaiveDate::MIN),
                to.unwrap_or(NaiveDate::MAX),
            )
        })
        .unwrap_or(false)
}

pub fn passes_targeting_filters(
    listing: &Listing,
    result: &TargetabilityResult,
    filters: &TargetingFilters,
) -> bool {
    if filters.exclude_with_pending_proposals && listing.proposal_count > 0 {
        return false;
    }
    if filters.hide_untargetable && !result.can_target {
        return false;
    }
    if let Some(min) = filters.min_compatibility {
        if result.compatibility < min {
            return false;
        }
    }
    true
}
