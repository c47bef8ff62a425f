use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod proposal;
pub mod targeting;

pub use proposal::{ProposalAck, ProposalRequest};
pub use targeting::{TargetabilityResult, TargetingActivity, TargetingRelationship};

/// A booking offered for swap or cash sale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub owner: ListingOwner,
    pub booking: Booking,
    pub status: SwapStatus,
    pub mode: AcceptanceMode,
    #[serde(default)]
    pub payment_types: Vec<PaymentType>,
    #[serde(default)]
    pub cash_bounds: Option<CashBounds>,
    #[serde(default)]
    pub proposal_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn is_auction(&self) -> bool {
        matches!(self.mode, AcceptanceMode::Auction { .. })
    }

    pub fn accepts(&self, payment: PaymentType) -> bool {
        self.payment_types.contains(&payment)
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner.id == user_id
    }
}

/// How a listing resolves incoming proposals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum AcceptanceMode {
    /// Many proposals may be pending; the owner picks one when the auction closes.
    Auction {
        #[serde(rename = "endDate")]
        end_date: DateTime<Utc>,
    },
    /// At most one pending proposal at a time.
    OneForOne,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SwapStatus {
    Pending,
    Active,
    Matched,
    Completed,
    Cancelled,
}

impl SwapStatus {
    /// Open listings still accept proposals and targeting.
    pub fn is_open(&self) -> bool {
        matches!(self, SwapStatus::Pending | SwapStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Active => "active",
            SwapStatus::Matched => "matched",
            SwapStatus::Completed => "completed",
            SwapStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Booking,
    Cash,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashBounds {
    pub min_amount: f64,
    pub max_amount: f64,
}

impl CashBounds {
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingOwner {
    pub id: Uuid,
    #[serde(default)]
    pub verified: bool,
    /// Average review rating, 0-5
    #[serde(default)]
    pub reputation: Option<f32>,
}

/// The reservation behind a listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub booking_type: Option<BookingType>,
    pub location: Location,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    pub value: f64,
    #[serde(default)]
    pub verified: bool,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    Hotel,
    VacationRental,
    Resort,
    Hostel,
    Bnb,
    Event,
    Concert,
    Sports,
    Theater,
    Flight,
    Train,
    Bus,
    Cruise,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Available,
    Locked,
    Swapped,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub country: String,
}

impl Location {
    pub fn same_country(&self, other: &Location) -> bool {
        !self.country.trim().is_empty()
            && self.country.trim().eq_ignore_ascii_case(other.country.trim())
    }

    pub fn same_city(&self, other: &Location) -> bool {
        self.same_country(other)
            && !self.city.trim().is_empty()
            && self.city.trim().eq_ignore_ascii_case(other.city.trim())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl DateRange {
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.check_in <= other.check_out && other.check_in <= self.check_out
    }

    /// Whole days between two non-overlapping ranges; 0 when they overlap.
    pub fn gap_days(&self, other: &DateRange) -> i64 {
        if self.overlaps(other) {
            return 0;
        }
        if self.check_out < other.check_in {
            (other.check_in - self.check_out).num_days()
        } else {
            (self.check_in - other.check_out).num_days()
        }
    }

    pub fn within(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.check_in >= from && self.check_out <= to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_overlap_and_gap() {
        let a = DateRange {
            check_in: date(2024, 6, 1),
            check_out: date(2024, 6, 5),
        };
        let b = DateRange {
            check_in: date(2024, 6, 2),
            check_out: date(2024, 6, 6),
        };
        let c = DateRange {
            check_in: date(2024, 6, 12),
            check_out: date(2024, 6, 14),
        };

        assert!(a.overlaps(&b));
        assert_eq!(a.gap_days(&b), 0);
        assert!(!a.overlaps(&c));
        assert_eq!(a.gap_days(&c), 7);
        assert_eq!(c.gap_days(&a), 7);
    }

    #[test]
    fn test_location_matching_is_case_insensitive() {
        let paris = Location {
            city: "Paris".to_string(),
            country: "France".to_string(),
        };
        let paris_lower = Location {
            city: "paris ".to_string(),
            country: "france".to_string(),
        };
        let paris_texas = Location {
            city: "Paris".to_string(),
            country: "USA".to_string(),
        };

        assert!(paris.same_city(&paris_lower));
        assert!(!paris.same_country(&paris_texas));
        assert!(!paris.same_city(&paris_texas));
    }

    #[test]
    fn test_listing_deserializes_tagged_mode() {
        let json = r#"{
            "id": "7d8f0e4a-1c2b-4d3e-8f9a-0b1c2d3e4f50",
            "owner": { "id": "1b2c3d4e-5f60-4a7b-8c9d-0e1f2a3b4c5d", "verified": true },
            "booking": {
                "id": "2c3d4e5f-6a7b-4c8d-9e0f-1a2b3c4d5e6f",
                "title": "Seaside hotel",
                "type": "hotel",
                "location": { "city": "Nice", "country": "France" },
                "dateRange": { "checkIn": "2024-07-01", "checkOut": "2024-07-04" },
                "value": 640.0,
                "status": "available"
            },
            "status": "pending",
            "mode": { "strategy": "auction", "endDate": "2024-06-20T12:00:00Z" },
            "paymentTypes": ["booking", "cash"],
            "proposalCount": 3,
            "createdAt": "2024-06-01T08:00:00Z"
        }"#;

        let listing: Listing = serde_json::from_str(json).unwrap();
        assert!(listing.is_auction());
        assert!(listing.accepts(PaymentType::Cash));
        assert_eq!(listing.booking.booking_type, Some(BookingType::Hotel));
        assert_eq!(listing.proposal_count, 3);
        assert!(listing.owner.reputation.is_none());

        let one_for_one: AcceptanceMode =
            serde_json::from_str(r#"{ "strategy": "one_for_one" }"#).unwrap();
        assert_eq!(one_for_one, AcceptanceMode::OneForOne);
    }
}
