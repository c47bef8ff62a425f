#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use swap_targeting::models::{
    AcceptanceMode, Booking, BookingStatus, BookingType, DateRange, Listing, ListingOwner,
    Location, PaymentType, SwapStatus,
};
use uuid::Uuid;

/// Fixed evaluation instant so tests never depend on the wall clock.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct ListingBuilder {
    listing: Listing,
}

impl ListingBuilder {
    pub fn new() -> Self {
        Self {
            listing: Listing {
                id: Uuid::new_v4(),
                owner: ListingOwner {
                    id: Uuid::new_v4(),
                    verified: false,
                    reputation: None,
                },
                booking: Booking {
                    id: Uuid::new_v4(),
                    title: "Hotel room".to_string(),
                    description: String::new(),
                    booking_type: Some(BookingType::Hotel),
                    location: Location {
                        city: "Paris".to_string(),
                        country: "France".to_string(),
                    },
                    date_range: None,
                    value: 500.0,
                    verified: true,
                    status: BookingStatus::Available,
                },
                status: SwapStatus::Pending,
                mode: AcceptanceMode::OneForOne,
                payment_types: vec![PaymentType::Booking],
                cash_bounds: None,
                proposal_count: 0,
                created_at: now() - Duration::days(1),
            },
        }
    }

    pub fn owner(mut self, owner: Uuid) -> Self {
        self.listing.owner.id = owner;
        self
    }

    pub fn verified_owner(mut self) -> Self {
        self.listing.owner.verified = true;
        self
    }

    pub fn reputation(mut self, reputation: f32) -> Self {
        self.listing.owner.reputation = Some(reputation);
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.listing.booking.title = title.to_string();
        self
    }

    pub fn location(mut self, city: &str, country: &str) -> Self {
        self.listing.booking.location = Location {
            city: city.to_string(),
            country: country.to_string(),
        };
        self
    }

    pub fn booking_type(mut self, booking_type: Option<BookingType>) -> Self {
        self.listing.booking.booking_type = booking_type;
        self
    }

    pub fn dates(mut self, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        self.listing.booking.date_range = Some(DateRange {
            check_in,
            check_out,
        });
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.listing.booking.value = value;
        self
    }

    pub fn status(mut self, status: SwapStatus) -> Self {
        self.listing.status = status;
        self
    }

    pub fn auction_ending(mut self, end_date: DateTime<Utc>) -> Self {
        self.listing.mode = AcceptanceMode::Auction { end_date };
        self
    }

    pub fn proposals(mut self, count: u32) -> Self {
        self.listing.proposal_count = count;
        self
    }

    pub fn created(mut self, created_at: DateTime<Utc>) -> Self {
        self.listing.created_at = created_at;
        self
    }

    pub fn payment_types(mut self, payment_types: Vec<PaymentType>) -> Self {
        self.listing.payment_types = payment_types;
        self
    }

    pub fn build(self) -> Listing {
        self.listing
    }
}

impl Default for ListingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
