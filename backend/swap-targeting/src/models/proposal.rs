use super::{BookingStatus, Listing, PaymentType};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_MESSAGE_LEN: usize = 500;

/// Offer made against another user's listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProposalRequest {
    Cash {
        amount: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Booking {
        #[serde(rename = "sourceSwapId")]
        source_swap_id: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl ProposalRequest {
    pub fn message(&self) -> Option<&str> {
        match self {
            ProposalRequest::Cash { message, .. } | ProposalRequest::Booking { message, .. } => {
                message.as_deref()
            }
        }
    }

    /// Check the proposal against the listing it targets.
    ///
    /// `own_listing` is the proposer's listing offered in a booking swap.
    pub fn validate(&self, target: &Listing, own_listing: Option<&Listing>) -> Result<()> {
        if !target.status.is_open() {
            return Err(AppError::Validation(
                "This swap is no longer accepting proposals".to_string(),
            ));
        }

        if let Some(message) = self.message() {
            if message.chars().count() > MAX_MESSAGE_LEN {
                return Err(AppError::Validation(format!(
                    "Message must be at most {} characters",
                    MAX_MESSAGE_LEN
                )));
            }
        }

        match self {
            ProposalRequest::Cash { amount, .. } => {
                if !target.accepts(PaymentType::Cash) {
                    return Err(AppError::Validation(
                        "This swap does not accept cash offers".to_string(),
                    ));
                }
                if !amount.is_finite() || *amount <= 0.0 {
                    return Err(AppError::Validation(
                        "Cash offer must be greater than zero".to_string(),
                    ));
                }
                if let Some(bounds) = target.cash_bounds {
                    if !bounds.contains(*amount) {
                        return Err(AppError::Validation(format!(
                            "Cash offer must be between {:.2} and {:.2}",
                            bounds.min_amount, bounds.max_amount
                        )));
                    }
                }
            }
            ProposalRequest::Booking { source_swap_id, .. } => {
                if !target.accepts(PaymentType::Booking) {
                    return Err(AppError::Validation(
                        "This swap only accepts cash offers".to_string(),
                    ));
                }
                let own = own_listing.ok_or_else(|| {
                    AppError::Validation("Select one of your swaps to offer".to_string())
                })?;
                if own.id != *source_swap_id {
                    return Err(AppError::Validation(
                        "Offered swap does not match the selected listing".to_string(),
                    ));
                }
                if own.id == target.id || own.owner.id == target.owner.id {
                    return Err(AppError::Validation(
                        "You cannot propose a swap with your own listing".to_string(),
                    ));
                }
                if !own.status.is_open() || own.booking.status != BookingStatus::Available {
                    return Err(AppError::Validation(
                        "The offered booking is not available for swapping".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Server acknowledgement of a submitted proposal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalAck {
    pub proposal_id: Uuid,
    pub status: String,
}
