// ============================================
// Targeting Layer
// ============================================
//
// Decides whether the user's active listing may target a candidate listing
// and how well the two fit.
//
// - TargetabilityEvaluator: rule-based eligibility + scoring with
//   configurable weights
// - TargetingContext: who is browsing and what they already target

pub mod evaluator;

pub use evaluator::{
    TargetabilityEvaluator, TargetingContext, TargetingWeights, RESTRICTION_ALREADY_TARGETING,
    RESTRICTION_AUCTION_ENDED, RESTRICTION_NOT_AVAILABLE, RESTRICTION_NO_ACTIVE_SWAP,
    RESTRICTION_OWN_SWAP, RESTRICTION_PROPOSAL_PENDING, WARNING_ENDING_SOON,
    WARNING_HIGH_COMPETITION, WARNING_SOME_COMPETITION, WARNING_VALUE_DIFFERENCE,
};
