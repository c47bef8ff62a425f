// ============================================
// Targetability Evaluator
// ============================================
//
// Pure function of (context, candidate, now). Recomputed on every browse
// pass, so it must stay cheap and allocation-light.
//
// Signals:
// - Eligibility: ownership, listing status, existing target, mode rules
// - Mode bonus: auction time remaining vs one-for-one exclusivity
// - Competition: existing proposals on auction listings
// - Compatibility: location, booking type, dates, value, owner trust

use crate::models::{AcceptanceMode, Listing, TargetabilityResult, TargetingRelationship};
use crate::utils::{clamp_score, percent_difference};
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

pub const RESTRICTION_NO_ACTIVE_SWAP: &str = "No active swap";
pub const RESTRICTION_OWN_SWAP: &str = "Cannot target your own swap";
pub const RESTRICTION_NOT_AVAILABLE: &str = "Swap is no longer available";
pub const RESTRICTION_ALREADY_TARGETING: &str = "Already targeting this swap";
pub const RESTRICTION_AUCTION_ENDED: &str = "Auction has ended";
pub const RESTRICTION_PROPOSAL_PENDING: &str = "Proposal pending";

pub const WARNING_ENDING_SOON: &str = "Auction ending soon";
pub const WARNING_HIGH_COMPETITION: &str = "High competition";
pub const WARNING_SOME_COMPETITION: &str = "Some competition";
pub const WARNING_VALUE_DIFFERENCE: &str = "Significant value difference";

/// Who is browsing, and what they already target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetingContext<'a> {
    pub current_user_id: Option<Uuid>,
    /// The user's own active listing; `None` means no targeting context
    pub active_listing: Option<&'a Listing>,
    pub current_target: Option<&'a TargetingRelationship>,
}

impl<'a> TargetingContext<'a> {
    pub fn new(
        current_user_id: Option<Uuid>,
        active_listing: Option<&'a Listing>,
        current_target: Option<&'a TargetingRelationship>,
    ) -> Self {
        Self {
            current_user_id,
            active_listing,
            current_target,
        }
    }

    pub fn is_targeting(&self, candidate_id: Uuid) -> bool {
        self.current_target
            .map(|t| t.target_swap_id == candidate_id)
            .unwrap_or(false)
    }
}

/// Configurable weights for targetability scoring
#[derive(Debug, Clone)]
pub struct TargetingWeights {
    /// Starting score for an eligible candidate
    pub base_score: f32,

    pub auction_bonus: f32,
    pub one_for_one_bonus: f32,
    /// Time-remaining bonuses for > 24h, > 6h, > 1h
    pub time_remaining_bonus: [f32; 3],

    pub competition_penalty_per_proposal: f32,
    pub competition_penalty_cap: f32,
    pub high_competition_threshold: u32,
    pub some_competition_threshold: u32,

    pub same_country_compat: f32,
    pub same_city_compat: f32,

    pub same_type_score: f32,
    pub same_type_compat: f32,

    pub date_overlap_score: f32,
    pub date_overlap_compat: f32,
    /// (score, compatibility) when the stays are at most a week apart
    pub dates_within_week: (f32, f32),
    /// (score, compatibility) when the stays are at most a month apart
    pub dates_within_month: (f32, f32),

    /// (score, compatibility) for a value difference of at most 10%
    pub value_close: (f32, f32),
    /// (score, compatibility) for a value difference of at most 25%
    pub value_fair: (f32, f32),
    /// Difference in percent above which a warning is attached
    pub value_warning_percent: f64,

    pub verified_owner: (f32, f32),
    pub reputation: (f32, f32),
    pub reputation_threshold: f32,

    pub success_compat_weight: f32,
    pub success_score_weight: f32,
    pub success_auction_bonus: f32,
    pub success_one_for_one_bonus: f32,
    pub success_penalty_per_proposal: f32,
}

impl Default for TargetingWeights {
    fn default() -> Self {
        Self {
            base_score: 50.0,
            auction_bonus: 20.0,
            one_for_one_bonus: 10.0,
            time_remaining_bonus: [10.0, 5.0, 2.0],
            competition_penalty_per_proposal: 8.0,
            competition_penalty_cap: 30.0,
            high_competition_threshold: 5,
            some_competition_threshold: 2,
            same_country_compat: 20.0,
            same_city_compat: 10.0,
            same_type_score: 15.0,
            same_type_compat: 15.0,
            date_overlap_score: 15.0,
            date_overlap_compat: 25.0,
            dates_within_week: (10.0, 15.0),
            dates_within_month: (5.0, 5.0),
            value_close: (15.0, 20.0),
            value_fair: (8.0, 10.0),
            value_warning_percent: 50.0,
            verified_owner: (5.0, 10.0),
            reputation: (5.0, 5.0),
            reputation_threshold: 4.0,
            success_compat_weight: 0.6,
            success_score_weight: 0.3,
            success_auction_bonus: 10.0,
            success_one_for_one_bonus: 20.0,
            success_penalty_per_proposal: 5.0,
        }
    }
}

/// Running totals while a candidate is still eligible.
#[derive(Debug, Default)]
struct Tally {
    score: f32,
    compatibility: f32,
    warnings: Vec<String>,
}

impl Tally {
    fn add(&mut self, (score, compatibility): (f32, f32)) {
        self.score += score;
        self.compatibility += compatibility;
    }

    fn warn(&mut self, warning: &str) {
        self.warnings.push(warning.to_string());
    }
}

/// Targetability evaluator
#[derive(Debug, Clone, Default)]
pub struct TargetabilityEvaluator {
    weights: TargetingWeights,
}

impl TargetabilityEvaluator {
    /// Create evaluator with default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom weights
    pub fn with_weights(weights: TargetingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &TargetingWeights {
        &self.weights
    }

    /// Evaluate one candidate for the browsing user at instant `now`.
    pub fn evaluate(
        &self,
        ctx: &TargetingContext<'_>,
        candidate: &Listing,
        now: DateTime<Utc>,
    ) -> TargetabilityResult {
        let (user_id, active) = match (ctx.current_user_id, ctx.active_listing) {
            (Some(user_id), Some(active)) => (user_id, active),
            _ => return TargetabilityResult::blocked(RESTRICTION_NO_ACTIVE_SWAP),
        };

        if candidate.is_owned_by(user_id) {
            return TargetabilityResult::blocked(RESTRICTION_OWN_SWAP);
        }
        if !candidate.status.is_open() {
            return TargetabilityResult::blocked(RESTRICTION_NOT_AVAILABLE);
        }
        if ctx.is_targeting(candidate.id) {
            return TargetabilityResult::blocked(RESTRICTION_ALREADY_TARGETING);
        }

        let w = &self.weights;
        let mut tally = Tally {
            score: w.base_score,
            ..Default::default()
        };

        match candidate.mode {
            AcceptanceMode::Auction { end_date } => {
                if now >= end_date {
                    return TargetabilityResult::blocked(RESTRICTION_AUCTION_ENDED);
                }
                tally.score += w.auction_bonus;
                self.apply_time_remaining(&mut tally, end_date, now);
                self.apply_competition(&mut tally, candidate.proposal_count);
            }
            AcceptanceMode::OneForOne => {
                if candidate.proposal_count > 0 {
                    return TargetabilityResult::blocked(RESTRICTION_PROPOSAL_PENDING);
                }
                tally.score += w.one_for_one_bonus;
            }
        }

        self.apply_compatibility(&mut tally, active, candidate);

        let score = clamp_score(tally.score);
        let compatibility = clamp_score(tally.compatibility);
        let success_rate = self.compute_success_rate(score, compatibility, candidate);

        debug!(
            candidate_id = %candidate.id,
            score = score,
            compatibility = compatibility,
            success_rate = success_rate,
            warnings = tally.warnings.len(),
            "Targetability computed"
        );

        TargetabilityResult {
            can_target: true,
            score,
            compatibility,
            success_rate,
            restrictions: Vec::new(),
            warnings: tally.warnings,
        }
    }

    /// Tiered bonus for auctions with time left; warns when closing soon.
    fn apply_time_remaining(&self, tally: &mut Tally, end_date: DateTime<Utc>, now: DateTime<Utc>) {
        let hours_left = (end_date - now).num_seconds() as f32 / 3600.0;
        let [day, quarter_day, hour] = self.weights.time_remaining_bonus;

        if hours_left > 24.0 {
            tally.score += day;
        } else if hours_left > 6.0 {
            tally.score += quarter_day;
        } else if hours_left > 1.0 {
            tally.score += hour;
        } else {
            tally.warn(WARNING_ENDING_SOON);
        }
    }

    fn apply_competition(&self, tally: &mut Tally, proposal_count: u32) {
        let w = &self.weights;
        let penalty = (proposal_count as f32 * w.competition_penalty_per_proposal)
            .min(w.competition_penalty_cap);
        tally.score -= penalty;

        if proposal_count >= w.high_competition_threshold {
            tally.warn(WARNING_HIGH_COMPETITION);
        } else if proposal_count >= w.some_competition_threshold {
            tally.warn(WARNING_SOME_COMPETITION);
        }
    }

    fn apply_compatibility(&self, tally: &mut Tally, active: &Listing, candidate: &Listing) {
        let w = &self.weights;
        let mine = &active.booking;
        let theirs = &candidate.booking;

        if mine.location.same_country(&theirs.location) {
            tally.compatibility += w.same_country_compat;
            if mine.location.same_city(&theirs.location) {
                tally.compatibility += w.same_city_compat;
            }
        }

        if let (Some(a), Some(b)) = (mine.booking_type, theirs.booking_type) {
            if a == b {
                tally.add((w.same_type_score, w.same_type_compat));
            }
        }

        if let (Some(a), Some(b)) = (&mine.date_range, &theirs.date_range) {
            if a.overlaps(b) {
                tally.add((w.date_overlap_score, w.date_overlap_compat));
            } else {
                match a.gap_days(b) {
                    0..=7 => tally.add(w.dates_within_week),
                    8..=30 => tally.add(w.dates_within_month),
                    _ => {}
                }
            }
        }

        if let Some(diff) = percent_difference(mine.value, theirs.value) {
            if diff <= 10.0 {
                tally.add(w.value_close);
            } else if diff <= 25.0 {
                tally.add(w.value_fair);
            } else if diff > w.value_warning_percent {
                tally.warn(WARNING_VALUE_DIFFERENCE);
            }
        }

        if candidate.owner.verified {
            tally.add(w.verified_owner);
        }

        if candidate
            .owner
            .reputation
            .map(|r| r > w.reputation_threshold)
            .unwrap_or(false)
        {
            tally.add(w.reputation);
        }
    }

    fn compute_success_rate(&self, score: f32, compatibility: f32, candidate: &Listing) -> f32 {
        let w = &self.weights;
        let mode_bonus = if candidate.is_auction() {
            w.success_auction_bonus
        } else {
            w.success_one_for_one_bonus
        };

        let raw = w.success_compat_weight * compatibility
            + w.success_score_weight * score
            + mode_bonus
            - w.success_penalty_per_proposal * candidate.proposal_count as f32;

        clamp_score(raw).round()
    }
}
