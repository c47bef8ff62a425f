use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed link from the user's active listing to the listing they want.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TargetingRelationship {
    pub source_swap_id: Uuid,
    pub target_swap_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Server-side view of a user's targeting state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TargetingActivity {
    #[serde(default)]
    pub current_target: Option<TargetingRelationship>,
    #[serde(default)]
    pub incoming_target_count: u32,
}

/// Eligibility plus ranking score for one candidate listing.
///
/// Derived on every browse pass and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetabilityResult {
    pub can_target: bool,
    /// 0-100
    pub score: f32,
    /// 0-100
    pub compatibility: f32,
    /// 0-100, rounded
    pub success_rate: f32,
    pub restrictions: Vec<String>,
    pub warnings: Vec<String>,
}

impl TargetabilityResult {
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            can_target: false,
            score: 0.0,
            compatibility: 0.0,
            success_rate: 0.0,
            restrictions: vec![reason.into()],
            warnings: Vec::new(),
        }
    }
}
