use super::token::{inspect_token, TokenInspection};
use crate::client::SwapApiClient;
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    Standard,
    Targeting,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProbeEndpoint {
    pub name: String,
    pub path: String,
    pub kind: EndpointKind,
}

impl ProbeEndpoint {
    pub fn new(name: &str, path: &str, kind: EndpointKind) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind,
        }
    }

    /// `/api/swaps` plus the user's targeting activity when a user is known.
    pub fn defaults(user_id: Option<Uuid>) -> Vec<Self> {
        let mut endpoints = vec![Self::new(
            "swaps",
            "/api/swaps?page=1&limit=1",
            EndpointKind::Standard,
        )];
        if let Some(user_id) = user_id {
            endpoints.push(Self::new(
                "targeting-activity",
                &format!("/api/users/{}/targeting-activity", user_id),
                EndpointKind::Targeting,
            ));
        }
        endpoints
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub name: String,
    pub kind: EndpointKind,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl ProbeResult {
    pub fn is_authorized(&self) -> bool {
        matches!(self.status, Some(status) if (200..300).contains(&status))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointComparison {
    pub checked_at: DateTime<Utc>,
    pub results: Vec<ProbeResult>,
    /// At least one probe accepted the token while another rejected it
    pub inconsistent: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
    pub token: TokenInspection,
    pub comparisons: Vec<EndpointComparison>,
    pub inconsistency_count: usize,
}

#[derive(Debug)]
enum SessionState {
    Idle,
    Running {
        started_at: DateTime<Utc>,
        comparisons: Vec<EndpointComparison>,
    },
}

/// Explicitly constructed auth diagnostic session.
///
/// Lifecycle: `start` → any number of `compare_endpoints` → `stop`.
#[derive(Debug)]
pub struct AuthDiagnosticSession {
    client: SwapApiClient,
    endpoints: Vec<ProbeEndpoint>,
    state: SessionState,
}

impl AuthDiagnosticSession {
    pub fn new(client: SwapApiClient, endpoints: Vec<ProbeEndpoint>) -> Self {
        Self {
            client,
            endpoints,
            state: SessionState::Idle,
        }
    }

    pub fn with_default_endpoints(client: SwapApiClient, user_id: Option<Uuid>) -> Self {
        Self::new(client, ProbeEndpoint::defaults(user_id))
    }

    pub fn endpoints(&self) -> &[ProbeEndpoint] {
        &self.endpoints
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running { .. })
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.is_running() {
            return Err(AppError::InvalidState(
                "Diagnostic session already running".to_string(),
            ));
        }

        self.state = SessionState::Running {
            started_at: now,
            comparisons: Vec::new(),
        };
        info!(
            endpoints = self.endpoints.len(),
            has_token = self.client.token().is_some(),
            "Auth diagnostic session started"
        );
        Ok(())
    }

    pub fn inspect_token(&self, now: DateTime<Utc>) -> TokenInspection {
        inspect_token(self.client.token(), now)
    }

    /// Probe every endpoint in order with the same token.
    pub async fn compare_endpoints(&mut self, now: DateTime<Utc>) -> Result<EndpointComparison> {
        if !self.is_running() {
            return Err(AppError::InvalidState(
                "Diagnostic session is not running".to_string(),
            ));
        }

        let mut results = Vec::with_capacity(self.endpoints.len());
        for endpoint in &self.endpoints {
            let started = Instant::now();
            let outcome = self.client.probe_status(&endpoint.path).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let (status, error) = match outcome {
                Ok(status) => (Some(status), None),
                Err(e) => (None, Some(e.to_string())),
            };
            results.push(ProbeResult {
                name: endpoint.name.clone(),
                kind: endpoint.kind,
                status,
                error,
                elapsed_ms,
            });
        }

        let inconsistent = results.iter().any(ProbeResult::is_authorized)
            && results.iter().any(ProbeResult::is_rejected);

        if inconsistent {
            warn!(
                rejected = ?results
                    .iter()
                    .filter(|r| r.is_rejected())
                    .map(|r| r.name.as_str())
                    .collect::<Vec<_>>(),
                "Token accepted by some endpoints and rejected by others"
            );
        } else {
            info!(probes = results.len(), "Endpoints agree on token");
        }

        let comparison = EndpointComparison {
            checked_at: now,
            results,
            inconsistent,
        };

        if let SessionState::Running { comparisons, .. } = &mut self.state {
            comparisons.push(comparison.clone());
        }
        Ok(comparison)
    }

    /// End the session and hand back everything it recorded.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<DiagnosticReport> {
        let (started_at, comparisons) =
            match std::mem::replace(&mut self.state, SessionState::Idle) {
                SessionState::Running {
                    started_at,
                    comparisons,
                } => (started_at, comparisons),
                SessionState::Idle => {
                    return Err(AppError::InvalidState(
                        "Diagnostic session is not running".to_string(),
                    ))
                }
            };

        let inconsistency_count = comparisons.iter().filter(|c| c.inconsistent).count();
        info!(
            comparisons = comparisons.len(),
            inconsistencies = inconsistency_count,
            "Auth diagnostic session stopped"
        );

        Ok(DiagnosticReport {
            started_at,
            stopped_at: now,
            token: self.inspect_token(now),
            comparisons,
            inconsistency_count,
        })
    }
}
