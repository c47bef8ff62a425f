/// Swap marketplace REST API client
///
/// Thin JSON client over the marketplace endpoints used while browsing and
/// targeting. Every request carries `Authorization: Bearer <token>` when a
/// token is configured. Failures are returned once, never retried.
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    Listing, ProposalAck, ProposalRequest, TargetingActivity, TargetingRelationship,
};
use crate::services::feed::ListingSource;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Response body of `GET /api/swaps`
#[derive(Debug, Deserialize)]
struct SwapsPage {
    swaps: Vec<Listing>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TargetRequest {
    target_swap_id: Uuid,
}

#[derive(Clone)]
pub struct SwapApiClient {
    client: Client,
    /// API origin, e.g. "https://swaps.example.com"
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for SwapApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl SwapApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            config.api_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = self.authorized(request).send().await.map_err(|e| {
            error!("Request failed ({}): {}", what, e);
            AppError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = AppError::from_status(status, &body);
        if err.is_unauthorized() {
            warn!(status = status.as_u16(), "Unauthorized response ({})", what);
        } else {
            error!(status = status.as_u16(), "API error ({}): {}", what, err);
        }
        Err(err)
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `GET /api/swaps?page=&limit=`
    pub async fn list_swaps(&self, page: u32, limit: u32) -> Result<Vec<Listing>> {
        let request = self
            .client
            .get(self.url("/api/swaps"))
            .query(&[("page", page), ("limit", limit)]);

        let response = self.send(request, "list swaps").await?;
        let body: SwapsPage = Self::json(response).await?;

        debug!(page = page, count = body.swaps.len(), "Fetched swaps page");
        Ok(body.swaps)
    }

    /// `GET /api/swaps/{id}`
    pub async fn get_swap(&self, swap_id: Uuid) -> Result<Listing> {
        let request = self.client.get(self.url(&format!("/api/swaps/{}", swap_id)));
        let response = self.send(request, "get swap").await?;
        Self::json(response).await
    }

    /// `GET /api/users/{id}/targeting-activity`
    pub async fn targeting_activity(&self, user_id: Uuid) -> Result<TargetingActivity> {
        let request = self.client.get(self.url(&format!(
            "/api/users/{}/targeting-activity",
            user_id
        )));
        let response = self.send(request, "targeting activity").await?;
        Self::json(response).await
    }

    /// `POST /api/swaps/{source}/target`
    pub async fn target_swap(
        &self,
        source_swap_id: Uuid,
        target_swap_id: Uuid,
    ) -> Result<TargetingRelationship> {
        if source_swap_id == target_swap_id {
            return Err(AppError::Validation(
                "A swap cannot target itself".to_string(),
            ));
        }

        let request = self
            .client
            .post(self.url(&format!("/api/swaps/{}/target", source_swap_id)))
            .json(&TargetRequest { target_swap_id });
        let response = self.send(request, "target swap").await?;
        let relationship: TargetingRelationship = Self::json(response).await?;

        info!(
            source_swap_id = %source_swap_id,
            target_swap_id = %target_swap_id,
            "Swap targeted"
        );
        Ok(relationship)
    }

    /// `DELETE /api/swaps/{source}/target`
    pub async fn remove_target(&self, source_swap_id: Uuid) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("/api/swaps/{}/target", source_swap_id)));
        self.send(request, "remove target").await?;

        info!(source_swap_id = %source_swap_id, "Swap target removed");
        Ok(())
    }

    /// Validate locally, then `POST /api/swaps/{id}/proposals`.
    pub async fn submit_proposal(
        &self,
        target: &Listing,
        own_listing: Option<&Listing>,
        proposal: &ProposalRequest,
    ) -> Result<ProposalAck> {
        proposal.validate(target, own_listing)?;

        let request = self
            .client
            .post(self.url(&format!("/api/swaps/{}/proposals", target.id)))
            .json(proposal);
        let response = self.send(request, "submit proposal").await?;
        let ack: ProposalAck = Self::json(response).await?;

        info!(
            swap_id = %target.id,
            proposal_id = %ack.proposal_id,
            "Proposal submitted"
        );
        Ok(ack)
    }

    /// Raw status code of an authenticated `GET`, without error mapping.
    pub async fn probe_status(&self, path: &str) -> Result<u16> {
        let request = self.authorized(self.client.get(self.url(path)));
        let response = request.send().await?;
        Ok(response.status().as_u16())
    }
}

#[async_trait]
impl ListingSource for SwapApiClient {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<Listing>> {
        self.list_swaps(page, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let client =
            SwapApiClient::new("http://localhost:3001/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/api/swaps"), "http://localhost:3001/api/swaps");
    }

    #[test]
    fn test_blank_token_ignored() {
        let client = SwapApiClient::new(
            "http://localhost:3001",
            Some("  ".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(client.token().is_none());
        assert!(!format!("{:?}", client).contains("  "));
    }
}
