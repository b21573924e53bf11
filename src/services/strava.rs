// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching the athlete's activity history.
//!
//! Handles:
//! - Paginated listing until an empty page is returned
//! - A single token refresh when the first page is rejected with 401
//! - Holding the current access/refresh pair for later calls

use crate::error::AppError;
use crate::models::Activity;
use crate::services::activity_cache::ActivitySource;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Page size requested from the activity list endpoint (Strava maximum).
pub const ACTIVITIES_PER_PAGE: u32 = 200;

const FIRST_PAGE: u32 = 1;

/// Access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StravaCredentials {
    pub access_token: String,
    pub refresh_token: String,
}

/// Strava API client.
///
/// Clones share the same credential pair.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    credentials: Arc<Mutex<StravaCredentials>>,
}

impl StravaClient {
    /// Create a new Strava client with OAuth app credentials and a token pair.
    pub fn new(
        base_url: impl Into<String>,
        token_url: impl Into<String>,
        client_id: String,
        client_secret: String,
        credentials: StravaCredentials,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_url: token_url.into(),
            client_id,
            client_secret,
            credentials: Arc::new(Mutex::new(credentials)),
        }
    }

    /// Current credential pair.
    pub async fn credentials(&self) -> StravaCredentials {
        self.credentials.lock().await.clone()
    }

    /// Fetch the complete activity history, page by page.
    ///
    /// Only the first page gets a refresh-and-retry on 401. A 401 on the
    /// retry, or on any later page, is returned as `StravaAuth`.
    pub async fn fetch_all_activities(&self) -> Result<Vec<Activity>, AppError> {
        let token = self.credentials.lock().await.access_token.clone();

        let mut batch = match self.list_activities(&token, FIRST_PAGE).await {
            Err(e) if e.is_strava_token_error() => {
                tracing::info!("Strava access token rejected, refreshing");
                let refreshed = self.refresh_credentials(&token).await?;
                self.list_activities(&refreshed, FIRST_PAGE).await?
            }
            other => other?,
        };

        let mut activities = Vec::new();
        let mut page = FIRST_PAGE;

        while !batch.is_empty() {
            activities.extend(batch);
            page += 1;

            let token = self.credentials.lock().await.access_token.clone();
            batch = self.list_activities(&token, page).await?;
        }

        tracing::info!(
            count = activities.len(),
            pages = page - 1,
            "Fetched Strava activity history"
        );
        Ok(activities)
    }

    /// List one page of the athlete's activities.
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
    ) -> Result<Vec<Activity>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);
        tracing::debug!(page, per_page = ACTIVITIES_PER_PAGE, "Fetching activity page");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("per_page", ACTIVITIES_PER_PAGE.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Exchange the held refresh token for a new pair and store it.
    ///
    /// `stale_access_token` is the token that was rejected. If another task
    /// already replaced it, that newer token is returned without a refresh.
    async fn refresh_credentials(&self, stale_access_token: &str) -> Result<String, AppError> {
        let mut credentials = self.credentials.lock().await;

        if credentials.access_token != stale_access_token {
            tracing::debug!("Strava token already refreshed by another request");
            return Ok(credentials.access_token.clone());
        }

        let refreshed = self.refresh_token(&credentials.refresh_token).await?;
        *credentials = StravaCredentials {
            access_token: refreshed.access_token,
            refresh_token: refreshed.refresh_token,
        };

        tracing::info!(expires_at = refreshed.expires_at, "Strava token refreshed");
        Ok(credentials.access_token.clone())
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Strava token refresh failed");
            return Err(AppError::StravaAuth(format!(
                "Token refresh failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaAuth(format!("Failed to parse token response: {}", e)))
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 {
                return Err(AppError::StravaAuth("Access token rejected (HTTP 401)".to_string()));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl ActivitySource for StravaClient {
    async fn fetch_all_activities(&self) -> Result<Vec<Activity>, AppError> {
        StravaClient::fetch_all_activities(self).await
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}
