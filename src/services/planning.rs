// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Planning service API client.
//!
//! Handles:
//! - Account registration and login (tokens go to the credential store)
//! - Capability snapshots
//! - Goal creation and feasibility evaluation
//! - Plan generation and plan/workout display data
//! - Error body extraction and session invalidation on 401

use crate::error::AppError;
use crate::models::{
    Capability, CapabilityRecord, FeasibilityResult, GoalProposal, GoalRecord, LoginRequest, Plan,
    RegisterRequest, TokenPair, Workout, WorkoutLog,
};
use crate::services::credentials::{self, CredentialStore};
use crate::time_utils::format_iso_date;
use chrono::{NaiveDate, Utc};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use validator::Validate;

/// Planning service client.
#[derive(Clone)]
pub struct PlanningClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl PlanningClient {
    /// Create a new client against `base_url` using `credentials` for tokens.
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Whether a usable access token is held.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_ok()
    }

    // ─── Account ─────────────────────────────────────────────────────────────

    /// Create an account and store the issued tokens.
    pub async fn register(&self, request: &RegisterRequest) -> Result<TokenPair, AppError> {
        request.validate()?;
        let url = self.url("/auth/register");
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let tokens: TokenPair = check_response_json(response).await?;
        self.credentials.set(&tokens)?;
        tracing::info!("Account registered");
        Ok(tokens)
    }

    /// Log in and store the issued tokens.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenPair, AppError> {
        request.validate()?;
        let url = self.url("/auth/login");
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let tokens: TokenPair = check_response_json(response).await?;
        self.credentials.set(&tokens)?;
        tracing::info!("Logged in");
        Ok(tokens)
    }

    /// Forget the stored tokens.
    pub fn logout(&self) -> Result<(), AppError> {
        self.credentials.clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    // ─── Capability ──────────────────────────────────────────────────────────

    /// Record a capability snapshot.
    pub async fn create_capability(
        &self,
        capability: &Capability,
    ) -> Result<CapabilityRecord, AppError> {
        let request = self.authed(Method::POST, "/capability")?.json(capability);
        self.send_json(request).await
    }

    /// Latest capability snapshot, or `None` if the user has none.
    pub async fn latest_capability(&self) -> Result<Option<CapabilityRecord>, AppError> {
        let request = self.authed(Method::GET, "/capability/latest")?;
        match self.send_json(request).await {
            Ok(record) => Ok(Some(record)),
            Err(AppError::Service {
                status: Some(404), ..
            }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // ─── Goals ───────────────────────────────────────────────────────────────

    /// Persist a goal proposal.
    pub async fn create_goal(&self, proposal: &GoalProposal) -> Result<GoalRecord, AppError> {
        let request = self.authed(Method::POST, "/goals")?.json(proposal);
        self.send_json(request).await
    }

    /// Ask the service whether a persisted goal is feasible.
    pub async fn feasibility(&self, goal_id: &str) -> Result<FeasibilityResult, AppError> {
        let path = format!("/goals/{}/feasibility", urlencoding::encode(goal_id));
        let request = self.authed(Method::POST, &path)?;
        self.send_json(request).await
    }

    // ─── Plans ───────────────────────────────────────────────────────────────

    /// Generate a plan for a goal.
    pub async fn generate_plan(&self, goal_id: &str) -> Result<Plan, AppError> {
        let path = format!(
            "/plans/goals/{}/generate-plan",
            urlencoding::encode(goal_id)
        );
        let request = self.authed(Method::POST, &path)?;
        self.send_json(request).await
    }

    /// The user's active plan.
    pub async fn current_plan(&self) -> Result<Plan, AppError> {
        let request = self.authed(Method::GET, "/plans/current")?;
        self.send_json(request).await
    }

    /// Workouts of a plan within an optional date window.
    pub async fn list_workouts(
        &self,
        plan_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Workout>, AppError> {
        let path = format!("/plans/{}/workouts", urlencoding::encode(plan_id));
        let mut query = Vec::new();
        if let Some(from) = from {
            query.push(("from", format_iso_date(from)));
        }
        if let Some(to) = to {
            query.push(("to", format_iso_date(to)));
        }
        let request = self.authed(Method::GET, &path)?.query(&query);
        self.send_json(request).await
    }

    /// Record what was actually done for a workout.
    pub async fn log_workout(&self, workout_id: &str, log: &WorkoutLog) -> Result<(), AppError> {
        log.validate()?;
        let path = format!("/workouts/{}/log", urlencoding::encode(workout_id));
        let request = self.authed(Method::POST, &path)?.json(log);
        let _: serde_json::Value = self.send_json(request).await?;
        tracing::info!(workout_id, "Workout logged");
        Ok(())
    }

    // ─── Plumbing ────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Current access token, or `Unauthorized` without calling the service.
    fn access_token(&self) -> Result<String, AppError> {
        let tokens = self.credentials.get()?.ok_or(AppError::Unauthorized)?;
        if credentials::is_expired(&tokens.access_token, Utc::now().timestamp()) {
            tracing::info!("Stored access token has expired");
            self.credentials.clear()?;
            return Err(AppError::Unauthorized);
        }
        Ok(tokens.access_token)
    }

    /// Build an authenticated request.
    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, AppError> {
        let token = self.access_token()?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    /// Send an authenticated request and parse the JSON response.
    ///
    /// A 401 invalidates the session: stored tokens are cleared.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = request.send().await.map_err(transport_error)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Service rejected access token (401), clearing session");
            self.credentials.clear()?;
            return Err(AppError::SessionExpired(error_message(401, &body)));
        }

        check_response_json(response).await
    }
}

/// Check response status and parse JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "Service returned an error");
        return Err(AppError::service(
            status.as_u16(),
            error_message(status.as_u16(), &body),
        ));
    }

    response.json().await.map_err(|e| AppError::Service {
        status: Some(status.as_u16()),
        message: format!("JSON parse error: {}", e),
    })
}

fn transport_error(e: reqwest::Error) -> AppError {
    AppError::Service {
        status: None,
        message: format!("Request failed: {}", e),
    }
}

/// Extract a human-readable message from an error body.
///
/// Prefers a JSON `detail` field, then the JSON body itself, then the raw
/// text, then a generic `HTTP <status>`.
pub fn error_message(status: u16, body: &str) -> String {
    let message = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => match json.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(detail) if !detail.is_null() => detail.to_string(),
            _ => json.to_string(),
        },
        Err(_) => body.trim().to_string(),
    };

    if message.is_empty() {
        format!("HTTP {}", status)
    } else {
        message
    }
}
