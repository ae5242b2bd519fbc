// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Coach onboarding: capability capture, goal negotiation and plan display
//! for a running-coach planning service.
//!
//! The core is [`negotiation::Session`], which walks a user from their current
//! fitness baseline to a goal the service judges feasible, applying the
//! service's tradeoff recommendations along the way, and then commits the
//! goal to plan generation.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod negotiation;
pub mod services;
pub mod time_utils;
pub mod units;

use config::Config;
use services::{FileCredentialStore, PlanningClient};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub client: PlanningClient,
}

impl AppState {
    /// Build state with file-backed credentials from `config`.
    pub fn from_config(config: Config) -> Self {
        let credentials = Arc::new(FileCredentialStore::new(config.credentials_path.clone()));
        let client = PlanningClient::new(config.api_base_url.clone(), credentials);
        Self { config, client }
    }
}
