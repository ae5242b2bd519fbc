// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal drafts and goals persisted by the service.

use crate::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Working draft of a goal. Never carries a server identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProposal {
    pub distance_m: u32,
    /// Target finish time; `None` means "just finish"
    pub target_time_sec: Option<u32>,
    pub target_date: NaiveDate,
}

impl GoalProposal {
    pub fn new(distance_m: u32, target_time_sec: Option<u32>, target_date: NaiveDate) -> Self {
        Self {
            distance_m,
            target_time_sec,
            target_date,
        }
    }

    /// Reject values the service must never receive.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.distance_m == 0 {
            return Err(AppError::Validation(
                "goal distance must be greater than zero".to_string(),
            ));
        }
        if self.target_time_sec == Some(0) {
            return Err(AppError::Validation(
                "goal target time must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Goal record returned by `POST /goals`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoalRecord {
    pub id: String,
    pub distance_m: u32,
    pub target_time_sec: Option<u32>,
    pub target_date: NaiveDate,
}

/// A proposal the service has accepted and assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedGoal {
    pub id: String,
    pub proposal: GoalProposal,
}

impl From<GoalRecord> for SubmittedGoal {
    fn from(record: GoalRecord) -> Self {
        Self {
            id: record.id,
            proposal: GoalProposal {
                distance_m: record.distance_m,
                target_time_sec: record.target_time_sec,
                target_date: record.target_date,
            },
        }
    }
}

/// Standard race distances offered when drafting a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistancePreset {
    FiveK,
    TenK,
    Half,
    Marathon,
}

impl DistancePreset {
    pub const ALL: [DistancePreset; 4] = [
        DistancePreset::FiveK,
        DistancePreset::TenK,
        DistancePreset::Half,
        DistancePreset::Marathon,
    ];

    pub fn meters(self) -> u32 {
        match self {
            DistancePreset::FiveK => 5_000,
            DistancePreset::TenK => 10_000,
            DistancePreset::Half => 21_097,
            DistancePreset::Marathon => 42_195,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DistancePreset::FiveK => "5K",
            DistancePreset::TenK => "10K",
            DistancePreset::Half => "Half",
            DistancePreset::Marathon => "Marathon",
        }
    }
}

impl fmt::Display for DistancePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DistancePreset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "5k" => Ok(DistancePreset::FiveK),
            "10k" => Ok(DistancePreset::TenK),
            "half" | "half-marathon" | "hm" => Ok(DistancePreset::Half),
            "marathon" | "full" => Ok(DistancePreset::Marathon),
            other => Err(AppError::Validation(format!(
                "unknown race distance '{}'",
                other
            ))),
        }
    }
}
