// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Current fitness baseline ("what distance is comfortable right now").

use crate::error::AppError;
use crate::units::{self, DistanceUnit};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Capability as entered by the user, before conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapabilityDraft {
    /// Comfortable distance in `unit`
    pub distance: f64,
    pub unit: DistanceUnit,
    pub minutes: f64,
    pub seconds: f64,
}

impl CapabilityDraft {
    /// Convert to canonical units, rejecting zero distance and negative time.
    pub fn to_capability(&self, as_of: NaiveDate) -> Result<Capability, AppError> {
        let comfortable_distance_m = units::to_meters(self.distance, self.unit)?;
        if comfortable_distance_m == 0 {
            return Err(AppError::Validation(
                "distance must be greater than zero".to_string(),
            ));
        }
        let comfortable_time_sec = units::time_to_sec(self.minutes, self.seconds)?;

        Ok(Capability {
            date: as_of,
            comfortable_distance_m,
            comfortable_time_sec,
        })
    }
}

/// Capability body for `POST /capability`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// As-of date
    pub date: NaiveDate,
    pub comfortable_distance_m: u32,
    pub comfortable_time_sec: u32,
}

/// Stored capability snapshot returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct CapabilityRecord {
    pub id: String,
    pub date: NaiveDate,
    pub comfortable_distance_m: u32,
    pub comfortable_time_sec: u32,
    /// Race predictions and pace zones derived by the service
    #[serde(default)]
    pub projection: serde_json::Value,
}

impl CapabilityRecord {
    pub fn baseline(&self) -> Baseline {
        Baseline {
            distance_m: self.comfortable_distance_m,
            time_sec: self.comfortable_time_sec,
        }
    }
}

/// Distance/time pair carried into goal drafting as defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub distance_m: u32,
    pub time_sec: u32,
}

impl From<&Capability> for Baseline {
    fn from(cap: &Capability) -> Self {
        Self {
            distance_m: cap.comfortable_distance_m,
            time_sec: cap.comfortable_time_sec,
        }
    }
}
