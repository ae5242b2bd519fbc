// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feasibility verdicts and the tradeoffs the service recommends.

use crate::units;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of `POST /goals/{id}/feasibility`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityResult {
    pub feasible: bool,
    #[serde(default)]
    pub reasons: Vec<String>,
    /// In service order, which is treated as priority
    #[serde(default)]
    pub tradeoffs: Vec<Tradeoff>,
}

impl FeasibilityResult {
    /// Infeasible with nothing to apply: only a manual edit can help.
    pub fn is_stuck(&self) -> bool {
        !self.feasible && self.tradeoffs.is_empty()
    }
}

/// Goal field a tradeoff adjusts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Lever {
    Date,
    Time,
    Distance,
    /// Lever this client does not know yet
    Other(String),
}

impl From<String> for Lever {
    fn from(s: String) -> Self {
        match s.as_str() {
            "date" => Lever::Date,
            "time" => Lever::Time,
            "distance" => Lever::Distance,
            _ => Lever::Other(s),
        }
    }
}

impl From<Lever> for String {
    fn from(lever: Lever) -> Self {
        match lever {
            Lever::Date => "date".to_string(),
            Lever::Time => "time".to_string(),
            Lever::Distance => "distance".to_string(),
            Lever::Other(s) => s,
        }
    }
}

/// One recommended single-field adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tradeoff {
    pub lever: Lever,
    #[serde(default)]
    pub recommendation: serde_json::Value,
}

/// Typed reading of a tradeoff's recommendation payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    PushDate { weeks: i64 },
    RelaxTime { seconds: i64 },
    SuggestDistance { meters: u32 },
    /// Unknown lever or missing/malformed payload
    Unsupported,
}

impl Tradeoff {
    pub fn date(push_weeks: i64) -> Self {
        Self {
            lever: Lever::Date,
            recommendation: serde_json::json!({ "push_weeks": push_weeks }),
        }
    }

    pub fn time(relax_seconds: i64) -> Self {
        Self {
            lever: Lever::Time,
            recommendation: serde_json::json!({ "relax_seconds": relax_seconds }),
        }
    }

    pub fn distance(suggest_distance_m: u32) -> Self {
        Self {
            lever: Lever::Distance,
            recommendation: serde_json::json!({ "suggest_distance_m": suggest_distance_m }),
        }
    }

    pub fn adjustment(&self) -> Adjustment {
        // A zero recommendation carries no adjustment.
        let adjustment = match self.lever {
            Lever::Date => integer_field(&self.recommendation, "push_weeks")
                .filter(|&weeks| weeks != 0)
                .map(|weeks| Adjustment::PushDate { weeks }),
            Lever::Time => integer_field(&self.recommendation, "relax_seconds")
                .filter(|&seconds| seconds != 0)
                .map(|seconds| Adjustment::RelaxTime { seconds }),
            Lever::Distance => integer_field(&self.recommendation, "suggest_distance_m")
                .and_then(|m| u32::try_from(m).ok())
                .filter(|&meters| meters != 0)
                .map(|meters| Adjustment::SuggestDistance { meters }),
            Lever::Other(_) => None,
        };
        adjustment.unwrap_or(Adjustment::Unsupported)
    }
}

impl fmt::Display for Tradeoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.adjustment() {
            Adjustment::PushDate { weeks } => write!(f, "Push date by {} weeks", weeks),
            Adjustment::RelaxTime { seconds } => write!(f, "Relax time by {}s", seconds),
            Adjustment::SuggestDistance { meters } => {
                write!(f, "Reduce distance to {}", units::format_km(meters))
            }
            Adjustment::Unsupported => {
                write!(f, "Adjust {}", String::from(self.lever.clone()))
            }
        }
    }
}

/// Read an integer field, accepting integral floats and numeric strings.
fn integer_field(payload: &serde_json::Value, key: &str) -> Option<i64> {
    let value = payload.get(key)?;
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if let Some(f) = value.as_f64() {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            return Some(f as i64);
        }
        return None;
    }
    value.as_str().and_then(|s| s.trim().parse().ok())
}
