// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training plans and their scheduled workouts.

use crate::units;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Plan returned by plan generation and `GET /plans/current`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Plan {
    pub id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// "active" or "superseded"
    pub status: Option<String>,
    /// Ordered by date
    #[serde(default)]
    pub workouts: Vec<Workout>,
}

impl Plan {
    /// Key workouts only.
    pub fn key_workouts(&self) -> impl Iterator<Item = &Workout> {
        self.workouts.iter().filter(|w| w.is_key)
    }

    /// Workouts scheduled within `[from, to]`, both inclusive.
    pub fn workouts_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Workout> {
        self.workouts
            .iter()
            .filter(|w| w.wdate >= from && w.wdate <= to)
            .collect()
    }
}

/// One scheduled workout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Workout {
    pub id: String,
    pub wdate: NaiveDate,
    /// Type label ("easy", "long", "tempo", ...)
    pub wtype: String,
    pub target_distance_m: Option<u32>,
    #[serde(default)]
    pub target_duration_sec: Option<u32>,
    #[serde(default)]
    pub target_zone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_key: bool,
}

impl Workout {
    /// One-line calendar rendering, e.g. `Sun Jan 07 2024 · long · 16.0 km · Key`.
    pub fn summary_line(&self) -> String {
        let distance = self
            .target_distance_m
            .map(units::format_km)
            .unwrap_or_else(|| "—".to_string());
        let mut line = format!(
            "{} · {} · {}",
            self.wdate.format("%a %b %d %Y"),
            self.wtype,
            distance
        );
        if self.is_key {
            line.push_str(" · Key");
        }
        line
    }
}

/// Actual results recorded against a workout.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct WorkoutLog {
    pub actual_distance_m: Option<u32>,
    pub actual_time_sec: Option<u32>,
    /// Rate of perceived exertion
    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
    pub rpe: Option<u8>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub notes: Option<String>,
}
