// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Distance and duration conversion to the integer units used on the wire.

use crate::error::AppError;
use std::fmt;
use std::str::FromStr;

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Meters in one kilometer.
pub const METERS_PER_KM: f64 = 1000.0;

/// Distance unit chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
}

impl DistanceUnit {
    pub fn meters_per_unit(self) -> f64 {
        match self {
            DistanceUnit::Miles => METERS_PER_MILE,
            DistanceUnit::Kilometers => METERS_PER_KM,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            DistanceUnit::Miles => "mi",
            DistanceUnit::Kilometers => "km",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DistanceUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mi" | "mile" | "miles" => Ok(DistanceUnit::Miles),
            "km" | "kilometer" | "kilometers" => Ok(DistanceUnit::Kilometers),
            other => Err(AppError::Validation(format!(
                "unknown distance unit '{}' (expected mi or km)",
                other
            ))),
        }
    }
}

/// Convert a distance in `unit` to whole meters.
pub fn to_meters(value: f64, unit: DistanceUnit) -> Result<u32, AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "distance must be a non-negative number, got {}",
            value
        )));
    }
    round_to_u32(value * unit.meters_per_unit(), "distance")
}

/// Convert minutes and seconds to whole seconds.
pub fn time_to_sec(minutes: f64, seconds: f64) -> Result<u32, AppError> {
    if !minutes.is_finite() || !seconds.is_finite() || minutes < 0.0 || seconds < 0.0 {
        return Err(AppError::Validation(format!(
            "time must be non-negative, got {}:{}",
            minutes, seconds
        )));
    }
    round_to_u32(minutes * 60.0 + seconds, "time")
}

/// Parse a clock string: `mm:ss`, `h:mm:ss` or a bare minute count.
pub fn parse_clock(input: &str) -> Result<u32, AppError> {
    let parts: Vec<&str> = input.trim().split(':').collect();
    let number = |s: &str| -> Result<f64, AppError> {
        s.trim()
            .parse::<f64>()
            .map_err(|_| AppError::Validation(format!("invalid time '{}'", input)))
    };

    match parts.as_slice() {
        [m] => time_to_sec(number(m)?, 0.0),
        [m, s] => time_to_sec(number(m)?, number(s)?),
        [h, m, s] => time_to_sec(number(h)? * 60.0 + number(m)?, number(s)?),
        _ => Err(AppError::Validation(format!("invalid time '{}'", input))),
    }
}

/// Format whole seconds as `m:ss`, or `h:mm:ss` from one hour up.
pub fn format_clock(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Format meters as kilometers with one decimal.
pub fn format_km(meters: u32) -> String {
    format!("{:.1} km", f64::from(meters) / METERS_PER_KM)
}

fn round_to_u32(value: f64, what: &str) -> Result<u32, AppError> {
    let rounded = value.round();
    if rounded > f64::from(u32::MAX) {
        return Err(AppError::Validation(format!("{} is too large", what)));
    }
    Ok(rounded as u32)
}
