// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Applying a recommended tradeoff to a goal proposal.

use crate::models::{Adjustment, GoalProposal, Tradeoff};
use crate::time_utils::add_weeks;

/// Return a new proposal with `tradeoff` applied.
///
/// Only the field named by the lever changes. Unknown levers and unusable
/// payloads return the proposal unchanged. The result has no goal id and
/// must be resubmitted for a fresh feasibility check.
pub fn apply_tradeoff(proposal: &GoalProposal, tradeoff: &Tradeoff) -> GoalProposal {
    let mut next = proposal.clone();

    match tradeoff.adjustment() {
        Adjustment::PushDate { weeks } => match add_weeks(proposal.target_date, weeks) {
            Some(date) => next.target_date = date,
            None => {
                tracing::warn!(weeks, "Date tradeoff out of calendar range, ignoring");
            }
        },
        Adjustment::RelaxTime { seconds } => {
            let current = i64::from(proposal.target_time_sec.unwrap_or(0));
            let relaxed = current.saturating_add(seconds).max(0);
            next.target_time_sec = Some(u32::try_from(relaxed).unwrap_or(u32::MAX));
        }
        Adjustment::SuggestDistance { meters } => next.distance_m = meters,
        Adjustment::Unsupported => {
            tracing::debug!(lever = ?tradeoff.lever, "Tradeoff not applicable, proposal unchanged");
        }
    }

    next
}
