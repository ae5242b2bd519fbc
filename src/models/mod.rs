// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Request and response models for the planning service.

pub mod auth;
pub mod capability;
pub mod feasibility;
pub mod goal;
pub mod plan;

pub use auth::{LoginRequest, RegisterRequest, TokenPair};
pub use capability::{Baseline, Capability, CapabilityDraft, CapabilityRecord};
pub use feasibility::{Adjustment, FeasibilityResult, Lever, Tradeoff};
pub use goal::{DistancePreset, GoalProposal, GoalRecord, SubmittedGoal};
pub use plan::{Plan, Workout, WorkoutLog};
