// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Negotiation session states.

use crate::models::{Capability, FeasibilityResult, GoalProposal, Plan, SubmittedGoal};

/// Where a session is in the onboarding flow.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    /// Capability converted and validated, being persisted
    CapabilityCaptured { capability: Capability },
    /// Ready to submit a goal; `draft` is the last proposal, if any
    ProposalDrafted { draft: Option<GoalProposal> },
    AwaitingFeasibility { proposal: GoalProposal },
    /// Verdict for exactly this submitted goal
    FeasibilityReady {
        goal: SubmittedGoal,
        result: FeasibilityResult,
    },
    PlanRequested { goal_id: String },
    Done { plan: Plan },
    /// A service call failed; `resume` is the state to continue from
    Failed {
        message: String,
        resume: Box<SessionState>,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::CapabilityCaptured { .. } => "capability_captured",
            SessionState::ProposalDrafted { .. } => "proposal_drafted",
            SessionState::AwaitingFeasibility { .. } => "awaiting_feasibility",
            SessionState::FeasibilityReady { .. } => "feasibility_ready",
            SessionState::PlanRequested { .. } => "plan_requested",
            SessionState::Done { .. } => "done",
            SessionState::Failed { .. } => "failed",
        }
    }

    /// The state operations act on: the resume point after a failure.
    pub fn effective(&self) -> &SessionState {
        match self {
            SessionState::Failed { resume, .. } => resume.effective(),
            other => other,
        }
    }

    /// Whether a service call is outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            SessionState::CapabilityCaptured { .. }
                | SessionState::AwaitingFeasibility { .. }
                | SessionState::PlanRequested { .. }
        )
    }
}
