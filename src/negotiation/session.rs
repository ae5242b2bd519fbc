// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal negotiation session.
//!
//! Drives one user through capability capture, goal submission, feasibility
//! review, tradeoff application and plan commit against the planning service.
//! Every operation takes `&mut self`, so a session has at most one call in
//! flight. A failed call leaves the session in `Failed`, which resumes from
//! the state the operation started in.

use super::state::SessionState;
use super::tradeoff::apply_tradeoff;
use crate::error::AppError;
use crate::models::{
    Adjustment, Baseline, CapabilityDraft, DistancePreset, FeasibilityResult, GoalProposal, Plan,
    SubmittedGoal,
};
use crate::services::PlanningClient;
use crate::time_utils::default_target_date;
use chrono::NaiveDate;

/// Negotiation session for one user.
pub struct Session {
    client: PlanningClient,
    state: SessionState,
    /// Capability the current goal is negotiated against
    baseline: Option<Baseline>,
    /// Resume point while a call is in flight
    checkpoint: Option<SessionState>,
}

impl Session {
    pub fn new(client: PlanningClient) -> Self {
        Self {
            client,
            state: SessionState::Idle,
            baseline: None,
            checkpoint: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.baseline
    }

    pub fn client(&self) -> &PlanningClient {
        &self.client
    }

    /// Message of the most recent failed call, until the next operation.
    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Current feasibility result, if one is held.
    pub fn feasibility(&self) -> Option<(&SubmittedGoal, &FeasibilityResult)> {
        match self.state.effective() {
            SessionState::FeasibilityReady { goal, result } => Some((goal, result)),
            _ => None,
        }
    }

    /// Suggested starting proposal for the goal step.
    pub fn default_proposal(&self, today: NaiveDate) -> GoalProposal {
        if let SessionState::ProposalDrafted { draft: Some(draft) } = self.state.effective() {
            return draft.clone();
        }
        GoalProposal::new(
            DistancePreset::TenK.meters(),
            None,
            default_target_date(today),
        )
    }

    // ─── Transitions ─────────────────────────────────────────────────────────

    /// Pick up a returning user's latest capability.
    ///
    /// `Idle → ProposalDrafted` when the service has a capability on record;
    /// stays `Idle` (returning `None`) when it has none.
    pub async fn resume(&mut self) -> Result<Option<Baseline>, AppError> {
        self.recover_abandoned();
        self.expect_state(&["idle"])?;

        self.begin(SessionState::Idle);
        match self.client.latest_capability().await {
            Ok(Some(record)) => {
                let baseline = record.baseline();
                tracing::info!(
                    capability_id = %record.id,
                    distance_m = baseline.distance_m,
                    "Resuming from recorded capability"
                );
                self.baseline = Some(baseline);
                self.finish(SessionState::ProposalDrafted { draft: None });
                Ok(Some(baseline))
            }
            Ok(None) => {
                self.finish(SessionState::Idle);
                Ok(None)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Convert, validate and persist the user's current capability.
    pub async fn submit_capability(
        &mut self,
        draft: &CapabilityDraft,
        as_of: NaiveDate,
    ) -> Result<Baseline, AppError> {
        self.recover_abandoned();
        self.expect_state(&["idle", "proposal_drafted"])?;

        let capability = draft.to_capability(as_of)?;
        self.begin(SessionState::CapabilityCaptured {
            capability: capability.clone(),
        });

        match self.client.create_capability(&capability).await {
            Ok(record) => {
                let baseline = Baseline::from(&capability);
                tracing::info!(
                    capability_id = %record.id,
                    distance_m = baseline.distance_m,
                    time_sec = baseline.time_sec,
                    "Capability recorded"
                );
                self.baseline = Some(baseline);
                self.finish(SessionState::ProposalDrafted { draft: None });
                Ok(baseline)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Persist `proposal` as a goal and evaluate it.
    ///
    /// Any previously held result is discarded first; on failure the session
    /// resumes at `ProposalDrafted` with this proposal as the draft.
    pub async fn request_feasibility(
        &mut self,
        proposal: GoalProposal,
    ) -> Result<FeasibilityResult, AppError> {
        self.recover_abandoned();
        self.expect_state(&["proposal_drafted", "feasibility_ready"])?;
        proposal.validate()?;

        self.state = SessionState::ProposalDrafted {
            draft: Some(proposal.clone()),
        };
        self.begin(SessionState::AwaitingFeasibility {
            proposal: proposal.clone(),
        });

        let record = match self.client.create_goal(&proposal).await {
            Ok(record) => record,
            Err(e) => return Err(self.fail(e)),
        };
        let goal_id = record.id.clone();
        tracing::debug!(goal_id = %goal_id, "Goal created");

        let result = match self.client.feasibility(&goal_id).await {
            Ok(result) => result,
            Err(e) => return Err(self.fail(e)),
        };
        tracing::info!(
            goal_id = %goal_id,
            feasible = result.feasible,
            reasons = result.reasons.len(),
            tradeoffs = result.tradeoffs.len(),
            "Feasibility evaluated"
        );

        // Bind the verdict to what was submitted, not the server's echo.
        let goal = SubmittedGoal {
            id: goal_id,
            proposal,
        };
        self.finish(SessionState::FeasibilityReady {
            goal,
            result: result.clone(),
        });
        Ok(result)
    }

    /// Apply the tradeoff at `index` of the current result.
    ///
    /// Drops the result and returns to `ProposalDrafted`; the returned
    /// proposal must go through `request_feasibility` again.
    pub fn revise(&mut self, index: usize) -> Result<GoalProposal, AppError> {
        self.recover_abandoned();
        let (goal, result) = self.feasibility().ok_or_else(|| {
            AppError::InvalidState("no feasibility result to revise".to_string())
        })?;
        let tradeoff = result.tradeoffs.get(index).ok_or_else(|| {
            AppError::InvalidState(format!(
                "no tradeoff at position {} ({} offered)",
                index,
                result.tradeoffs.len()
            ))
        })?;

        let revised = apply_tradeoff(&goal.proposal, tradeoff);
        tracing::info!(
            goal_id = %goal.id,
            tradeoff = %tradeoff,
            "Applied tradeoff"
        );
        self.state = SessionState::ProposalDrafted {
            draft: Some(revised.clone()),
        };
        Ok(revised)
    }

    /// Apply the highest-priority (first) tradeoff.
    pub fn revise_first(&mut self) -> Result<GoalProposal, AppError> {
        self.revise(0)
    }

    /// Go back to editing the submitted proposal by hand.
    pub fn edit_proposal(&mut self) -> Result<GoalProposal, AppError> {
        self.recover_abandoned();
        let (goal, _) = self.feasibility().ok_or_else(|| {
            AppError::InvalidState("no submitted proposal to edit".to_string())
        })?;
        let proposal = goal.proposal.clone();
        self.state = SessionState::ProposalDrafted {
            draft: Some(proposal.clone()),
        };
        Ok(proposal)
    }

    /// Generate the plan for a goal judged feasible.
    ///
    /// Rejected before any network call unless the session holds a feasible
    /// result for exactly `goal_id`.
    pub async fn commit_plan(&mut self, goal_id: &str) -> Result<Plan, AppError> {
        self.recover_abandoned();
        match self.feasibility() {
            Some((goal, result)) if goal.id == goal_id => {
                if !result.feasible {
                    return Err(AppError::NotFeasible(goal_id.to_string()));
                }
            }
            _ => {
                return Err(AppError::InvalidState(format!(
                    "no feasibility result held for goal {}",
                    goal_id
                )))
            }
        }

        self.begin(SessionState::PlanRequested {
            goal_id: goal_id.to_string(),
        });
        match self.client.generate_plan(goal_id).await {
            Ok(plan) => {
                tracing::info!(
                    goal_id,
                    plan_id = %plan.id,
                    workouts = plan.workouts.len(),
                    "Plan generated"
                );
                self.finish(SessionState::Done { plan: plan.clone() });
                Ok(plan)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Submit, then keep applying the first tradeoff until the goal is
    /// feasible, the first tradeoff would not change the goal, or
    /// `max_rounds` revisions were made.
    pub async fn negotiate(
        &mut self,
        proposal: GoalProposal,
        max_rounds: usize,
    ) -> Result<FeasibilityResult, AppError> {
        let mut result = self.request_feasibility(proposal).await?;
        let mut rounds = 0;

        while !result.feasible && rounds < max_rounds {
            let Some((goal, current)) = self.feasibility() else {
                break;
            };
            let Some(first) = current.tradeoffs.first() else {
                break;
            };
            if first.adjustment() == Adjustment::Unsupported {
                tracing::warn!(tradeoff = %first, "First tradeoff cannot be applied, stopping");
                break;
            }
            if apply_tradeoff(&goal.proposal, first) == goal.proposal {
                tracing::warn!(
                    goal_id = %goal.id,
                    tradeoff = %first,
                    "First tradeoff leaves the goal unchanged, stopping"
                );
                break;
            }
            let revised = self.revise_first()?;
            result = self.request_feasibility(revised).await?;
            rounds += 1;
        }

        Ok(result)
    }

    // ─── Internals ───────────────────────────────────────────────────────────

    fn expect_state(&self, allowed: &[&str]) -> Result<(), AppError> {
        let current = self.state.effective().name();
        if allowed.contains(&current) {
            Ok(())
        } else {
            Err(AppError::InvalidState(format!(
                "operation not allowed in state {} (expected {})",
                current,
                allowed.join(" or ")
            )))
        }
    }

    /// Enter a pending state, remembering where to resume.
    fn begin(&mut self, pending: SessionState) {
        let resume = std::mem::replace(&mut self.state, pending);
        self.checkpoint = Some(match resume {
            SessionState::Failed { resume, .. } => *resume,
            other => other,
        });
    }

    fn finish(&mut self, next: SessionState) {
        self.checkpoint = None;
        self.state = next;
    }

    fn fail(&mut self, error: AppError) -> AppError {
        let resume = self.checkpoint.take().unwrap_or(SessionState::Idle);
        tracing::warn!(
            error = %error,
            code = error.code(),
            resume = resume.name(),
            "Session operation failed"
        );
        self.state = SessionState::Failed {
            message: error.to_string(),
            resume: Box::new(resume),
        };
        error
    }

    /// Roll back a pending state whose call was dropped before completing.
    fn recover_abandoned(&mut self) {
        if self.state.is_pending() {
            let resume = self.checkpoint.take().unwrap_or(SessionState::Idle);
            tracing::debug!(
                pending = self.state.name(),
                resume = resume.name(),
                "Discarding abandoned call"
            );
            self.state = resume;
        } else if let SessionState::Failed { .. } = self.state {
            let failed = std::mem::replace(&mut self.state, SessionState::Idle);
            if let SessionState::Failed { resume, .. } = failed {
                self.state = *resume;
            }
        }
    }
}
