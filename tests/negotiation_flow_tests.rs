// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end negotiation flows against a mocked planning service.

use chrono::NaiveDate;
use coach_onboarding::error::AppError;
use coach_onboarding::models::{CapabilityDraft, GoalProposal};
use coach_onboarding::negotiation::{Session, SessionState};
use coach_onboarding::units::DistanceUnit;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{authed_client, drafted_session, mount_json, plan_body};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn test_marathon_negotiation_end_to_end() {
    let server = MockServer::start().await;
    let mut session = drafted_session(&server).await;

    // First submission: original date
    Mock::given(method("POST"))
        .and(path("/goals"))
        .and(body_json(json!({
            "distance_m": 42195,
            "target_time_sec": null,
            "target_date": "2024-01-01"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "goal-1", "distance_m": 42195, "target_time_sec": null, "target_date": "2024-01-01"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_json(
        &server,
        "POST",
        "/goals/goal-1/feasibility",
        200,
        json!({
            "feasible": false,
            "reasons": ["Less than 4 weeks available"],
            "tradeoffs": [{"lever": "date", "recommendation": {"push_weeks": 8}}]
        }),
    )
    .await;

    // Second submission: pushed by 8 weeks
    Mock::given(method("POST"))
        .and(path("/goals"))
        .and(body_json(json!({
            "distance_m": 42195,
            "target_time_sec": null,
            "target_date": "2024-02-26"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "goal-2", "distance_m": 42195, "target_time_sec": null, "target_date": "2024-02-26"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_json(
        &server,
        "POST",
        "/goals/goal-2/feasibility",
        200,
        json!({"feasible": true, "reasons": [], "tradeoffs": []}),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/plans/goals/goal-2/generate-plan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan_body()))
        .expect(1)
        .mount(&server)
        .await;

    let proposal = GoalProposal::new(42_195, None, date("2024-01-01"));
    let result = session.request_feasibility(proposal).await.unwrap();
    assert!(!result.feasible);
    assert_eq!(result.tradeoffs.len(), 1);
    assert_eq!(session.state().name(), "feasibility_ready");

    let revised = session.revise_first().unwrap();
    assert_eq!(revised, GoalProposal::new(42_195, None, date("2024-02-26")));
    assert_eq!(session.state().name(), "proposal_drafted");
    assert!(session.feasibility().is_none(), "stale result must be dropped");

    let result = session.request_feasibility(revised).await.unwrap();
    assert!(result.feasible);
    let (goal, _) = session.feasibility().unwrap();
    assert_eq!(goal.id, "goal-2");

    let plan = session.commit_plan("goal-2").await.unwrap();
    assert!(!plan.workouts.is_empty());
    assert!(matches!(session.state(), SessionState::Done { .. }));
}

#[tokio::test]
async fn test_negotiate_applies_tradeoffs_until_feasible() {
    let server = MockServer::start().await;
    let mut session = drafted_session(&server).await;

    for (body_date, id) in [("2024-01-01", "g1"), ("2024-01-29", "g2")] {
        Mock::given(method("POST"))
            .and(path("/goals"))
            .and(body_json(json!({
                "distance_m": 21097,
                "target_time_sec": 6000,
                "target_date": body_date
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id, "distance_m": 21097, "target_time_sec": 6000, "target_date": body_date
            })))
            .mount(&server)
            .await;
    }
    mount_json(
        &server,
        "POST",
        "/goals/g1/feasibility",
        200,
        json!({
            "feasible": false,
            "reasons": ["Less than 4 weeks available"],
            "tradeoffs": [
                {"lever": "date", "recommendation": {"push_weeks": 4}},
                {"lever": "distance", "recommendation": {"suggest_distance_m": 5000}}
            ]
        }),
    )
    .await;
    mount_json(
        &server,
        "POST",
        "/goals/g2/feasibility",
        200,
        json!({"feasible": true, "reasons": [], "tradeoffs": []}),
    )
    .await;

    let proposal = GoalProposal::new(21_097, Some(6000), date("2024-01-01"));
    let result = session.negotiate(proposal, 3).await.unwrap();

    assert!(result.feasible);
    let (goal, _) = session.feasibility().unwrap();
    assert_eq!(goal.id, "g2");
    assert_eq!(goal.proposal.target_date, date("2024-01-29"));
    assert_eq!(goal.proposal.distance_m, 21_097);
}

#[tokio::test]
async fn test_commit_rejected_when_not_feasible() {
    let server = MockServer::start().await;
    let mut session = drafted_session(&server).await;

    mount_json(
        &server,
        "POST",
        "/goals",
        200,
        json!({"id": "goal-1", "distance_m": 42195, "target_time_sec": null, "target_date": "2024-01-01"}),
    )
    .await;
    mount_json(
        &server,
        "POST",
        "/goals/goal-1/feasibility",
        200,
        json!({"feasible": false, "reasons": ["Too soon"], "tradeoffs": []}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/plans/goals/goal-1/generate-plan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan_body()))
        .expect(0)
        .mount(&server)
        .await;

    let result = session
        .request_feasibility(GoalProposal::new(42_195, None, date("2024-01-01")))
        .await
        .unwrap();
    assert!(result.is_stuck());

    let err = session.commit_plan("goal-1").await.unwrap_err();
    assert!(matches!(err, AppError::NotFeasible(ref id) if id == "goal-1"));
    assert_eq!(session.state().name(), "feasibility_ready");

    let err = session.commit_plan("some-other-goal").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
async fn test_stuck_result_allows_manual_edit() {
    let server = MockServer::start().await;
    let mut session = drafted_session(&server).await;

    mount_json(
        &server,
        "POST",
        "/goals",
        200,
        json!({"id": "goal-1", "distance_m": 10000, "target_time_sec": 1800, "target_date": "2024-03-01"}),
    )
    .await;
    mount_json(
        &server,
        "POST",
        "/goals/goal-1/feasibility",
        200,
        json!({"feasible": false, "reasons": ["Target time aggressive vs current fitness"], "tradeoffs": []}),
    )
    .await;

    let original = GoalProposal::new(10_000, Some(1800), date("2024-03-01"));
    session.request_feasibility(original.clone()).await.unwrap();

    // Nothing to apply
    assert!(matches!(session.revise_first(), Err(AppError::InvalidState(_))));

    let edited = session.edit_proposal().unwrap();
    assert_eq!(edited, original);
    assert_eq!(session.state().name(), "proposal_drafted");
    assert_eq!(session.default_proposal(date("2024-01-01")), original);
}

#[tokio::test]
async fn test_capability_submission() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/capability"))
        .and(body_json(json!({
            "date": "2024-01-01",
            "comfortable_distance_m": 4828,
            "comfortable_time_sec": 1800
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cap-9",
            "date": "2024-01-01",
            "comfortable_distance_m": 4828,
            "comfortable_time_sec": 1800,
            "projection": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = authed_client(&server);
    let mut session = Session::new(client);
    let draft = CapabilityDraft {
        distance: 3.0,
        unit: DistanceUnit::Miles,
        minutes: 30.0,
        seconds: 0.0,
    };

    let baseline = session
        .submit_capability(&draft, date("2024-01-01"))
        .await
        .unwrap();
    assert_eq!(baseline.distance_m, 4828);
    assert_eq!(baseline.time_sec, 1800);
    assert_eq!(
        session.state(),
        &SessionState::ProposalDrafted { draft: None }
    );
}

#[tokio::test]
async fn test_invalid_capability_never_submitted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/capability"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = authed_client(&server);
    let mut session = Session::new(client);

    for (distance, minutes) in [(0.0, 30.0), (-2.0, 30.0), (3.0, -1.0)] {
        let draft = CapabilityDraft {
            distance,
            unit: DistanceUnit::Kilometers,
            minutes,
            seconds: 0.0,
        };
        let err = session
            .submit_capability(&draft, date("2024-01-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{:?}", err);
        assert_eq!(session.state(), &SessionState::Idle);
    }
}

#[tokio::test]
async fn test_service_error_does_not_advance() {
    let server = MockServer::start().await;
    let mut session = drafted_session(&server).await;

    mount_json(
        &server,
        "POST",
        "/goals",
        200,
        json!({"id": "goal-1", "distance_m": 10000, "target_time_sec": null, "target_date": "2024-03-01"}),
    )
    .await;
    mount_json(
        &server,
        "POST",
        "/goals/goal-1/feasibility",
        400,
        json!({"detail": "No capability snapshot; create one first"}),
    )
    .await;

    let proposal = GoalProposal::new(10_000, None, date("2024-03-01"));
    let err = session.request_feasibility(proposal.clone()).await.unwrap_err();

    assert!(matches!(err, AppError::Service { status: Some(400), .. }));
    assert_eq!(err.to_string(), "No capability snapshot; create one first");
    assert_eq!(session.state().name(), "failed");
    assert_eq!(
        session.last_error(),
        Some("No capability snapshot; create one first")
    );
    assert!(session.feasibility().is_none());
    assert_eq!(
        session.state().effective(),
        &SessionState::ProposalDrafted {
            draft: Some(proposal)
        }
    );
}

#[tokio::test]
async fn test_operations_out_of_order_are_rejected() {
    let server = MockServer::start().await;
    let (client, _) = authed_client(&server);
    let mut session = Session::new(client);

    let err = session
        .request_feasibility(GoalProposal::new(5_000, None, date("2024-03-01")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert!(matches!(session.revise(0), Err(AppError::InvalidState(_))));
    assert!(matches!(session.edit_proposal(), Err(AppError::InvalidState(_))));
    assert_eq!(session.state(), &SessionState::Idle);
}

#[tokio::test]
async fn test_resume_without_capability_stays_idle() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/capability/latest",
        404,
        json!({"detail": "No capability snapshots"}),
    )
    .await;

    let (client, _) = authed_client(&server);
    let mut session = Session::new(client);

    assert_eq!(session.resume().await.unwrap(), None);
    assert_eq!(session.state(), &SessionState::Idle);
    assert_eq!(session.baseline(), None);
}

/// Mount `POST /goals` for one exact proposal body, answering with `id`.
async fn mount_goal(server: &MockServer, id: &str, body: serde_json::Value, times: u64) {
    let mut record = body.clone();
    record["id"] = json!(id);
    Mock::given(method("POST"))
        .and(path("/goals"))
        .and(body_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(record))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_time_clamped_to_zero_is_never_submitted() {
    let server = MockServer::start().await;
    let mut session = drafted_session(&server).await;

    mount_goal(
        &server,
        "goal-1",
        json!({"distance_m": 10000, "target_time_sec": 600, "target_date": "2024-03-01"}),
        1,
    )
    .await;
    mount_goal(
        &server,
        "goal-2",
        json!({"distance_m": 10000, "target_time_sec": 0, "target_date": "2024-03-01"}),
        0,
    )
    .await;
    mount_json(
        &server,
        "POST",
        "/goals/goal-1/feasibility",
        200,
        json!({
            "feasible": false,
            "reasons": ["Target time aggressive vs current fitness"],
            "tradeoffs": [{"lever": "time", "recommendation": {"relax_seconds": -900}}]
        }),
    )
    .await;

    session
        .request_feasibility(GoalProposal::new(10_000, Some(600), date("2024-03-01")))
        .await
        .unwrap();
    let revised = session.revise_first().unwrap();
    assert_eq!(revised.target_time_sec, Some(0));

    let err = session.request_feasibility(revised.clone()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{:?}", err);
    assert_eq!(
        session.state(),
        &SessionState::ProposalDrafted {
            draft: Some(revised)
        }
    );
}

#[tokio::test]
async fn test_negotiate_stops_when_tradeoff_changes_nothing() {
    let unchanged = [
        json!({"lever": "date", "recommendation": {"push_weeks": 9_007_199_254_740_i64}}),
        json!({"lever": "distance", "recommendation": {"suggest_distance_m": 10000}}),
    ];

    for tradeoff in unchanged {
        let server = MockServer::start().await;
        let mut session = drafted_session(&server).await;

        mount_goal(
            &server,
            "goal-1",
            json!({"distance_m": 10000, "target_time_sec": null, "target_date": "2024-03-01"}),
            1,
        )
        .await;
        mount_json(
            &server,
            "POST",
            "/goals/goal-1/feasibility",
            200,
            json!({"feasible": false, "reasons": ["Too soon"], "tradeoffs": [tradeoff]}),
        )
        .await;

        let result = session
            .negotiate(GoalProposal::new(10_000, None, date("2024-03-01")), 5)
            .await
            .unwrap();

        assert!(!result.feasible);
        let (goal, _) = session.feasibility().unwrap();
        assert_eq!(goal.id, "goal-1");
    }
}

#[tokio::test]
async fn test_negotiate_stops_on_unusable_tradeoff() {
    let server = MockServer::start().await;
    let mut session = drafted_session(&server).await;

    mount_goal(
        &server,
        "goal-1",
        json!({"distance_m": 5000, "target_time_sec": 1500, "target_date": "2024-03-01"}),
        1,
    )
    .await;
    mount_json(
        &server,
        "POST",
        "/goals/goal-1/feasibility",
        200,
        json!({
            "feasible": false,
            "reasons": ["Target time aggressive vs current fitness"],
            "tradeoffs": [
                {"lever": "pace", "recommendation": {"slow_by_sec_per_km": 10}},
                {"lever": "time", "recommendation": {"relax_seconds": 120}}
            ]
        }),
    )
    .await;

    let result = session
        .negotiate(GoalProposal::new(5_000, Some(1500), date("2024-03-01")), 5)
        .await
        .unwrap();

    assert!(!result.feasible);
    assert_eq!(result.tradeoffs.len(), 2);
    assert_eq!(session.state().name(), "feasibility_ready");
}

#[tokio::test]
async fn test_negotiate_gives_up_after_max_rounds() {
    let server = MockServer::start().await;
    let mut session = drafted_session(&server).await;

    for body_date in ["2024-01-01", "2024-01-08", "2024-01-15"] {
        mount_goal(
            &server,
            "goal-1",
            json!({"distance_m": 42195, "target_time_sec": null, "target_date": body_date}),
            1,
        )
        .await;
    }
    mount_json(
        &server,
        "POST",
        "/goals/goal-1/feasibility",
        200,
        json!({
            "feasible": false,
            "reasons": ["Less than 4 weeks available"],
            "tradeoffs": [{"lever": "date", "recommendation": {"push_weeks": 1}}]
        }),
    )
    .await;

    let result = session
        .negotiate(GoalProposal::new(42_195, None, date("2024-01-01")), 2)
        .await
        .unwrap();

    assert!(!result.feasible);
    let (goal, _) = session.feasibility().unwrap();
    assert_eq!(goal.proposal.target_date, date("2024-01-15"));
}
