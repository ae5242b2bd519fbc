// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Command-line front-end over the negotiation session.

use crate::error::AppError;
use crate::models::{
    CapabilityDraft, DistancePreset, FeasibilityResult, GoalProposal, LoginRequest, Plan,
    RegisterRequest, WorkoutLog,
};
use crate::negotiation::Session;
use crate::time_utils::{self, parse_iso_date};
use crate::units::{self, DistanceUnit};
use crate::AppState;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Running coach onboarding client
#[derive(Debug, Parser)]
#[command(name = "coach", about = "Set a running goal and get a training plan", version)]
pub struct Cli {
    /// Log level directive (e.g. debug, coach_onboarding=trace)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        age: u32,
        /// male, female or other
        #[arg(long)]
        sex: String,
    },

    /// Log in to an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget stored credentials
    Logout,

    /// Record the distance you could comfortably run today
    Capability {
        /// Comfortable distance
        #[arg(long)]
        distance: f64,
        /// mi or km
        #[arg(long, default_value = "mi")]
        unit: String,
        /// How long it would take, as mm:ss
        #[arg(long)]
        time: String,
        /// As-of date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Check a goal's feasibility and optionally generate a plan
    Goal {
        /// Race distance: 5k, 10k, half, marathon
        #[arg(long, conflicts_with = "distance_m")]
        race: Option<String>,
        /// Custom goal distance in meters
        #[arg(long)]
        distance_m: Option<u32>,
        /// Target finish time (mm:ss or h:mm:ss)
        #[arg(long)]
        time: Option<String>,
        /// Target date (YYYY-MM-DD), defaults to 16 weeks out
        #[arg(long)]
        date: Option<String>,
        /// Apply the first suggested tradeoff until the goal is feasible
        #[arg(long)]
        auto: bool,
        /// Maximum tradeoffs applied with --auto
        #[arg(long, default_value_t = 5)]
        max_rounds: usize,
        /// Generate the plan once the goal is feasible
        #[arg(long)]
        commit: bool,
    },

    /// Show the current plan
    Plan {
        /// First date to show (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last date to show (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only key workouts
        #[arg(long)]
        key_only: bool,
    },

    /// Log a completed workout
    Log {
        workout_id: String,
        #[arg(long)]
        distance_m: Option<u32>,
        /// Actual time (mm:ss or h:mm:ss)
        #[arg(long)]
        time: Option<String>,
        /// Perceived exertion, 1-10
        #[arg(long)]
        rpe: Option<u8>,
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Execute a parsed command.
pub async fn run(state: &AppState, command: Command) -> Result<(), AppError> {
    let client = &state.client;

    match command {
        Command::Register {
            email,
            password,
            age,
            sex,
        } => {
            client
                .register(&RegisterRequest {
                    email,
                    password,
                    age,
                    sex,
                })
                .await?;
            println!("Account created. Next: record your capability with `coach capability`.");
        }

        Command::Login { email, password } => {
            client.login(&LoginRequest { email, password }).await?;
            println!("Logged in.");
        }

        Command::Logout => {
            client.logout()?;
            println!("Logged out.");
        }

        Command::Capability {
            distance,
            unit,
            time,
            date,
        } => {
            let unit: DistanceUnit = unit.parse()?;
            let total = units::parse_clock(&time)?;
            let draft = CapabilityDraft {
                distance,
                unit,
                minutes: f64::from(total / 60),
                seconds: f64::from(total % 60),
            };
            let as_of = parse_date_arg(date.as_deref())?.unwrap_or_else(time_utils::today);

            let mut session = Session::new(client.clone());
            let baseline = session.submit_capability(&draft, as_of).await?;
            println!(
                "Recorded: {} in {}. Next: set a goal with `coach goal`.",
                units::format_km(baseline.distance_m),
                units::format_clock(baseline.time_sec)
            );
        }

        Command::Goal {
            race,
            distance_m,
            time,
            date,
            auto,
            max_rounds,
            commit,
        } => {
            let mut session = Session::new(client.clone());
            if session.resume().await?.is_none() {
                return Err(AppError::InvalidState(
                    "no capability on record; run `coach capability` first".to_string(),
                ));
            }

            let mut proposal = session.default_proposal(time_utils::today());
            if let Some(race) = race {
                proposal.distance_m = race.parse::<DistancePreset>()?.meters();
            }
            if let Some(distance_m) = distance_m {
                proposal.distance_m = distance_m;
            }
            if let Some(time) = time {
                proposal.target_time_sec = Some(units::parse_clock(&time)?);
            }
            if let Some(date) = parse_date_arg(date.as_deref())? {
                proposal.target_date = date;
            }

            print_proposal(&proposal);
            let result = if auto {
                session.negotiate(proposal, max_rounds).await?
            } else {
                session.request_feasibility(proposal).await?
            };
            if let Some((goal, _)) = session.feasibility() {
                if auto {
                    print_proposal(&goal.proposal);
                }
            }
            print_feasibility(&result);

            if commit {
                let goal_id = session
                    .feasibility()
                    .map(|(goal, _)| goal.id.clone())
                    .ok_or_else(|| AppError::InvalidState("no goal submitted".to_string()))?;
                let plan = session.commit_plan(&goal_id).await?;
                print_plan(&plan, None, None, false);
            }
        }

        Command::Plan { from, to, key_only } => {
            let from = parse_date_arg(from.as_deref())?;
            let to = parse_date_arg(to.as_deref())?;
            let plan = client.current_plan().await?;
            print_plan(&plan, from, to, key_only);
        }

        Command::Log {
            workout_id,
            distance_m,
            time,
            rpe,
            notes,
        } => {
            let actual_time_sec = time.as_deref().map(units::parse_clock).transpose()?;
            let log = WorkoutLog {
                actual_distance_m: distance_m,
                actual_time_sec,
                rpe,
                notes,
            };
            client.log_workout(&workout_id, &log).await?;
            println!("Logged.");
        }
    }

    Ok(())
}

fn parse_date_arg(input: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    input
        .map(|s| {
            parse_iso_date(s)
                .ok_or_else(|| AppError::Validation(format!("invalid date '{}' (use YYYY-MM-DD)", s)))
        })
        .transpose()
}

fn print_proposal(proposal: &GoalProposal) {
    let time = proposal
        .target_time_sec
        .map(units::format_clock)
        .unwrap_or_else(|| "finish".to_string());
    println!(
        "Goal: {} · {} · by {}",
        units::format_km(proposal.distance_m),
        time,
        time_utils::format_iso_date(proposal.target_date)
    );
}

fn print_feasibility(result: &FeasibilityResult) {
    if result.feasible {
        println!("Feasibility: Looks good!");
        return;
    }

    println!("Feasibility: Not quite on this timeline.");
    for reason in &result.reasons {
        println!("  - {}", reason);
    }
    if result.tradeoffs.is_empty() {
        println!("No suggestions; adjust the distance, time or date and try again.");
    } else {
        println!("Trade-offs to consider:");
        for (i, tradeoff) in result.tradeoffs.iter().enumerate() {
            println!("  {}. {}", i + 1, tradeoff);
        }
    }
}

fn print_plan(plan: &Plan, from: Option<NaiveDate>, to: Option<NaiveDate>, key_only: bool) {
    println!("Plan {}", plan.id);
    let shown = plan
        .workouts
        .iter()
        .filter(|w| from.map_or(true, |d| w.wdate >= d))
        .filter(|w| to.map_or(true, |d| w.wdate <= d))
        .filter(|w| !key_only || w.is_key);
    for workout in shown {
        println!("  {}", workout.summary_line());
    }
}
