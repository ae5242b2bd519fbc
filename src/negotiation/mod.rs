// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feasibility/tradeoff negotiation between the user and the planning service.

pub mod session;
pub mod state;
pub mod tradeoff;

pub use session::Session;
pub use state::SessionState;
pub use tradeoff::apply_tradeoff;
