// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Service layer for talking to the planning service.

pub mod credentials;
pub mod planning;

pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use planning::PlanningClient;
