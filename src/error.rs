// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with consistent user-facing messages.

/// Error type for every session and service operation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("{message}")]
    Service {
        status: Option<u16>,
        message: String,
    },

    #[error("Goal {0} is not feasible yet; adjust it before generating a plan")]
    NotFeasible(String),

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build a service error from a status code and message.
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        AppError::Service {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Unauthorized => "unauthorized",
            AppError::SessionExpired(_) => "session_expired",
            AppError::Service { .. } => "service_error",
            AppError::NotFeasible(_) => "not_feasible",
            AppError::InvalidState(_) => "invalid_state",
            AppError::Storage(_) => "storage_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Whether the caller must re-authenticate before retrying.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AppError::Unauthorized | AppError::SessionExpired(_))
    }

    /// Whether the error was raised locally, before anything was sent.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::Unauthorized
                | AppError::NotFeasible(_)
                | AppError::InvalidState(_)
        )
    }

    /// HTTP status of a service error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Service { status, .. } => *status,
            AppError::SessionExpired(_) => Some(401),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .next()
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{} {}", field, detail)
            })
            .collect();
        fields.sort();
        AppError::Validation(fields.join(", "))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;
