// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account requests and the token pair issued by the service.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// New account registration.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(range(min = 13, max = 95, message = "must be between 13 and 95"))]
    pub age: u32,
    #[validate(custom(function = "validate_sex"))]
    pub sex: String,
}

/// Login with existing credentials.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Access/refresh token pair returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

fn validate_sex(sex: &str) -> Result<(), validator::ValidationError> {
    match sex {
        "male" | "female" | "other" => Ok(()),
        _ => {
            let mut err = validator::ValidationError::new("sex");
            err.message = Some("must be one of male, female, other".into());
            Err(err)
        }
    }
}
