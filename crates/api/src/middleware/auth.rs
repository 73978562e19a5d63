//! # Authorization Module
//!
//! Every request is resolved to a [`Caller`] before the handler runs. The
//! caller's role comes from an optional `Authorization: Bearer <token>`
//! header, verified with Argon2 against the token hashes from the
//! configuration:
//!
//! - no header: [`Role::Customer`]
//! - token matching `ADMIN_TOKEN_HASH`: [`Role::Admin`]
//! - token matching `STAFF_TOKEN_HASH`: [`Role::Staff`]
//! - anything else: rejected with 401
//!
//! Handlers then call [`Caller::require`] with the capability they need.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use eyre::{eyre, Result};
use rand::{distributions::Alphanumeric, Rng};
use washbay_core::{
    access::{Capability, Role},
    errors::WashError,
};

use crate::{middleware::error_handling::AppError, ApiState};

const TOKEN_LENGTH: usize = 40;

/// Hashes an access token using Argon2 with a random salt.
///
/// The result is a PHC string suitable for `ADMIN_TOKEN_HASH` or
/// `STAFF_TOKEN_HASH`.
pub fn hash_token(token: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let token_hash = Argon2::default()
        .hash_password(token.as_bytes(), &salt)
        .map_err(|e| eyre!("Error hashing token: {}", e))?
        .to_string();

    Ok(token_hash)
}

/// Generates a random alphanumeric access token.
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Token hashes that unlock the elevated roles.
#[derive(Debug, Clone, Default)]
pub struct AccessTokens {
    admin_hash: Option<String>,
    staff_hash: Option<String>,
}

impl AccessTokens {
    /// Validates that both hashes are well-formed PHC strings.
    pub fn new(admin_hash: Option<String>, staff_hash: Option<String>) -> Result<Self> {
        for (role, hash) in [("admin", &admin_hash), ("staff", &staff_hash)] {
            if let Some(hash) = hash {
                PasswordHash::new(hash)
                    .map_err(|e| eyre!("Invalid {} token hash: {}", role, e))?;
            }
        }

        Ok(Self {
            admin_hash,
            staff_hash,
        })
    }

    /// Returns the role unlocked by `token`, checking admin before staff.
    pub fn resolve(&self, token: &str) -> Option<Role> {
        [(Role::Admin, &self.admin_hash), (Role::Staff, &self.staff_hash)]
            .into_iter()
            .find_map(|(role, hash)| {
                let hash = hash.as_deref()?;
                verify_token(token, hash).then_some(role)
            })
    }
}

fn verify_token(token: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(token.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// The identity a request is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub role: Role,
}

impl Caller {
    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        self.role.require(capability).map_err(AppError)
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) else {
            return Ok(Caller {
                role: Role::Customer,
            });
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                WashError::Authentication("Expected 'Authorization: Bearer <token>'".to_string())
            })?
            .to_string();

        // Argon2 verification is deliberately slow; keep it off the async workers.
        let tokens = state.access_tokens.clone();
        let role = tokio::task::spawn_blocking(move || tokens.resolve(&token))
            .await
            .map_err(|e| WashError::Internal(Box::new(e)))?;

        match role {
            Some(role) => Ok(Caller { role }),
            None => {
                tracing::warn!("Rejected request with unknown access token");
                Err(AppError(WashError::Authentication(
                    "Invalid access token".to_string(),
                )))
            }
        }
    }
}
