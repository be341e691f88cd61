use secrecy::Secret;
use serde::Deserialize;

use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("Session token is unknown or expired.")]
    InvalidSession,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// `?sessionToken=...` as sent by the mobile clients.
#[derive(Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionToken")]
    pub session_token: Secret<String>,
}
