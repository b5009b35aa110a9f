use crate::error::AocError;
use log::debug;
use std::env;
use std::fmt;

pub const SESSION_VAR: &str = "AOC_SESSION";
pub const USER_VAR: &str = "AOC_USER";
pub const USER_AGENT_VAR: &str = "AOC_USER_AGENT";
pub const EMAIL_VAR: &str = "AOC_EMAIL";

/// Read a required variable from the process environment.
///
/// An empty value is treated the same as an absent one.
pub fn resolve_credential(name: &'static str) -> Result<String, AocError> {
    require(name, purpose_of(name), process_env)
}

/// Lookup backed by the process environment.
pub fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn purpose_of(name: &str) -> &'static str {
    match name {
        SESSION_VAR => "session cookie",
        USER_VAR => "user id",
        _ => "required value",
    }
}

fn lookup_non_empty(name: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    lookup(name).filter(|v| !v.is_empty())
}

fn require(
    name: &'static str,
    purpose: &'static str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, AocError> {
    lookup_non_empty(name, lookup).ok_or(AocError::MissingConfiguration { name, purpose })
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    session_token: String,
    user_id: String,
}

impl Credentials {
    pub fn new(session_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            session_token: session_token.into(),
            user_id: user_id.into(),
        }
    }

    pub fn from_env() -> Result<Self, AocError> {
        Self::from_lookup(process_env)
    }

    /// Resolve both secrets through `lookup`, session cookie first.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AocError> {
        let session_token = require(SESSION_VAR, purpose_of(SESSION_VAR), &lookup)?;
        let user_id = require(USER_VAR, purpose_of(USER_VAR), &lookup)?;
        debug!("Resolved credentials for user {}", user_id);
        Ok(Self {
            session_token,
            user_id,
        })
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("session_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Optional values sent as outbound identification headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub user_agent: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            user_agent: lookup_non_empty(USER_AGENT_VAR, &lookup),
            email: lookup_non_empty(EMAIL_VAR, &lookup),
        }
    }
}
