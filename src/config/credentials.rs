use std::{env, fmt};

use dotenvy::dotenv;

use crate::config::error::ConfigError;
use crate::constants::{PASSWORD_ENV, USER_ENV};

/// Login for the LONI IDA database.
///
/// The IDA account is the one registered through the PPMI data access
/// application; the username is the account email address.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Resolves credentials from `$PPMI_USER` / `$PPMI_PASSWORD`, loading a
    /// `.env` file first if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let username = env::var(USER_ENV).map_err(|_| ConfigError::MissingCredential {
            kind: "user",
            var: USER_ENV,
        })?;
        let password = env::var(PASSWORD_ENV).map_err(|_| ConfigError::MissingCredential {
            kind: "password",
            var: PASSWORD_ENV,
        })?;
        Ok(Self::new(username, password))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}
