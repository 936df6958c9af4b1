//! Login gate in front of the records store.
//!
//! There is exactly one account and its credentials are compiled in. The
//! [`Authenticator`] trait is the seam where a real mechanism would plug in.

/// The single built-in account name.
pub const DEFAULT_USERNAME: &str = "admin";
/// The single built-in account password.
pub const DEFAULT_PASSWORD: &str = "admin";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Incorrect username or password.")]
    InvalidCredentials,
}

/// Decides whether a username/password pair may use the store.
pub trait Authenticator {
    fn authenticate(&self, username: &str, password: &str) -> Result<(), LoginError>;
}

/// Accepts one fixed username/password pair.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl Authenticator for StaticCredentials {
    fn authenticate(&self, username: &str, password: &str) -> Result<(), LoginError> {
        if username == self.username && password == self.password {
            Ok(())
        } else {
            tracing::warn!(username, "Rejected login");
            Err(LoginError::InvalidCredentials)
        }
    }
}

/// Check a pair against the built-in account.
pub fn check_credentials(username: &str, password: &str) -> bool {
    StaticCredentials::default()
        .authenticate(username, password)
        .is_ok()
}
