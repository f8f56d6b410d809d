//! Single shared-secret access control.
//!
//! There is one operator account and one static API key. The key doubles as
//! the session token returned by [`Credentials::login`].

use serde::Serialize;

use crate::{EngineError, ResultEngine};

const BEARER_PREFIX: &str = "Bearer ";
const ADMIN_ROLE: &str = "admin";

#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub username: String,
    pub role: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}

impl Credentials {
    /// All three values are required; blank ones are rejected.
    pub fn new(
        api_key: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ResultEngine<Self> {
        let credentials = Self {
            api_key: api_key.into(),
            username: username.into(),
            password: password.into(),
        };
        for (value, label) in [
            (&credentials.api_key, "api key"),
            (&credentials.username, "username"),
            (&credentials.password, "password"),
        ] {
            if value.trim().is_empty() {
                return Err(EngineError::Validation(format!(
                    "{label} must not be empty"
                )));
            }
        }
        Ok(credentials)
    }

    /// Accepts exactly `Bearer <api key>`.
    pub fn verify_bearer(&self, authorization: Option<&str>) -> ResultEngine<()> {
        let token = authorization
            .and_then(|header| header.strip_prefix(BEARER_PREFIX))
            .ok_or(EngineError::Unauthorized)?;
        if constant_time_eq(token.as_bytes(), self.api_key.as_bytes()) {
            Ok(())
        } else {
            Err(EngineError::Unauthorized)
        }
    }

    pub fn login(&self, username: &str, password: &str) -> ResultEngine<LoginResponse> {
        let user_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
        if !(user_ok && password_ok) {
            tracing::warn!("rejected login attempt for {username:?}");
            return Err(EngineError::Unauthorized);
        }
        Ok(LoginResponse {
            token: self.api_key.clone(),
            user: SessionUser {
                username: self.username.clone(),
                role: ADMIN_ROLE.to_string(),
            },
        })
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("s3cret", "admin", "hunter2").unwrap()
    }

    #[test]
    fn bearer_must_match_exactly() {
        let creds = credentials();
        assert!(creds.verify_bearer(Some("Bearer s3cret")).is_ok());
        assert_eq!(creds.verify_bearer(None), Err(EngineError::Unauthorized));
        assert_eq!(
            creds.verify_bearer(Some("s3cret")),
            Err(EngineError::Unauthorized)
        );
        assert_eq!(
            creds.verify_bearer(Some("Bearer s3cret ")),
            Err(EngineError::Unauthorized)
        );
        assert_eq!(
            creds.verify_bearer(Some("Bearer other")),
            Err(EngineError::Unauthorized)
        );
    }

    #[test]
    fn login_returns_api_key_as_token() {
        let response = credentials().login("admin", "hunter2").unwrap();
        assert_eq!(response.token, "s3cret");
        assert_eq!(response.user.role, "admin");
        assert_eq!(
            credentials().login("admin", "wrong"),
            Err(EngineError::Unauthorized)
        );
    }

    #[test]
    fn blank_secrets_are_rejected() {
        assert!(Credentials::new("", "admin", "pw").is_err());
        assert!(Credentials::new("key", " ", "pw").is_err());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let printed = format!("{:?}", credentials());
        assert!(!printed.contains("s3cret"));
        assert!(!printed.contains("hunter2"));
    }
}
