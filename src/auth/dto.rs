use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::tokens::TokenPair;

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Password must have at least {0} characters")]
    PasswordTooShort(usize),
}

/// Email/password pair that passed validation. The email is trimmed and
/// lowercased.
pub struct Credentials {
    pub email: String,
    pub password: String,
}

fn normalized_email(raw: &str) -> Result<String, CredentialError> {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    let email = raw.trim().to_lowercase();
    if EMAIL_RE.is_match(&email) {
        Ok(email)
    } else {
        Err(CredentialError::InvalidEmail)
    }
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Credentials, CredentialError> {
        let email = normalized_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        Ok(Credentials {
            email,
            password: self.password,
        })
    }
}

/// Login only normalizes the email; the password is checked against the hash.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, CredentialError> {
        Ok(Credentials {
            email: normalized_email(&self.email)?,
            password: self.password,
        })
    }
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
}

/// Body of register, login and refresh responses.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str) -> Result<Credentials, CredentialError> {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
        }
        .validate()
    }

    #[test]
    fn register_normalizes_email() {
        let c = register("  Ana@Example.COM ", "secreto").unwrap();
        assert_eq!(c.email, "ana@example.com");
        assert_eq!(c.password, "secreto");
    }

    #[test]
    fn register_rules() {
        assert_eq!(register("ana@example", "secreto").err(), Some(CredentialError::InvalidEmail));
        assert_eq!(
            register("ana example@x.com", "secreto").err(),
            Some(CredentialError::InvalidEmail)
        );
        assert_eq!(
            register("ana@example.com", "12345").err(),
            Some(CredentialError::PasswordTooShort(6))
        );
        // six characters, two of them multi-byte
        assert!(register("ana@example.com", "añoñoo").is_ok());
    }

    #[test]
    fn login_skips_password_length() {
        let c = LoginRequest {
            email: "ANA@example.com".into(),
            password: "x".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(c.email, "ana@example.com");
    }

    #[test]
    fn auth_response_flattens_tokens() {
        let body = serde_json::to_value(AuthResponse {
            tokens: TokenPair {
                access_token: "a".into(),
                refresh_token: "r".into(),
            },
            user: PublicUser {
                id: Uuid::nil(),
                email: "ana@example.com".into(),
            },
        })
        .unwrap();
        assert_eq!(body["access_token"], "a");
        assert_eq!(body["refresh_token"], "r");
        assert_eq!(body["user"]["email"], "ana@example.com");
    }
}
