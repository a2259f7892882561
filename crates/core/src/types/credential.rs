//! Account credentials.
//!
//! The marketplace API authenticates every mutating call with a
//! username/password pair in the request body, so the storefront keeps the
//! pair for the lifetime of a login. The password is wrapped in a
//! [`SecretString`] so it never ends up in logs.

use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Errors that can occur when validating [`Credentials`].
///
/// The display strings are shown to visitors as-is.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsError {
    /// Username shorter than [`Credentials::MIN_LENGTH`].
    #[error("Username must contain at least 3 characters.")]
    UsernameTooShort,
    /// Password shorter than [`Credentials::MIN_LENGTH`].
    #[error("Password must contain at least 3 characters.")]
    PasswordTooShort,
}

/// A validated username/password pair.
///
/// Holding a `Credentials` value is what "logged in" means for the
/// storefront: both fields are at least three characters long.
#[derive(Debug)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Minimum length, in characters, of both username and password.
    pub const MIN_LENGTH: usize = 3;

    /// Validate a username/password pair.
    ///
    /// The username is checked first, so a form with both fields too short
    /// reports the username.
    ///
    /// # Errors
    ///
    /// Returns an error if either field is shorter than three characters.
    pub fn parse(username: &str, password: &str) -> Result<Self, CredentialsError> {
        if username.chars().count() < Self::MIN_LENGTH {
            return Err(CredentialsError::UsernameTooShort);
        }
        if password.chars().count() < Self::MIN_LENGTH {
            return Err(CredentialsError::PasswordTooShort);
        }

        Ok(Self {
            username: username.to_owned(),
            password: SecretString::from(password.to_owned()),
        })
    }

    /// The account's username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The account's password.
    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            username: self.username.clone(),
            password: SecretString::from(self.password.expose_secret().to_owned()),
        }
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
            && self.password.expose_secret() == other.password.expose_secret()
    }
}

impl Eq for Credentials {}

// Serialized as `{"username": ..., "password": ...}`, the shape the
// marketplace API expects in request bodies.
impl Serialize for Credentials {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Credentials", 2)?;
        state.serialize_field("username", &self.username)?;
        state.serialize_field("password", self.password.expose_secret())?;
        state.end()
    }
}

#[derive(Deserialize)]
struct RawCredentials {
    username: String,
    password: String,
}

impl<'de> Deserialize<'de> for Credentials {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCredentials::deserialize(deserializer)?;
        Self::parse(&raw.username, &raw.password).map_err(serde::de::Error::custom)
    }
}
