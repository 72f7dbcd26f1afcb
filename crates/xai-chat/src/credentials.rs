//! Bearer credentials attached to every call

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, ErrorKind, Result};

/// Yields the bearer credential for each call
pub trait CredentialSource: Send + Sync {
    /// Current credential, or an `Auth` error when none is available
    fn bearer_token(&self) -> Result<SecretString>;
}

impl<F> CredentialSource for F
where
    F: Fn() -> Result<SecretString> + Send + Sync,
{
    fn bearer_token(&self) -> Result<SecretString> {
        self()
    }
}

/// Fixed API key
#[derive(Clone)]
pub struct StaticApiKey(SecretString);

impl StaticApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// Key safe for logs: first and last four characters, or `****` for short keys
    pub fn redacted(&self) -> String {
        let chars: Vec<char> = self.0.expose_secret().chars().collect();
        if chars.len() < 12 {
            return "****".to_owned();
        }

        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}****{tail}")
    }
}

impl From<SecretString> for StaticApiKey {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

impl fmt::Debug for StaticApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticApiKey").field(&self.redacted()).finish()
    }
}

impl CredentialSource for StaticApiKey {
    fn bearer_token(&self) -> Result<SecretString> {
        if self.is_empty() {
            return Err(Error::new(ErrorKind::Auth, "API key is empty"));
        }
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_keys_show_both_ends() {
        let key = StaticApiKey::new("xai-abcdefghijklmnop");
        assert_eq!(key.redacted(), "xai-****mnop");
        assert_eq!(format!("{key:?}"), "StaticApiKey(\"xai-****mnop\")");
    }

    #[test]
    fn short_keys_are_fully_masked() {
        assert_eq!(StaticApiKey::new("short-key").redacted(), "****");
        assert_eq!(StaticApiKey::new("").redacted(), "****");
    }

    #[test]
    fn empty_key_is_an_auth_error() {
        let err = StaticApiKey::new("").bearer_token().unwrap_err();
        assert_eq!(err, ErrorKind::Auth);
    }

    #[test]
    fn closures_are_credential_sources() {
        let rotating = || -> Result<SecretString> { Ok(SecretString::from("rotated-token".to_owned())) };
        assert_eq!(rotating.bearer_token().unwrap().expose_secret(), "rotated-token");

        let unavailable = || -> Result<SecretString> { Err(Error::new(ErrorKind::Auth, "vault sealed")) };
        assert!(unavailable.bearer_token().is_err());
    }
}
