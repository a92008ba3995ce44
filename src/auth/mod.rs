//! Authentication module for the summarizer client.
//!
//! The summarization API may sit behind a bearer-token gate. Providers add
//! their headers to every outgoing request; when no key is configured the
//! client uses [`NoAuth`].

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

/// Authentication provider trait.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Get the authentication scheme name.
    fn scheme(&self) -> &str;
}

/// Bearer-token authentication provider.
pub struct ApiKeyAuth {
    api_key: SecretString,
}

impl ApiKeyAuth {
    /// Creates a new API key authentication provider.
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }

    /// Creates from a string API key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
        }
    }

    /// Gets a hint of the API key for debugging (last 4 characters).
    pub fn key_hint(&self) -> String {
        let key = self.api_key.expose_secret();
        let chars = key.chars().count();
        if chars > 4 {
            format!("...{}", key.chars().skip(chars - 4).collect::<String>())
        } else {
            "****".to_string()
        }
    }
}

impl AuthProvider for ApiKeyAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key.expose_secret()),
        );
    }

    fn scheme(&self) -> &str {
        "Bearer"
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &"[REDACTED]")
            .field("key_hint", &self.key_hint())
            .finish()
    }
}

/// Provider for deployments without authentication.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAuth;

impl AuthProvider for NoAuth {
    fn apply_auth(&self, _headers: &mut HashMap<String, String>) {}

    fn scheme(&self) -> &str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_auth_apply() {
        let auth = ApiKeyAuth::from_string("token_12345");
        let mut headers = HashMap::new();

        auth.apply_auth(&mut headers);

        assert_eq!(
            headers.get("Authorization"),
            Some(&"Bearer token_12345".to_string())
        );
        assert_eq!(auth.scheme(), "Bearer");
    }

    #[test]
    fn test_api_key_auth_debug_redacts() {
        let auth = ApiKeyAuth::from_string("token_secret_9876");
        let debug_str = format!("{:?}", auth);

        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("...9876"));
        assert!(!debug_str.contains("token_secret"));
    }

    #[test]
    fn test_no_auth_adds_nothing() {
        let mut headers = HashMap::new();
        NoAuth.apply_auth(&mut headers);
        assert!(headers.is_empty());
    }
}
