//! API key wrapper that prevents accidental exposure in logs.

use serde::{Deserialize, Serialize};

/// An image-API key secret.
///
/// The inner value is only accessible via [`expose()`](ApiKey::expose).
/// Debug and Display implementations show `[REDACTED]` instead of the value.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new key from a string value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the key value.
    ///
    /// Use sparingly and never log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Consume the key and return the inner value.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// A display-safe form showing only the first and last few characters,
    /// e.g. `sk-nt…qlL5`.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 9 {
            return "…".to_string();
        }
        let head: String = chars[..5].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}…{}", head, tail)
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for ApiKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for ApiKey {}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_debug_redacted() {
        let key = ApiKey::new("sk-super-secret");
        let debug = format!("{:?}", key);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_api_key_display_redacted() {
        let key = ApiKey::new("sk-super-secret");
        let display = format!("{}", key);
        assert!(!display.contains("super-secret"));
        assert!(display.contains("REDACTED"));
    }

    #[test]
    fn test_api_key_masked_keeps_edges_only() {
        let key = ApiKey::new("sk-nt9ybCyhxSz5oMZ6wtztjTaIu39tDNWhWD3aoBHRwwNZqlL5");
        let masked = key.masked();
        assert_eq!(masked, "sk-nt…qlL5");
        assert!(!masked.contains("9ybCyhxSz5"));
    }

    #[test]
    fn test_api_key_masked_short_value_fully_hidden() {
        let key = ApiKey::new("sk-short");
        assert_eq!(key.masked(), "…");
    }

    #[test]
    fn test_api_key_expose_roundtrip() {
        let key = ApiKey::new("sk-value");
        assert_eq!(key.expose(), "sk-value");
        assert_eq!(key.into_inner(), "sk-value");
    }
}
