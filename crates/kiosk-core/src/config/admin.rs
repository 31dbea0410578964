//! Admin access configuration.

use serde::{Deserialize, Serialize};

/// Admin secret used by the HTTP and websocket layers.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    /// Shared admin password. An empty password disables admin access.
    #[serde(default)]
    pub password: String,
}

impl AdminConfig {
    /// Check a caller-supplied password against the configured one.
    pub fn verify(&self, candidate: &str) -> bool {
        !self.password.is_empty() && self.password == candidate
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password", &"****")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_password_never_matches() {
        let config = AdminConfig::default();
        assert!(!config.verify(""));
    }

    #[test]
    fn test_verify() {
        let config = AdminConfig {
            password: "letmein".to_string(),
        };
        assert!(config.verify("letmein"));
        assert!(!config.verify("LETMEIN"));
        assert!(!format!("{config:?}").contains("letmein"));
    }
}
