//! Service configuration.
//!
//! Values come from the CLI or the environment (see `main.rs`); this module
//! holds the validated result.

use anyhow::{bail, Result};
use std::net::SocketAddr;
use tracing::warn;

use crate::ledger::LEDGER_CAP;

/// Placeholder secret used when `MC_WEBHOOK_SECRET` is unset. Dev and tests only.
pub const DEFAULT_SECRET: &str = "dev-secret-change-me";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Clone)]
pub struct WebhookConfig {
    pub secret: String,
    pub bind_addr: SocketAddr,
    pub environment: Environment,
    pub ledger_cap: usize,
}

impl WebhookConfig {
    /// Development config on the default port with the placeholder secret
    pub fn development() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            environment: Environment::Development,
            ledger_cap: LEDGER_CAP,
        }
    }

    /// Reject configurations that must never serve traffic.
    ///
    /// The placeholder secret is tolerated in development with a warning.
    pub fn validate(&self) -> Result<()> {
        if self.secret.trim().is_empty() {
            bail!("MC_WEBHOOK_SECRET must not be empty");
        }

        if self.ledger_cap == 0 {
            bail!("LEDGER_CAP must be greater than zero");
        }

        if self.uses_default_secret() {
            match self.environment {
                Environment::Production => {
                    bail!("MC_WEBHOOK_SECRET is the insecure default; set a real secret for production")
                }
                Environment::Development => {
                    warn!("⚠️ Using default webhook secret, do not expose this instance")
                }
            }
        }

        Ok(())
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

// Keep the secret out of logs
impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("secret", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .field("environment", &self.environment)
            .field("ledger_cap", &self.ledger_cap)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults_are_valid() {
        let config = WebhookConfig::development();
        assert!(config.uses_default_secret());
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.ledger_cap, 200);
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let config = WebhookConfig {
            environment: Environment::Production,
            ..WebhookConfig::development()
        };
        assert!(config.validate().is_err());

        let config = WebhookConfig {
            secret: "a-real-shared-secret".to_string(),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_secret_and_zero_cap() {
        let config = WebhookConfig {
            secret: "  ".to_string(),
            ..WebhookConfig::development()
        };
        assert!(config.validate().is_err());

        let config = WebhookConfig {
            ledger_cap: 0,
            ..WebhookConfig::development()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = WebhookConfig {
            secret: "super-secret-value".to_string(),
            ..WebhookConfig::development()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret-value"));
        assert!(printed.contains("<redacted>"));
    }
}
