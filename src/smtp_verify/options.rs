use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_HELO_DOMAIN: &str = "verifier.local";
pub const HELO_DOMAIN_ENV: &str = "VERIFIER_HELO_DOMAIN";
pub const DEFAULT_TIMEOUT_MS: u64 = 9_000;
pub const MIN_TIMEOUT_MS: u64 = 3_000;
pub const MAX_TIMEOUT_MS: u64 = 20_000;

/// Configuration knobs for a single RCPT probe.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProbeOptions {
    pub helo_domain: String,
    pub port: u16,
    /// Overall conversation deadline; clamped by [`SmtpProbeOptions::timeout`].
    pub timeout_ms: u64,
}

impl Default for SmtpProbeOptions {
    fn default() -> Self {
        Self {
            helo_domain: DEFAULT_HELO_DOMAIN.to_string(),
            port: 25,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl SmtpProbeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the HELO domain taken from `VERIFIER_HELO_DOMAIN` when set.
    pub fn from_env() -> Self {
        Self::default().with_helo_override(std::env::var(HELO_DOMAIN_ENV).ok())
    }

    pub fn with_helo_domain(mut self, helo: impl Into<String>) -> Self {
        self.helo_domain = helo.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn with_helo_override(self, value: Option<String>) -> Self {
        match value {
            Some(helo) if !helo.trim().is_empty() => self.with_helo_domain(helo.trim()),
            _ => self,
        }
    }

    pub fn effective_timeout_ms(&self) -> u64 {
        self.timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.effective_timeout_ms())
    }

    pub fn helo(&self) -> &str {
        let trimmed = self.helo_domain.trim();
        if trimmed.is_empty() {
            DEFAULT_HELO_DOMAIN
        } else {
            trimmed
        }
    }
}
