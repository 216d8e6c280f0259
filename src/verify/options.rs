#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use crate::smtp_verify::SmtpProbeOptions;

pub const DEFAULT_VERIFY_TIMEOUT_MS: u64 = 5_000;
pub const MIN_VERIFY_TIMEOUT_MS: u64 = 2_000;
pub const MAX_VERIFY_TIMEOUT_MS: u64 = 15_000;

/// Knobs for one verification.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Run the SMTP and catch-all probes.
    pub deep: bool,
    /// Outer timeout, clamped to `[2000, 15000]`; also used for SMTP.
    pub timeout_ms: u64,
    /// Part of a bulk run; only changes the greylist note.
    pub bulk: bool,
    /// HELO domain and port for the probes; the HELO domain defaults to
    /// `VERIFIER_HELO_DOMAIN` when set.
    pub smtp: SmtpProbeOptions,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            deep: true,
            timeout_ms: DEFAULT_VERIFY_TIMEOUT_MS,
            bulk: false,
            smtp: SmtpProbeOptions::from_env(),
        }
    }
}

impl VerifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_bulk(mut self, bulk: bool) -> Self {
        self.bulk = bulk;
        self
    }

    pub fn with_smtp(mut self, smtp: SmtpProbeOptions) -> Self {
        self.smtp = smtp;
        self
    }

    pub fn effective_timeout_ms(&self) -> u64 {
        self.timeout_ms
            .clamp(MIN_VERIFY_TIMEOUT_MS, MAX_VERIFY_TIMEOUT_MS)
    }

    /// SMTP options carrying the outer timeout.
    pub fn probe_options(&self) -> SmtpProbeOptions {
        self.smtp
            .clone()
            .with_timeout_ms(self.effective_timeout_ms())
    }
}
