use std::fmt;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Classification of the final reply to `RCPT TO`.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProbeCategory {
    /// 2xx: the server took the recipient.
    Accept,
    /// Permanent refusal of the mailbox itself.
    Reject,
    /// Transient, policy or otherwise inconclusive answer.
    Temp,
    /// No conversation took place.
    #[default]
    Unknown,
}

impl ProbeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Temp => "temp",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProbeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one SMTP conversation.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProbeResult {
    pub category: ProbeCategory,
    /// Reply code, 0 when the server never produced a terminal reply.
    pub code: u16,
    /// Raw final reply line.
    pub message: String,
}

impl SmtpProbeResult {
    pub fn new(category: ProbeCategory, code: u16, message: impl Into<String>) -> Self {
        Self {
            category,
            code,
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::new(ProbeCategory::Temp, 0, "timeout")
    }

    pub fn connection_closed() -> Self {
        Self::new(ProbeCategory::Temp, 0, "connection closed")
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ProbeCategory::Unknown, 0, message)
    }
}

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatchAllVerdict {
    Exists,
    DoesNotExist,
    CatchAll,
    Unknown,
}

impl CatchAllVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::DoesNotExist => "does_not_exist",
            Self::CatchAll => "catch_all",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CatchAllVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target and control probes against the first host that answered.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchAllReport {
    /// Host both probes ran against; `None` when no host could be reached.
    pub host: Option<String>,
    pub target: SmtpProbeResult,
    pub control: SmtpProbeResult,
    pub verdict: CatchAllVerdict,
}

impl CatchAllReport {
    pub fn reached_host(&self) -> bool {
        self.host.is_some()
    }
}
