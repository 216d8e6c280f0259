use std::fmt;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// One pass/fail probe inside a [`VerificationStep`].
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCheck {
    pub name: String,
    pub pass: bool,
    #[cfg_attr(
        feature = "with-serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub info: Option<String>,
}

impl SubCheck {
    pub fn new(name: impl Into<String>, pass: bool) -> Self {
        Self {
            name: name.into(),
            pass,
            info: None,
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Attach `info` only when `cond` holds.
    pub fn with_info_if(self, cond: bool, info: impl FnOnce() -> String) -> Self {
        if cond { self.with_info(info()) } else { self }
    }
}

/// A named check category; passes when every sub-check passes.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationStep {
    pub name: String,
    pub pass: bool,
    pub subs: Vec<SubCheck>,
}

impl VerificationStep {
    pub fn new(name: impl Into<String>, subs: Vec<SubCheck>) -> Self {
        let pass = subs.iter().all(|sub| sub.pass);
        Self {
            name: name.into(),
            pass,
            subs,
        }
    }

    pub fn sub(&self, name: &str) -> Option<&SubCheck> {
        self.subs.iter().find(|sub| sub.name == name)
    }
}

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationStatus {
    Valid,
    Invalid,
    Disposable,
    CatchAll,
    Unknown,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Disposable => "disposable",
            Self::CatchAll => "catch_all",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    InvalidFormat,
    Parked,
    Disposable,
    Webmail,
    RoleBased,
    CatchAll,
    Greylist,
    PolicyBlock,
    HighRisk,
    SpamTrapRisk,
    /// The verification itself failed; only set on degraded bulk items.
    Error,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "invalid_format",
            Self::Parked => "parked",
            Self::Disposable => "disposable",
            Self::Webmail => "webmail",
            Self::RoleBased => "role_based",
            Self::CatchAll => "catch_all",
            Self::Greylist => "greylist",
            Self::PolicyBlock => "policy_block",
            Self::HighRisk => "high_risk",
            Self::SpamTrapRisk => "spam_trap_risk",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deduplicating flag container; keeps first-insertion order for display.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet(Vec<Flag>);

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the flag was already present.
    pub fn insert(&mut self, flag: Flag) -> bool {
        if self.contains(flag) {
            return false;
        }
        self.0.push(flag);
        true
    }

    pub fn insert_if(&mut self, cond: bool, flag: Flag) {
        if cond {
            self.insert(flag);
        }
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.0.contains(&flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flags joined with `sep`, e.g. for CSV cells.
    pub fn join(&self, sep: &str) -> String {
        self.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(sep)
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut set = Self::new();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

/// Report for one address.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub email: String,
    pub status: VerificationStatus,
    /// Always within `0..=100`.
    pub score: u8,
    pub flags: FlagSet,
    pub details: String,
    pub steps: Vec<VerificationStep>,
}

impl VerificationResult {
    /// Stand-in for an item whose verification failed outright.
    pub fn degraded(email: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            status: VerificationStatus::Unknown,
            score: 0,
            flags: [Flag::Error].into_iter().collect(),
            details: details.into(),
            steps: Vec::new(),
        }
    }

    pub fn step(&self, name: &str) -> Option<&VerificationStep> {
        self.steps.iter().find(|step| step.name == name)
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(flag)
    }
}
