#![forbid(unsafe_code)]
//! mailverify_lib: estimate whether an address can receive mail without
//! sending any.
//!
//! Syntax, DNS posture, a live SMTP `RCPT` probe and a catch-all control
//! probe are folded into one [`VerificationResult`] with a status, a
//! 0..=100 score and a flag set.

pub mod bulk;
pub mod dns;
pub mod ratelimit;
pub mod registry;
pub mod smtp_verify;
pub mod validator;
pub mod verify;

pub use bulk::{BULK_WORKERS, BulkReport, MAX_BULK_EMAILS, dispatch, verify_bulk};
#[cfg(feature = "with-csv")]
pub use bulk::emails_from_csv;
pub use dns::{DnsError, DnsLookup, DnsPosture, MxRecord, system_resolver};
pub use ratelimit::{InMemoryRateLimiter, RateLimitStore, RateVerdict};
pub use registry::{DomainIntel, StaticLists, reputation_score};
pub use smtp_verify::{
    CatchAllReport, CatchAllVerdict, ProbeCategory, RcptProbe, SmtpProbeOptions, SmtpProbeResult,
    SmtpVerifyError, TcpProber, detect_catch_all, verify_rcpt,
};
pub use validator::{EmailAddress, EmailError, ValidationReport, parse_email, validate_email};
pub use verify::{
    Flag, FlagSet, QuickCheck, QuickStatus, SubCheck, VerificationResult, VerificationStatus,
    VerificationStep, Verifier, VerifyError, VerifyOptions, quick_check, verify_email,
};
