//! SMTP mailbox probing.
//!
//! [`verify_rcpt`] drives one `greet → ehlo → mail → rcpt` conversation
//! through the pure [`transition`] function and classifies the final reply.
//! [`detect_catch_all`] pairs a target probe with a random control address
//! on the same host to tell real mailboxes from catch-all servers.

mod catch_all;
mod classify;
mod error;
mod options;
mod probe;
mod session;
mod state;
mod types;

pub use catch_all::{MAX_CATCH_ALL_HOSTS, derive_verdict, detect_catch_all};
pub use classify::{classify_rcpt, is_policy_block};
pub use error::SmtpVerifyError;
pub use options::{
    DEFAULT_HELO_DOMAIN, DEFAULT_TIMEOUT_MS, HELO_DOMAIN_ENV, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS,
    SmtpProbeOptions,
};
pub use probe::{RcptProbe, TcpProber, verify_rcpt};
pub use state::{Action, Conversation, Envelope, SmtpState, is_continuation, reply_code, transition};
pub use types::{CatchAllReport, CatchAllVerdict, ProbeCategory, SmtpProbeResult};
