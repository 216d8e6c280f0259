use thiserror::Error;

use crate::dns::DnsError;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Dns(#[from] DnsError),
    #[error("invalid email address: {}", reasons.join("; "))]
    InvalidEmail { reasons: Vec<String> },
}

impl VerifyError {
    pub(crate) fn invalid_email(reasons: Vec<String>) -> Self {
        Self::InvalidEmail { reasons }
    }
}
