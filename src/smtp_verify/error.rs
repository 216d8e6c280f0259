use thiserror::Error;

/// Connection-level failures. Protocol answers, timeouts included, are
/// reported as [`SmtpProbeResult`](super::SmtpProbeResult) values instead.
#[derive(Debug, Error)]
pub enum SmtpVerifyError {
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
}

impl SmtpVerifyError {
    pub(crate) fn connect(host: impl Into<String>, source: std::io::Error) -> Self {
        Self::Connect {
            host: host.into(),
            source,
        }
    }

    pub(crate) fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}
