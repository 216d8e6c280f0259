use thiserror::Error;

/// Errors raised at the DNS seam.
///
/// Only [`DnsError::ResolverInit`] ever reaches callers of the verification
/// engine; lookup failures are downgraded to "record absent" by
/// [`DnsPosture`](super::DnsPosture).
#[derive(Debug, Error)]
pub enum DnsError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("{kind} lookup failed for {name}: {source}")]
    Lookup {
        kind: &'static str,
        name: String,
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
}

impl DnsError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn lookup(
        kind: &'static str,
        name: impl Into<String>,
        source: trust_dns_resolver::error::ResolveError,
    ) -> Self {
        Self::Lookup {
            kind,
            name: name.into(),
            source,
        }
    }
}
