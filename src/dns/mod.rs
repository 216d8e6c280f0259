//! DNS posture of a mail domain: MX, A/AAAA, SPF, DMARC and DKIM.
//!
//! Lookups never abort a verification. Whatever fails is logged at `debug`
//! and shows up as an empty list or `None` in [`DnsPosture`].

mod dkim;
mod dmarc;
mod error;
mod resolver;
mod spf;
mod types;

pub use dkim::DEFAULT_SELECTORS;
pub use error::DnsError;
pub use resolver::{DnsLookup, system_resolver};
pub use spf::{SpfQualifier, qualifier as spf_qualifier, syntax_plausible as spf_syntax_plausible};
pub use types::{DkimFinding, DmarcRecord, DnsPosture, MxRecord};

use std::thread;

use tracing::debug;

use resolver::{fqdn, normalize_domain};

impl DnsPosture {
    /// Resolve the full posture of `domain` through `resolver`.
    ///
    /// Only a domain that cannot be turned into ASCII yields an error.
    pub fn resolve<R>(resolver: &R, domain: &str) -> Result<Self, DnsError>
    where
        R: DnsLookup + Sync + ?Sized,
    {
        let ascii = normalize_domain(domain)?;

        let mut mx = degrade(resolver.lookup_mx(&ascii), "MX", &ascii);
        mx.sort();
        mx.dedup();

        let ipv4 = degrade(resolver.lookup_ipv4(&ascii), "A", &ascii);
        let ipv6 = degrade(resolver.lookup_ipv6(&ascii), "AAAA", &ascii);

        let dmarc_name = fqdn("_dmarc", &ascii);
        let (apex_txt, dmarc_txt) = thread::scope(|scope| {
            let dmarc = scope.spawn(|| resolver.lookup_txt(&dmarc_name));
            let apex = resolver.lookup_txt(&ascii);
            let dmarc = dmarc.join().unwrap_or_else(|_| Ok(Vec::new()));
            (apex, dmarc)
        });
        let apex_txt = degrade(apex_txt, "TXT", &ascii);
        let dmarc_txt = degrade(dmarc_txt, "TXT", &dmarc_name);

        let spf_records = spf::spf_records(&apex_txt);
        let spf = spf_records.first().cloned();
        let dmarc = dmarc::find(&dmarc_txt);
        let dkim = dkim::probe_selectors(resolver, &ascii, DEFAULT_SELECTORS);

        Ok(Self {
            domain: ascii,
            mx,
            ipv4,
            ipv6,
            spf,
            spf_records,
            dmarc,
            dkim,
        })
    }

    /// Posture with nothing resolved, used when the domain itself is unusable.
    pub fn empty(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }
}

fn degrade<T>(result: Result<Vec<T>, DnsError>, kind: &str, name: &str) -> Vec<T> {
    match result {
        Ok(values) => values,
        Err(err) => {
            debug!(kind, %name, error = %err, "DNS lookup degraded to absent");
            Vec::new()
        }
    }
}
