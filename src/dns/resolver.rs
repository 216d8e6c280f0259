use trust_dns_resolver::{
    Resolver,
    error::{ResolveError, ResolveErrorKind},
    lookup::TxtLookup,
};

use super::{DnsError, MxRecord};

/// Build the blocking system resolver (`/etc/resolv.conf` or platform equivalent).
pub fn system_resolver() -> Result<Resolver, DnsError> {
    Resolver::from_system_conf().map_err(DnsError::resolver_init)
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, DnsError> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(DnsError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(DnsError::idna)
}

pub(crate) fn fqdn(label: &str, domain: &str) -> String {
    let trimmed = label.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", trimmed.to_ascii_lowercase(), domain)
    }
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

/// DNS collaborator consumed by the engine.
///
/// "No such record" must come back as `Ok(vec![])`; any `Err` is treated as
/// absence by the callers anyway, but keeps the cause around for logs.
pub trait DnsLookup {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError>;
    fn lookup_ipv4(&self, domain: &str) -> Result<Vec<String>, DnsError>;
    fn lookup_ipv6(&self, domain: &str) -> Result<Vec<String>, DnsError>;
    /// Each returned string is one TXT record with its chunks concatenated.
    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError>;
}

impl DnsLookup for Resolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        let lookup = match Resolver::mx_lookup(self, domain) {
            Ok(lookup) => lookup,
            Err(err) if should_treat_as_empty(&err) => return Ok(Vec::new()),
            Err(err) => return Err(DnsError::lookup("MX", domain, err)),
        };
        let mut records = Vec::new();
        for mx in lookup.iter() {
            let exchange = normalize_exchange(mx.exchange().to_utf8());
            records.push(MxRecord::new(mx.preference(), exchange));
        }
        Ok(records)
    }

    fn lookup_ipv4(&self, domain: &str) -> Result<Vec<String>, DnsError> {
        match Resolver::ipv4_lookup(self, domain) {
            Ok(lookup) => Ok(lookup.iter().map(|a| a.0.to_string()).collect()),
            Err(err) if should_treat_as_empty(&err) => Ok(Vec::new()),
            Err(err) => Err(DnsError::lookup("A", domain, err)),
        }
    }

    fn lookup_ipv6(&self, domain: &str) -> Result<Vec<String>, DnsError> {
        match Resolver::ipv6_lookup(self, domain) {
            Ok(lookup) => Ok(lookup.iter().map(|aaaa| aaaa.0.to_string()).collect()),
            Err(err) if should_treat_as_empty(&err) => Ok(Vec::new()),
            Err(err) => Err(DnsError::lookup("AAAA", domain, err)),
        }
    }

    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        match Resolver::txt_lookup(self, name) {
            Ok(lookup) => Ok(collect_txt_records(&lookup)),
            Err(err) if should_treat_as_empty(&err) => Ok(Vec::new()),
            Err(err) => Err(DnsError::lookup("TXT", name, err)),
        }
    }
}

fn collect_txt_records(lookup: &TxtLookup) -> Vec<String> {
    let mut records = Vec::new();
    for txt in lookup.iter() {
        let mut record = String::new();
        for piece in txt.txt_data().iter() {
            record.push_str(&String::from_utf8_lossy(piece));
        }
        records.push(record);
    }
    records
}

fn should_treat_as_empty(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_domain_rejects_empty() {
        let err = normalize_domain("  ").expect_err("empty domain should fail");
        assert!(matches!(err, DnsError::EmptyDomain));
    }

    #[test]
    fn normalize_domain_strips_root_dot() {
        assert_eq!(normalize_domain("Example.COM.").unwrap(), "example.com");
    }

    #[test]
    fn fqdn_prefixes_label() {
        assert_eq!(fqdn("_DMARC", "example.com"), "_dmarc.example.com");
        assert_eq!(fqdn("", "example.com"), "example.com");
    }

    #[test]
    fn normalize_exchange_trims_dot_and_lowercases() {
        let out = normalize_exchange("Mail.EXAMPLE.com.".to_string());
        assert_eq!(out, "mail.example.com");
    }
}
