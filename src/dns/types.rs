#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// `_dmarc` TXT record with its `p=` tag (if any).
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmarcRecord {
    pub record: String,
    pub policy: Option<String>,
}

impl DmarcRecord {
    pub fn policy_or_none(&self) -> &str {
        self.policy
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or("none")
    }
}

/// First DKIM selector that answered with a `v=DKIM1` record.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkimFinding {
    pub selector: String,
    pub record: String,
}

/// Everything the engine learns about a domain from DNS.
///
/// Every field degrades to empty/`None` when its lookup failed.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsPosture {
    pub domain: String,
    /// Sorted by ascending preference.
    pub mx: Vec<MxRecord>,
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
    pub spf: Option<String>,
    /// All SPF candidates, in answer order.
    pub spf_records: Vec<String>,
    pub dmarc: Option<DmarcRecord>,
    pub dkim: Option<DkimFinding>,
}

impl DnsPosture {
    pub fn has_mx(&self) -> bool {
        !self.mx.is_empty()
    }

    pub fn has_address(&self) -> bool {
        !self.ipv4.is_empty() || !self.ipv6.is_empty()
    }

    pub fn mx_hosts(&self) -> Vec<String> {
        self.mx.iter().map(|r| r.exchange.clone()).collect()
    }
}
