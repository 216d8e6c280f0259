use std::fmt;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use crate::dns::{DnsLookup, DnsPosture, MxRecord, system_resolver};
use crate::smtp_verify::{CatchAllReport, RcptProbe, SmtpProbeOptions, TcpProber, detect_catch_all};
use crate::validator::parse_email;

use super::VerifyError;

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickStatus {
    /// MX records published.
    Ok,
    /// No MX, but A/AAAA records an MTA may fall back to.
    HasA,
    NoMx,
}

impl fmt::Display for QuickStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::HasA => "has_a",
            Self::NoMx => "no_mx",
        })
    }
}

/// Lightweight domain-level answer: mail route, SPF/DMARC, optional probe.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickCheck {
    pub status: QuickStatus,
    pub message: String,
    pub domain: String,
    pub mx: Vec<MxRecord>,
    /// Every SPF record, space separated.
    pub spf: Option<String>,
    pub dmarc: Option<String>,
    pub probe: Option<CatchAllReport>,
}

impl QuickCheck {
    pub fn ok(&self) -> bool {
        self.status != QuickStatus::NoMx
    }
}

/// [`quick_check_with`] over the system resolver and real SMTP probes.
pub fn quick_check(
    email: &str,
    deep: bool,
    smtp: &SmtpProbeOptions,
) -> Result<QuickCheck, VerifyError> {
    let resolver = system_resolver()?;
    quick_check_with(&resolver, &TcpProber::new(smtp.clone()), email, deep)
}

pub fn quick_check_with<R, P>(
    resolver: &R,
    prober: &P,
    email: &str,
    deep: bool,
) -> Result<QuickCheck, VerifyError>
where
    R: DnsLookup + Sync + ?Sized,
    P: RcptProbe + ?Sized,
{
    let address = parse_email(email)
        .map_err(|err| VerifyError::invalid_email(err.reasons().to_vec()))?;
    let domain = address.domain.as_str();
    let posture = DnsPosture::resolve(resolver, domain)?;

    let hosts = if posture.has_mx() {
        posture.mx_hosts()
    } else if posture.has_address() {
        vec![domain.to_string()]
    } else {
        Vec::new()
    };
    let probe = (deep && !hosts.is_empty())
        .then(|| detect_catch_all(prober, &hosts, &address.local, domain));

    let (status, message) = if posture.has_mx() {
        (
            QuickStatus::Ok,
            format!("Domain {domain} has {} MX record(s).", posture.mx.len()),
        )
    } else if posture.has_address() {
        (
            QuickStatus::HasA,
            format!(
                "Domain {domain} has no MX records but has A/AAAA record(s). Many MTAs will still attempt delivery."
            ),
        )
    } else {
        (
            QuickStatus::NoMx,
            format!(
                "Domain {domain} has no MX records and no fallback A/AAAA records; it likely cannot receive email."
            ),
        )
    };

    let spf = (!posture.spf_records.is_empty()).then(|| posture.spf_records.join(" "));
    let dmarc = posture.dmarc.as_ref().map(|d| d.record.clone());

    Ok(QuickCheck {
        status,
        message,
        domain: domain.to_string(),
        mx: posture.mx,
        spf,
        dmarc,
        probe,
    })
}
