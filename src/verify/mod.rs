//! Verification orchestrator.
//!
//! [`Verifier::verify`] runs the syntax, DNS, list and SMTP checks in a fixed
//! order, records each as a [`VerificationStep`], and folds the observations
//! into a flag set, a score and a final [`VerificationStatus`].
//! A parse failure stops after the first step.

mod error;
mod options;
mod quick;
mod score;
mod steps;
mod types;

pub use error::VerifyError;
pub use options::{
    DEFAULT_VERIFY_TIMEOUT_MS, MAX_VERIFY_TIMEOUT_MS, MIN_VERIFY_TIMEOUT_MS, VerifyOptions,
};
pub use quick::{QuickCheck, QuickStatus, quick_check, quick_check_with};
pub use score::{Signals, bounce_risk, compute_score, resolve_status};
pub use steps::Connectivity;
pub use types::{Flag, FlagSet, SubCheck, VerificationResult, VerificationStatus, VerificationStep};

use tracing::{debug, info};

use crate::dns::{DnsLookup, DnsPosture, system_resolver};
use crate::registry::{DomainIntel, StaticLists};
use crate::smtp_verify::{
    CatchAllVerdict, ProbeCategory, RcptProbe, SmtpProbeResult, TcpProber, detect_catch_all,
    is_policy_block,
};
use crate::validator::parse_email;

/// Verification engine over pluggable DNS, SMTP and list collaborators.
pub struct Verifier<R, P, G = StaticLists> {
    resolver: R,
    prober: P,
    intel: G,
}

impl<R, P, G> Verifier<R, P, G>
where
    R: DnsLookup + Sync,
    P: RcptProbe,
    G: DomainIntel,
{
    pub fn new(resolver: R, prober: P, intel: G) -> Self {
        Self {
            resolver,
            prober,
            intel,
        }
    }

    /// Verify one address. Malformed or unreachable input yields a degraded
    /// result, never an error.
    pub fn verify(&self, email: &str, options: &VerifyOptions) -> VerificationResult {
        let result = self.run(email.trim(), options);
        info!(
            email = %result.email,
            status = %result.status,
            score = result.score,
            "verification finished"
        );
        result
    }

    fn run(&self, email: &str, options: &VerifyOptions) -> VerificationResult {
        let mut steps = Vec::with_capacity(20);
        let mut flags = FlagSet::new();

        let parsed = parse_email(email);
        let domain_hint = match &parsed {
            Ok(address) => address.domain.clone(),
            Err(_) => email
                .split_once('@')
                .map(|(_, domain)| domain.to_ascii_lowercase())
                .unwrap_or_default(),
        };
        let (step, format_failed) = steps::syntax(email, &domain_hint, &self.intel);
        steps.push(step);
        flags.insert_if(format_failed, Flag::InvalidFormat);

        let address = match parsed {
            Ok(address) => address,
            Err(err) => {
                debug!(%email, error = %err, "rejected by parser");
                flags.insert(Flag::InvalidFormat);
                return VerificationResult {
                    email: email.to_string(),
                    status: VerificationStatus::Invalid,
                    score: 0,
                    flags,
                    details: "Invalid format".to_string(),
                    steps,
                };
            }
        };
        let local = address.local.as_str();
        let domain = address.domain.as_str();
        let full = address.address();

        steps.push(steps::username(local));

        let posture = DnsPosture::resolve(&self.resolver, domain).unwrap_or_else(|err| {
            debug!(%domain, error = %err, "domain unusable for DNS, treating as absent");
            DnsPosture::empty(domain)
        });

        let (step, parked) = steps::domain_existence(domain, &posture, &self.intel);
        steps.push(step);
        flags.insert_if(parked, Flag::Parked);

        steps.push(steps::mx_records(&posture));
        steps.push(steps::spf(&posture));
        steps.push(steps::dmarc(&posture));
        steps.push(steps::dkim(&posture));

        let (step, disposable) = steps::disposable(domain, &self.intel);
        steps.push(step);
        flags.insert_if(disposable, Flag::Disposable);

        let (step, webmail) = steps::webmail(domain, &posture, &self.intel);
        steps.push(step);
        flags.insert_if(webmail, Flag::Webmail);

        let (step, role_based) = steps::role_based(local, &self.intel);
        steps.push(step);
        flags.insert_if(role_based, Flag::RoleBased);

        // no MX, no probe, even when A/AAAA exist
        let report = (options.deep && posture.has_mx())
            .then(|| detect_catch_all(&self.prober, &posture.mx_hosts(), local, domain));
        let (connectivity, rcpt) = match &report {
            Some(report) if report.reached_host() => (Connectivity::Ok, report.target.clone()),
            Some(report) => (Connectivity::Fail, report.target.clone()),
            None => (Connectivity::Unknown, SmtpProbeResult::unknown("")),
        };
        let policy_block = is_policy_block(&rcpt.message);
        flags.insert_if(policy_block, Flag::PolicyBlock);

        let host = report.as_ref().and_then(|r| r.host.as_deref());
        steps.push(steps::smtp_connectivity(
            connectivity,
            host,
            options.effective_timeout_ms(),
        ));
        steps.push(steps::smtp_mailbox(connectivity, &rcpt, options.bulk));

        let mut catch_all = false;
        if let Some(report) = &report {
            steps.push(steps::catch_all(report));
            catch_all = report.verdict == CatchAllVerdict::CatchAll;
            flags.insert_if(catch_all, Flag::CatchAll);
        }

        let (step, greylist) = steps::greylisting(&rcpt);
        steps.push(step);
        flags.insert_if(greylist, Flag::Greylist);

        let (step, high_risk) = steps::blacklist(domain, &self.intel);
        steps.push(step);
        flags.insert_if(high_risk, Flag::HighRisk);

        let (step, trap) = steps::spam_trap(&full, local);
        steps.push(step);
        flags.insert_if(trap, Flag::SpamTrapRisk);

        steps.push(steps::activity(&full, &self.intel));

        let signals = Signals {
            has_mx: posture.has_mx(),
            has_address: posture.has_address(),
            smtp: rcpt.category,
            disposable,
            role_based,
            catch_all,
            greylist,
            high_risk,
            has_spf: posture.spf.is_some(),
            has_dmarc: posture.dmarc.is_some(),
        };

        steps.push(steps::bounce_prediction(
            signals.has_mx,
            signals.smtp,
            catch_all,
            high_risk,
            bounce_risk(&signals),
        ));

        let score = compute_score(&signals);
        steps.push(steps::confidence(score));

        let status = resolve_status(&signals);
        let details = describe(status, &signals, &rcpt, policy_block);
        steps.push(steps::aggregation(&details));

        VerificationResult {
            email: email.to_string(),
            status,
            score,
            flags,
            details,
            steps,
        }
    }
}

/// Verify `email` with the system resolver, real SMTP probes and the
/// built-in lists.
pub fn verify_email(email: &str, options: &VerifyOptions) -> Result<VerificationResult, VerifyError> {
    let resolver = system_resolver()?;
    let verifier = Verifier::new(resolver, TcpProber::new(options.probe_options()), StaticLists);
    Ok(verifier.verify(email, options))
}

fn describe(
    status: VerificationStatus,
    signals: &Signals,
    rcpt: &SmtpProbeResult,
    policy_block: bool,
) -> String {
    let smtp_line = || format!("SMTP {} {}", rcpt.code, rcpt.message);
    match status {
        VerificationStatus::Disposable => "Disposable domain".to_string(),
        VerificationStatus::Invalid if rcpt.category == ProbeCategory::Reject => smtp_line(),
        VerificationStatus::Invalid => "No MX records".to_string(),
        VerificationStatus::CatchAll => "Server accepts all recipients".to_string(),
        VerificationStatus::Valid => "SMTP confirmed mailbox".to_string(),
        VerificationStatus::Unknown if policy_block && !rcpt.message.is_empty() => smtp_line(),
        VerificationStatus::Unknown if !signals.has_mx => "No MX records".to_string(),
        VerificationStatus::Unknown => "Ambiguous or timed out".to_string(),
    }
}

#[cfg(test)]
mod tests;
