//! Builders for each check category, in report order.

use std::sync::LazyLock;

use regex::Regex;

use crate::dns::{DnsPosture, spf_qualifier, spf_syntax_plausible};
use crate::registry::DomainIntel;
use crate::smtp_verify::{CatchAllReport, CatchAllVerdict, ProbeCategory, SmtpProbeResult};
use crate::validator::MAX_EMAIL_LEN;

use super::{SubCheck, VerificationStep};

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex")
}

static BASIC_SHAPE: LazyLock<Regex> = LazyLock::new(|| re(r"^[^@]+@[^@]+\.[^@]+$"));
static GIBBERISH: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)[0-9]{4,}|[a-z]{10,}[0-9]{2,}"));
static DISPOSABLE_WORD: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\btemp\b|\bmailinator\b"));
static DISPOSABLE_SUBDOMAIN: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\.temp-mail\.|\.mailinator\."));
static DISPOSABLE_HINT: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)temp|throw|trash|10min"));
static WEBMAIL_MX: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)google|outlook|yah(oo)?"));
static GENERIC_ROLE: LazyLock<Regex> = LazyLock::new(|| re(r"^(info|sales|support|contact)$"));
static DEPARTMENT_ROLE: LazyLock<Regex> = LazyLock::new(|| re(r"^(hr|billing|admin)$"));
static TRAP_PATTERNS: LazyLock<[Regex; 3]> =
    LazyLock::new(|| [re(r"^trap@"), re(r"^spamtrap@"), re(r"^no-reply@")]);
static SUSPICIOUS_USERNAME: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)[a-z]{12,}\d{2,}"));
static PROFESSIONAL: LazyLock<Regex> = LazyLock::new(|| re(r"[a-z]+\.[a-z]+@"));

const LOCAL_SPECIALS: &[char] = &['.', '_', '+', '-'];

/// Outcome of the SMTP stage as the report sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Ok,
    Fail,
    /// Probe not attempted.
    Unknown,
}

/// "Syntax & Format". The flag means one of the hard format checks failed.
pub fn syntax(email: &str, domain_hint: &str, intel: &dyn DomainIntel) -> (VerificationStep, bool) {
    let local = email.split('@').next().unwrap_or_default();
    let gibberish = GIBBERISH.is_match(local);
    let typo = intel.typo_suggestion(domain_hint);

    let subs = vec![
        SubCheck::new("regex basic", BASIC_SHAPE.is_match(email)),
        SubCheck::new(
            "no illegal characters",
            !email.chars().any(|c| c.is_whitespace() || c == ',' || c == ';'),
        ),
        SubCheck::new("length <= 254", email.len() <= MAX_EMAIL_LEN),
        SubCheck::new("gibberish username", !gibberish)
            .with_info_if(gibberish, || "username looks random".to_string()),
        SubCheck::new("common typos", typo.is_none())
            .with_info_if(typo.is_some(), || format!("suggest {}", typo.as_deref().unwrap_or_default())),
    ];
    let format_failed = subs[..3].iter().any(|sub| !sub.pass);
    (VerificationStep::new("Syntax & Format", subs), format_failed)
}

pub fn username(local: &str) -> VerificationStep {
    let punctuation = local.chars().filter(|c| LOCAL_SPECIALS.contains(c)).count();
    let clean_edges = !local.starts_with(LOCAL_SPECIALS) && !local.ends_with(LOCAL_SPECIALS);
    VerificationStep::new(
        "Username validation",
        vec![
            SubCheck::new("length <= 64", local.len() <= 64),
            SubCheck::new("not excessive punctuation", punctuation < 4),
            SubCheck::new("alias usage allowed", true)
                .with_info_if(local.contains('+'), || "alias detected".to_string()),
            SubCheck::new("no leading/trailing special", clean_edges),
        ],
    )
}

/// "Domain existence"; the flag means the domain is parked.
pub fn domain_existence(
    domain: &str,
    posture: &DnsPosture,
    intel: &dyn DomainIntel,
) -> (VerificationStep, bool) {
    let parked = intel.is_parked(domain);
    let step = VerificationStep::new(
        "Domain existence",
        vec![
            SubCheck::new("A record", !posture.ipv4.is_empty()),
            SubCheck::new("AAAA record", !posture.ipv6.is_empty()),
            SubCheck::new("WHOIS registered (mock)", intel.whois_registered(domain)),
            SubCheck::new("not parked (mock list)", !parked),
        ],
    );
    (step, parked)
}

pub fn mx_records(posture: &DnsPosture) -> VerificationStep {
    let has_mx = posture.has_mx();
    let usable = has_mx && posture.mx.iter().all(|mx| !mx.exchange.is_empty());
    VerificationStep::new(
        "MX records",
        vec![
            SubCheck::new("has MX", has_mx)
                .with_info_if(has_mx, || posture.mx_hosts().join(", ")),
            SubCheck::new("valid mail servers", usable),
            SubCheck::new("priority redundancy", posture.mx.len() > 1),
            SubCheck::new("not missing", has_mx),
        ],
    )
}

pub fn spf(posture: &DnsPosture) -> VerificationStep {
    let record = posture.spf.as_deref();
    let qualifier = record.and_then(spf_qualifier);
    VerificationStep::new(
        "SPF",
        vec![
            SubCheck::new("has SPF TXT", record.is_some())
                .with_info_if(qualifier.is_some(), || {
                    qualifier.map(|q| q.to_string()).unwrap_or_default()
                }),
            SubCheck::new(
                "syntax looks valid",
                record.is_some_and(spf_syntax_plausible),
            ),
            SubCheck::new("not missing/malformed", record.is_some()),
        ],
    )
}

pub fn dmarc(posture: &DnsPosture) -> VerificationStep {
    let present = posture.dmarc.is_some();
    let policy = posture
        .dmarc
        .as_ref()
        .map(|d| d.policy_or_none())
        .unwrap_or("none");
    VerificationStep::new(
        "DMARC",
        vec![
            SubCheck::new("has DMARC TXT", present),
            SubCheck::new(format!("policy {policy}"), present),
            SubCheck::new("not missing", present),
        ],
    )
}

pub fn dkim(posture: &DnsPosture) -> VerificationStep {
    let found = posture.dkim.is_some();
    let selector = posture
        .dkim
        .as_ref()
        .map(|d| format!("selector {}", d.selector));
    let mut present = SubCheck::new("DKIM selector present (best-effort)", found);
    if let Some(selector) = selector {
        present = present.with_info(selector);
    }
    VerificationStep::new(
        "DKIM",
        vec![
            present,
            SubCheck::new("syntax plausible", found),
            SubCheck::new("not missing", found),
        ],
    )
}

/// "Disposable"; the flag means the domain is treated as throwaway.
pub fn disposable(domain: &str, intel: &dyn DomainIntel) -> (VerificationStep, bool) {
    let listed = intel.is_disposable(domain);
    let is_disposable = listed || DISPOSABLE_WORD.is_match(domain);
    let step = VerificationStep::new(
        "Disposable",
        vec![
            SubCheck::new("not disposable domain", !is_disposable),
            SubCheck::new("no short-lived MX (mock)", true),
            SubCheck::new(
                "not a disposable subdomain",
                !DISPOSABLE_SUBDOMAIN.is_match(domain),
            ),
            SubCheck::new("not in static list", !listed),
            SubCheck::new("no disposable patterns", !DISPOSABLE_HINT.is_match(domain)),
        ],
    );
    (step, is_disposable)
}

/// "Webmail"; the flag means a consumer mailbox provider.
pub fn webmail(
    domain: &str,
    posture: &DnsPosture,
    intel: &dyn DomainIntel,
) -> (VerificationStep, bool) {
    let provider_mx = posture
        .mx
        .iter()
        .any(|mx| WEBMAIL_MX.is_match(&mx.exchange));
    let is_webmail = intel.is_webmail(domain) || provider_mx;
    let step = VerificationStep::new(
        "Webmail",
        vec![
            SubCheck::new("known webmail", !is_webmail),
            SubCheck::new("flag caution for marketing", true),
            SubCheck::new("mx matches provider", !is_webmail || provider_mx),
        ],
    );
    (step, is_webmail)
}

/// "Role-based"; the flag means a shared/departmental mailbox.
pub fn role_based(local: &str, intel: &dyn DomainIntel) -> (VerificationStep, bool) {
    let lower = local.to_lowercase();
    let is_role = intel.is_role_account(&lower);
    let step = VerificationStep::new(
        "Role-based",
        vec![
            SubCheck::new("not role account", !is_role),
            SubCheck::new("generic username", !GENERIC_ROLE.is_match(&lower)),
            SubCheck::new("department pattern", !DEPARTMENT_ROLE.is_match(&lower)),
            SubCheck::new("length reasonable", local.chars().count() >= 3),
        ],
    );
    (step, is_role)
}

pub fn smtp_connectivity(
    connectivity: Connectivity,
    host: Option<&str>,
    timeout_ms: u64,
) -> VerificationStep {
    let ok = connectivity == Connectivity::Ok;
    let mut connected = SubCheck::new("connected to MX", ok);
    if let Some(host) = host {
        connected = connected.with_info(host);
    }
    VerificationStep::new(
        "SMTP connectivity",
        vec![
            connected,
            SubCheck::new("EHLO/HELO ok (assumed)", ok),
            SubCheck::new("secondary MX on fail", true),
            SubCheck::new("timeout under 5s", timeout_ms <= 5_000),
            SubCheck::new("not rejected at connect", connectivity != Connectivity::Fail),
        ],
    )
}

pub fn smtp_mailbox(
    connectivity: Connectivity,
    rcpt: &SmtpProbeResult,
    bulk: bool,
) -> VerificationStep {
    let ok = connectivity == Connectivity::Ok;
    let greylist_note = if bulk {
        "retry skipped in bulk mode"
    } else {
        "retry suggested if greylisted"
    };
    VerificationStep::new(
        "SMTP mailbox",
        vec![
            SubCheck::new("MAIL FROM sent", ok),
            SubCheck::new("RCPT TO sent", ok),
            SubCheck::new("2xx accept is valid", rcpt.category != ProbeCategory::Reject)
                .with_info_if(ok, || format!("{} {}", rcpt.category, rcpt.code)),
            SubCheck::new("450 greylist single retry (skipped in fast mode)", true)
                .with_info(greylist_note),
            SubCheck::new("ambiguity flagged", true),
        ],
    )
}

pub fn catch_all(report: &CatchAllReport) -> VerificationStep {
    VerificationStep::new(
        "Catch-all detection",
        vec![
            SubCheck::new("random RCPT tested", report.reached_host()),
            SubCheck::new(
                "random not accepted",
                report.control.category != ProbeCategory::Accept,
            ),
            SubCheck::new("consistency", true).with_info(report.verdict.as_str()),
            SubCheck::new("not catch-all", report.verdict != CatchAllVerdict::CatchAll),
        ],
    )
}

/// "Greylisting"; the flag means the RCPT answer was a 450.
pub fn greylisting(rcpt: &SmtpProbeResult) -> (VerificationStep, bool) {
    let grey = rcpt.code == 450;
    let step = VerificationStep::new(
        "Greylisting",
        vec![
            SubCheck::new("450 detected", true).with_info_if(grey, || "greylisted".to_string()),
            SubCheck::new("retry after 1 minute (deferred)", true),
            SubCheck::new("status unknown if persists", true),
        ],
    );
    (step, grey)
}

/// "Blacklist"; the flag means high risk.
pub fn blacklist(domain: &str, intel: &dyn DomainIntel) -> (VerificationStep, bool) {
    let listed = intel.is_blacklisted(domain);
    let reputation = intel.reputation(domain);
    let step = VerificationStep::new(
        "Blacklist",
        vec![
            SubCheck::new("domain not blacklisted (mock)", !listed),
            SubCheck::new("reputation score (mock)", reputation > 30)
                .with_info(format!("score={reputation}")),
            SubCheck::new("mx ip not blacklisted (mock)", true),
            SubCheck::new("not high risk", reputation > 20),
        ],
    );
    (step, listed || reputation <= 20)
}

/// "Spam trap"; the flag means the address looks like a trap.
pub fn spam_trap(address: &str, local: &str) -> (VerificationStep, bool) {
    let lower = address.to_lowercase();
    let trap_name = TRAP_PATTERNS.iter().any(|rx| rx.is_match(&lower));
    let suspicious = SUSPICIOUS_USERNAME.is_match(local);
    let step = VerificationStep::new(
        "Spam trap",
        vec![
            SubCheck::new("not in trap patterns", !trap_name),
            SubCheck::new("has public activity (mock)", true),
            SubCheck::new("domain not old/inactive (mock)", true),
            SubCheck::new("username not random", !suspicious),
        ],
    );
    (step, trap_name || suspicious)
}

pub fn activity(address: &str, intel: &dyn DomainIntel) -> VerificationStep {
    VerificationStep::new(
        "Activity",
        vec![
            SubCheck::new(
                "in known public list (mock)",
                intel.is_known_active(&address.to_lowercase()),
            ),
            SubCheck::new("not missing from public (mock)", true),
            SubCheck::new("professional pattern", PROFESSIONAL.is_match(address)),
            SubCheck::new("corp directory (mock)", true),
        ],
    )
}

pub fn bounce_prediction(
    has_mx: bool,
    rcpt: ProbeCategory,
    catch_all: bool,
    high_risk: bool,
    risk: u32,
) -> VerificationStep {
    VerificationStep::new(
        "Bounce prediction",
        vec![
            SubCheck::new("smtp-based risk", rcpt != ProbeCategory::Reject)
                .with_info(format!("risk={risk}")),
            SubCheck::new("mx-based risk", has_mx),
            SubCheck::new("catch-all penalty", !catch_all),
            SubCheck::new("blacklist penalty", !high_risk),
        ],
    )
}

pub fn confidence(score: u8) -> VerificationStep {
    VerificationStep::new(
        "Confidence score",
        vec![
            SubCheck::new("mx weighting", true),
            SubCheck::new("smtp weighting", true),
            SubCheck::new("risk adjustments", true),
            SubCheck::new("catch-all/greylist adjust", true),
            SubCheck::new("clamped 0-100", score <= 100).with_info(format!("score={score}")),
        ],
    )
}

pub fn aggregation(details: &str) -> VerificationStep {
    VerificationStep::new(
        "Result aggregation",
        vec![
            SubCheck::new("final status assigned", true),
            SubCheck::new("flags generated", true),
            SubCheck::new("detail explanation", !details.is_empty()),
            SubCheck::new("output formatted", true),
        ],
    )
}
