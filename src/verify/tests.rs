use std::io;
use std::sync::Mutex;

use super::*;
use crate::dns::tests::StubResolver;
use crate::smtp_verify::SmtpVerifyError;

#[derive(Clone, Copy)]
enum Outcome {
    Reply(ProbeCategory, u16, &'static str),
    Refused,
}

/// Answers the real recipient with `target` and the synthetic one with `control`.
struct CannedProber {
    target: Outcome,
    control: Outcome,
    calls: Mutex<Vec<String>>,
}

impl CannedProber {
    fn new(target: Outcome, control: Outcome) -> Self {
        Self {
            target,
            control,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn accept_only_target() -> Self {
        Self::new(accept(), reject())
    }

    fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl RcptProbe for CannedProber {
    fn probe(&self, host: &str, recipient: &str) -> Result<SmtpProbeResult, SmtpVerifyError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(recipient.to_string());
        }
        let outcome = if recipient.starts_with("verify-") {
            self.control
        } else {
            self.target
        };
        match outcome {
            Outcome::Reply(category, code, message) => {
                Ok(SmtpProbeResult::new(category, code, message))
            }
            Outcome::Refused => Err(SmtpVerifyError::connect(
                host,
                io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
            )),
        }
    }
}

fn accept() -> Outcome {
    Outcome::Reply(ProbeCategory::Accept, 250, "250 2.1.5 Ok")
}

fn reject() -> Outcome {
    Outcome::Reply(ProbeCategory::Reject, 550, "550 5.1.1 user unknown")
}

fn healthy_dns(domain: &str) -> StubResolver {
    let mx = format!("mx1.{domain}");
    StubResolver::new()
        .with_mx(domain, &[(10, mx.as_str())])
        .with_a(domain, &["192.0.2.1"])
        .with_txt(domain, &["v=spf1 ip4:192.0.2.0/24 -all"])
        .with_txt(&format!("_dmarc.{domain}"), &["v=DMARC1; p=reject"])
}

fn verify_with(resolver: StubResolver, prober: CannedProber, email: &str) -> VerificationResult {
    Verifier::new(resolver, prober, StaticLists).verify(email, &VerifyOptions::default())
}

fn step_names(result: &VerificationResult) -> Vec<&str> {
    result.steps.iter().map(|s| s.name.as_str()).collect()
}

#[test]
fn confirmed_mailbox_is_valid() {
    let result = verify_with(
        healthy_dns("example.net"),
        CannedProber::accept_only_target(),
        "jane.doe@example.net",
    );
    assert_eq!(result.status, VerificationStatus::Valid);
    assert_eq!(result.score, 70);
    assert!(result.flags.is_empty(), "{:?}", result.flags);
    assert_eq!(result.details, "SMTP confirmed mailbox");
    assert_eq!(
        step_names(&result),
        vec![
            "Syntax & Format",
            "Username validation",
            "Domain existence",
            "MX records",
            "SPF",
            "DMARC",
            "DKIM",
            "Disposable",
            "Webmail",
            "Role-based",
            "SMTP connectivity",
            "SMTP mailbox",
            "Catch-all detection",
            "Greylisting",
            "Blacklist",
            "Spam trap",
            "Activity",
            "Bounce prediction",
            "Confidence score",
            "Result aggregation",
        ]
    );
    let connectivity = result.step("SMTP connectivity").unwrap();
    assert_eq!(
        connectivity.sub("connected to MX").and_then(|s| s.info.as_deref()),
        Some("mx1.example.net")
    );
}

#[test]
fn low_reputation_domain_is_high_risk() {
    // reputation("example.com") == 12
    let result = verify_with(
        healthy_dns("example.com"),
        CannedProber::accept_only_target(),
        "jane.doe@example.com",
    );
    assert_eq!(result.status, VerificationStatus::Valid);
    assert_eq!(result.score, 70);
    assert_eq!(result.flags.iter().collect::<Vec<_>>(), vec![Flag::HighRisk]);
    let blacklist = result.step("Blacklist").unwrap();
    assert_eq!(
        blacklist.sub("reputation score (mock)").and_then(|s| s.info.as_deref()),
        Some("score=12")
    );
    assert!(!blacklist.sub("not high risk").unwrap().pass);
    let bounce = result.step("Bounce prediction").unwrap();
    assert_eq!(
        bounce.sub("smtp-based risk").and_then(|s| s.info.as_deref()),
        Some("risk=20")
    );
}

#[test]
fn malformed_input_short_circuits() {
    for bad in ["not-an-email", "a@@example.com", "jane@example", "a b@example.com"] {
        let prober = CannedProber::accept_only_target();
        let result = Verifier::new(StubResolver::new(), prober, StaticLists)
            .verify(bad, &VerifyOptions::default());
        assert_eq!(result.status, VerificationStatus::Invalid, "{bad}");
        assert_eq!(result.score, 0);
        assert!(result.has_flag(Flag::InvalidFormat));
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.details, "Invalid format");
    }
}

#[test]
fn spam_trap_address_is_flagged() {
    let result = verify_with(
        healthy_dns("example.com"),
        CannedProber::accept_only_target(),
        "trap@example.com",
    );
    assert!(result.has_flag(Flag::SpamTrapRisk));
    let step = result.step("Spam trap").unwrap();
    assert!(!step.sub("not in trap patterns").unwrap().pass);
}

#[test]
fn disposable_domain_wins_over_smtp() {
    let result = verify_with(
        healthy_dns("mailinator.com"),
        CannedProber::accept_only_target(),
        "someone@mailinator.com",
    );
    assert_eq!(result.status, VerificationStatus::Disposable);
    assert!(result.has_flag(Flag::Disposable));
    assert_eq!(result.details, "Disposable domain");
}

#[test]
fn catch_all_beats_accepted_target() {
    let result = verify_with(
        healthy_dns("example.com"),
        CannedProber::new(accept(), accept()),
        "jane.doe@example.com",
    );
    assert_eq!(result.status, VerificationStatus::CatchAll);
    assert!(result.has_flag(Flag::CatchAll));
    // 30 + 40 - 10
    assert_eq!(result.score, 60);
    assert_eq!(result.details, "Server accepts all recipients");
}

#[test]
fn shallow_mode_skips_probes() {
    let prober = CannedProber::accept_only_target();
    let verifier = Verifier::new(healthy_dns("gmail.com"), prober, StaticLists);
    let options = VerifyOptions::default().with_deep(false);
    let result = verifier.verify("user@gmail.com", &options);

    assert_eq!(verifier.prober.call_count(), 0);
    assert!(result.step("Catch-all detection").is_none());
    assert_eq!(result.steps.len(), 19);
    assert_eq!(result.status, VerificationStatus::Unknown);
    assert!(result.has_flag(Flag::Webmail));
    let activity = result.step("Activity").unwrap();
    assert!(activity.sub("in known public list (mock)").unwrap().pass);
    let smtp = result.step("SMTP connectivity").unwrap();
    assert!(!smtp.sub("connected to MX").unwrap().pass);
    assert!(smtp.sub("not rejected at connect").unwrap().pass);
}

#[test]
fn domain_without_mail_route_is_invalid() {
    let prober = CannedProber::accept_only_target();
    let verifier = Verifier::new(StubResolver::new(), prober, StaticLists);
    let result = verifier.verify("jane@nomx.example", &VerifyOptions::default());
    assert_eq!(result.status, VerificationStatus::Invalid);
    assert_eq!(result.score, 0);
    assert_eq!(result.details, "No MX records");
    assert_eq!(verifier.prober.call_count(), 0);
    let bounce = result.step("Bounce prediction").unwrap();
    assert_eq!(
        bounce.sub("smtp-based risk").and_then(|s| s.info.as_deref()),
        Some("risk=60")
    );
}

#[test]
fn address_records_without_mx_stay_unknown() {
    let resolver = StubResolver::new().with_a("a-only.example", &["192.0.2.7"]);
    let prober = CannedProber::accept_only_target();
    let verifier = Verifier::new(resolver, prober, StaticLists);
    let result = verifier.verify("jane@a-only.example", &VerifyOptions::default());
    assert_eq!(result.status, VerificationStatus::Unknown);
    assert_eq!(verifier.prober.call_count(), 0);
    assert!(result.step("Catch-all detection").is_none());
}

#[test]
fn rejected_mailbox_is_invalid() {
    let result = verify_with(
        healthy_dns("example.com"),
        CannedProber::new(reject(), reject()),
        "ghost@example.com",
    );
    assert_eq!(result.status, VerificationStatus::Invalid);
    assert_eq!(result.details, "SMTP 550 550 5.1.1 user unknown");
    // 30 + 0
    assert_eq!(result.score, 30);
}

#[test]
fn policy_block_is_not_a_rejection() {
    let blocked = Outcome::Reply(
        ProbeCategory::Temp,
        554,
        "554 5.7.1 Client host blocked using Spamhaus",
    );
    let result = verify_with(
        healthy_dns("example.com"),
        CannedProber::new(blocked, blocked),
        "jane.doe@example.com",
    );
    assert_eq!(result.status, VerificationStatus::Unknown);
    assert!(result.has_flag(Flag::PolicyBlock));
    assert_eq!(
        result.details,
        "SMTP 554 554 5.7.1 Client host blocked using Spamhaus"
    );
}

#[test]
fn greylisted_target() {
    let grey = Outcome::Reply(ProbeCategory::Temp, 450, "450 4.2.0 Greylisted, try later");
    let result = verify_with(
        healthy_dns("example.com"),
        CannedProber::new(grey, grey),
        "jane.doe@example.com",
    );
    assert!(result.has_flag(Flag::Greylist));
    assert_eq!(result.status, VerificationStatus::Unknown);
    assert_eq!(result.details, "Ambiguous or timed out");
    // 30 + 20 - 5
    assert_eq!(result.score, 45);
}

#[test]
fn unreachable_hosts_report_connect_failure() {
    let resolver = StubResolver::new()
        .with_mx("example.com", &[(10, "mx1.example.com"), (20, "mx2.example.com")])
        .with_txt("example.com", &["v=spf1 -all"]);
    let prober = CannedProber::new(Outcome::Refused, Outcome::Refused);
    let verifier = Verifier::new(resolver, prober, StaticLists);
    let result = verifier.verify("jane.doe@example.com", &VerifyOptions::default());

    assert_eq!(verifier.prober.call_count(), 2);
    assert_eq!(result.status, VerificationStatus::Unknown);
    let smtp = result.step("SMTP connectivity").unwrap();
    assert!(!smtp.sub("not rejected at connect").unwrap().pass);
    let catch_all = result.step("Catch-all detection").unwrap();
    assert!(!catch_all.sub("random RCPT tested").unwrap().pass);
}

#[test]
fn role_account_and_bulk_note() {
    let verifier = Verifier::new(
        healthy_dns("example.com"),
        CannedProber::accept_only_target(),
        StaticLists,
    );
    let options = VerifyOptions::default().with_bulk(true);
    let result = verifier.verify("support@example.com", &options);
    assert!(result.has_flag(Flag::RoleBased));
    assert_eq!(result.status, VerificationStatus::Valid);
    assert_eq!(result.score, 60);
    let mailbox = result.step("SMTP mailbox").unwrap();
    assert!(mailbox
        .subs
        .iter()
        .any(|s| s.info.as_deref() == Some("retry skipped in bulk mode")));
}

#[test]
fn verification_is_repeatable() {
    let verifier = Verifier::new(
        healthy_dns("example.org"),
        CannedProber::new(accept(), accept()),
        StaticLists,
    );
    let options = VerifyOptions::default();
    let first = verifier.verify("jane.doe@example.org", &options);
    let second = verifier.verify("jane.doe@example.org", &options);
    assert_eq!(first.status, second.status);
    assert_eq!(first.flags, second.flags);
    assert_eq!(first.score, second.score);
}

#[test]
fn quick_check_reports_route_and_records() {
    let resolver = healthy_dns("example.com")
        .with_txt("example.com", &["v=spf1 include:a.example -all", "v=spf1 ip4:192.0.2.1 ~all"]);
    let prober = CannedProber::accept_only_target();
    let quick = quick_check_with(&resolver, &prober, "jane@example.com", true).expect("quick");
    assert_eq!(quick.status, QuickStatus::Ok);
    assert!(quick.ok());
    assert_eq!(
        quick.spf.as_deref(),
        Some("v=spf1 include:a.example -all v=spf1 ip4:192.0.2.1 ~all")
    );
    assert_eq!(quick.dmarc.as_deref(), Some("v=DMARC1; p=reject"));
    let probe = quick.probe.expect("deep probe");
    assert_eq!(probe.verdict, CatchAllVerdict::Exists);
    insta::assert_snapshot!(quick.message, @"Domain example.com has 1 MX record(s).");
}

#[test]
fn quick_check_falls_back_to_address_records() {
    let resolver = StubResolver::new().with_aaaa("v6.example", &["2001:db8::1"]);
    let prober = CannedProber::accept_only_target();
    let quick = quick_check_with(&resolver, &prober, "jane@v6.example", true).expect("quick");
    assert_eq!(quick.status, QuickStatus::HasA);
    assert_eq!(quick.probe.and_then(|p| p.host).as_deref(), Some("v6.example"));
    assert_eq!(prober.call_count(), 2);

    let quick = quick_check_with(&StubResolver::new(), &prober, "jane@none.example", true).unwrap();
    assert_eq!(quick.status, QuickStatus::NoMx);
    assert!(!quick.ok());
    assert!(quick.probe.is_none());
}

#[test]
fn quick_check_rejects_malformed_input() {
    let prober = CannedProber::accept_only_target();
    let err = quick_check_with(&StubResolver::new(), &prober, "nope", false).unwrap_err();
    assert!(matches!(err, VerifyError::InvalidEmail { .. }));
}
