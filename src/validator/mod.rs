//! Practical e-mail syntax checks (not full RFC 5322).
//!
//! [`validate_email`] collects every reason an address is rejected;
//! [`parse_email`] turns a clean report into an [`EmailAddress`].

mod domain;
mod local;
mod types;

pub use types::{EmailAddress, EmailError, ValidationReport};

use domain::check_domain;
use local::check_local;

pub const MAX_EMAIL_LEN: usize = 254;

pub fn validate_email(email: &str) -> ValidationReport {
    let input = email.trim();

    let mut reasons = Vec::new();

    if input.len() > MAX_EMAIL_LEN {
        reasons.push(format!("total length {} > {MAX_EMAIL_LEN}", input.len()));
    }

    if input
        .chars()
        .any(|c| c.is_whitespace() || c == ',' || c == ';')
    {
        reasons.push("contains whitespace, ',' or ';'".to_string());
    }

    let parts: Vec<&str> = input.split('@').collect();
    if parts.len() != 2 {
        reasons.push("must contain exactly one '@'".to_string());
        return ValidationReport { ok: false, reasons };
    }
    let (local, domain) = (parts[0], parts[1]);

    check_local(local, &mut reasons);
    check_domain(domain, &mut reasons);

    ValidationReport {
        ok: reasons.is_empty(),
        reasons,
    }
}

/// Valide et renvoie l'adresse structurée (domaine en minuscules).
pub fn parse_email(email: &str) -> Result<EmailAddress, EmailError> {
    let report = validate_email(email);
    if !report.ok {
        return Err(EmailError::InvalidFormat {
            reasons: report.reasons,
        });
    }

    let input = email.trim();
    let (local, domain) = input
        .split_once('@')
        .ok_or_else(|| EmailError::InvalidFormat {
            reasons: vec!["must contain exactly one '@'".to_string()],
        })?;

    Ok(EmailAddress {
        local: local.to_string(),
        domain: domain.to_ascii_lowercase(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_basic() {
        let r = validate_email("alice@example.com");
        assert!(r.ok, "{:?}", r.reasons);
    }

    #[test]
    fn rejects_double_at() {
        let r = validate_email("a@@b.com");
        assert!(!r.ok);
        assert!(parse_email("a@b@c.com").is_err());
    }

    #[test]
    fn parse_trims_and_lowercases_domain() {
        let parsed = parse_email("  Alice.Smith@Example.COM ").unwrap();
        assert_eq!(parsed.local, "Alice.Smith");
        assert_eq!(parsed.domain, "example.com");
        assert_eq!(parsed.to_string(), "Alice.Smith@example.com");
    }

    #[test]
    fn rejects_missing_parts() {
        assert!(parse_email("@example.com").is_err());
        assert!(parse_email("alice@").is_err());
        assert!(parse_email("alice").is_err());
    }

    #[test]
    fn rejects_separators() {
        for bad in ["a b@example.com", "a,b@example.com", "a;b@example.com"] {
            let err = parse_email(bad).expect_err(bad);
            assert!(
                err.reasons().iter().any(|r| r.contains("whitespace")),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn rejects_too_long() {
        let local = "a".repeat(250);
        let r = validate_email(&format!("{local}@example.com"));
        assert!(!r.ok);
        assert!(r.reasons.iter().any(|r| r.contains("> 254")));
    }

    #[test]
    fn rejects_dot_placement() {
        assert!(parse_email(".alice@example.com").is_err());
        assert!(parse_email("alice.@example.com").is_err());
        assert!(parse_email("al..ice@example.com").is_err());
        assert!(parse_email("alice@.example.com").is_err());
        assert!(parse_email("alice@example.com.").is_err());
        assert!(parse_email("alice@-example.com").is_err());
    }

    proptest! {
        #[test]
        fn simple_addresses_parse(
            local in "[a-z0-9][a-z0-9_+-]{0,20}",
            label in "[a-zA-Z0-9]{1,20}",
            tld in "[a-z]{2,6}",
        ) {
            let input = format!("{local}@{label}.{tld}");
            let parsed = parse_email(&input).unwrap();
            prop_assert_eq!(parsed.local, local);
            prop_assert_eq!(parsed.domain, format!("{}.{}", label.to_ascii_lowercase(), tld));
        }

        #[test]
        fn addresses_without_at_never_parse(input in "[^@]{0,80}") {
            prop_assert!(parse_email(&input).is_err());
        }
    }
}
