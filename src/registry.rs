//! Static reference lists and mock reputation data.
//!
//! The orchestrator only sees the [`DomainIntel`] trait, so real data sources
//! can replace [`StaticLists`] without touching the checks.

use phf::{phf_map, phf_set};
use sha1::{Digest, Sha1};

const ROLE_ACCOUNTS: phf::Set<&'static str> = phf_set! {
    "admin", "administrator", "postmaster", "webmaster", "hostmaster", "root",
    "support", "info", "sales", "help", "billing", "abuse", "noc", "contact",
    "security", "hr", "careers",
};

const DISPOSABLE_DOMAINS: phf::Set<&'static str> = phf_set! {
    "mailinator.com", "guerrillamail.com", "10minutemail.com", "tempmail.dev",
    "temp-mail.org", "yopmail.com", "trashmail.com", "getnada.com",
    "sharklasers.com", "dispostable.com",
};

const WEBMAIL_DOMAINS: phf::Set<&'static str> = phf_set! {
    "gmail.com", "yahoo.com", "outlook.com", "hotmail.com", "live.com", "aol.com",
    "icloud.com", "mail.com", "proton.me", "protonmail.com", "zoho.com",
};

const PARKED_DOMAINS: phf::Set<&'static str> = phf_set! {
    "parked-example.com",
};

const BLACKLIST_DOMAINS: phf::Set<&'static str> = phf_set! {
    "spamhaus-test.org", "barracuda-test.com",
};

const KNOWN_ACTIVE: phf::Set<&'static str> = phf_set! {
    "user@gmail.com", "info@company.com",
};

// misspelling -> intended provider
const COMMON_TYPOS: phf::Map<&'static str, &'static str> = phf_map! {
    "gmai.com" => "gmail.com",
    "gmial.com" => "gmail.com",
    "hotnail.com" => "hotmail.com",
};

/// Source of list-based knowledge about addresses and domains.
///
/// Inputs are expected lower-cased.
pub trait DomainIntel {
    fn is_role_account(&self, local: &str) -> bool;
    fn is_disposable(&self, domain: &str) -> bool;
    fn is_webmail(&self, domain: &str) -> bool;
    fn is_parked(&self, domain: &str) -> bool;
    fn is_blacklisted(&self, domain: &str) -> bool;
    fn is_known_active(&self, address: &str) -> bool;
    fn typo_suggestion(&self, domain: &str) -> Option<String>;

    /// Mock WHOIS lookup.
    fn whois_registered(&self, domain: &str) -> bool {
        domain.len() > 2
    }

    /// Pseudo-reputation in `0..100`; see [`reputation_score`].
    fn reputation(&self, domain: &str) -> u8 {
        reputation_score(domain)
    }
}

/// Built-in lists compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLists;

impl DomainIntel for StaticLists {
    fn is_role_account(&self, local: &str) -> bool {
        ROLE_ACCOUNTS.contains(local)
    }

    fn is_disposable(&self, domain: &str) -> bool {
        DISPOSABLE_DOMAINS.contains(domain)
    }

    fn is_webmail(&self, domain: &str) -> bool {
        WEBMAIL_DOMAINS.contains(domain)
    }

    fn is_parked(&self, domain: &str) -> bool {
        PARKED_DOMAINS.contains(domain)
    }

    fn is_blacklisted(&self, domain: &str) -> bool {
        BLACKLIST_DOMAINS.contains(domain)
    }

    fn is_known_active(&self, address: &str) -> bool {
        KNOWN_ACTIVE.contains(address)
    }

    fn typo_suggestion(&self, domain: &str) -> Option<String> {
        COMMON_TYPOS.get(domain).map(|s| s.to_string())
    }
}

/// Deterministic mock reputation: first SHA-1 byte of the domain, mod 100.
pub fn reputation_score(domain: &str) -> u8 {
    Sha1::digest(domain.as_bytes())[0] % 100
}
