use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static SPF_MECHANISMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\ball\b|\bincludes?\b|ip4:|ip6:").expect("static SPF regex")
});

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpfQualifier {
    Fail,
    SoftFail,
    Neutral,
    Pass,
}

impl fmt::Display for SpfQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "-all",
            Self::SoftFail => "~all",
            Self::Neutral => "?all",
            Self::Pass => "+all",
        })
    }
}

/// TXT records that look like SPF policies, in answer order.
pub(crate) fn spf_records(records: &[String]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.trim())
        .filter(|trimmed| starts_with_ignore_ascii_case(trimmed, "v=spf1"))
        .map(|trimmed| trimmed.to_string())
        .collect()
}

/// Loose plausibility check: the record names at least one mechanism.
pub fn syntax_plausible(record: &str) -> bool {
    SPF_MECHANISMS.is_match(record)
}

/// Qualifier of the terminal `all` mechanism, if present.
pub fn qualifier(record: &str) -> Option<SpfQualifier> {
    record
        .split_whitespace()
        .skip(1)
        .find_map(|token| qualifier_from_token(&token.to_ascii_lowercase()))
}

pub(crate) fn starts_with_ignore_ascii_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

fn qualifier_from_token(token: &str) -> Option<SpfQualifier> {
    match token {
        "-all" => Some(SpfQualifier::Fail),
        "~all" => Some(SpfQualifier::SoftFail),
        "?all" => Some(SpfQualifier::Neutral),
        "all" | "+all" => Some(SpfQualifier::Pass),
        _ => None,
    }
}
