use std::sync::LazyLock;

use regex::Regex;

use super::ProbeCategory;

static HARD_REJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)user unknown|unknown user|no such user|mailbox unavailable|mailbox not found|invalid recipient|recipient address rejected|5\.1\.1|5\.1\.0",
    )
    .expect("static hard-reject regex")
});

static POLICY_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)spamhaus|blocklist|blacklist|blocked|policy|reputation|forbidden|denied|5\.7\.1")
        .expect("static policy regex")
});

/// Map the final `RCPT TO` reply onto a [`ProbeCategory`]. First match wins.
pub fn classify_rcpt(code: u16, message: &str) -> ProbeCategory {
    if (200..300).contains(&code) {
        return ProbeCategory::Accept;
    }
    if matches!(code, 421 | 450 | 451 | 452) {
        return ProbeCategory::Temp;
    }
    if HARD_REJECT.is_match(message) {
        return ProbeCategory::Reject;
    }
    // reputation blocks say nothing about the mailbox
    if is_policy_block(message) {
        return ProbeCategory::Temp;
    }
    if code == 530 || message.to_ascii_lowercase().contains("starttls") {
        return ProbeCategory::Temp;
    }
    if (500..600).contains(&code) {
        return ProbeCategory::Reject;
    }
    ProbeCategory::Temp
}

/// Reply text that points at a blocklist or local policy.
pub fn is_policy_block(message: &str) -> bool {
    POLICY_BLOCK.is_match(message)
}
