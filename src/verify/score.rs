use crate::smtp_verify::ProbeCategory;

use super::VerificationStatus;

/// Observations the score, the status and the bounce risk are derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub has_mx: bool,
    /// A or AAAA records exist.
    pub has_address: bool,
    pub smtp: ProbeCategory,
    pub disposable: bool,
    pub role_based: bool,
    pub catch_all: bool,
    pub greylist: bool,
    pub high_risk: bool,
    pub has_spf: bool,
    pub has_dmarc: bool,
}

/// Weighted score, clamped to `0..=100`.
pub fn compute_score(signals: &Signals) -> u8 {
    let mut score: i32 = 0;
    if signals.has_mx {
        score += 30;
    }
    score += match signals.smtp {
        ProbeCategory::Accept => 40,
        ProbeCategory::Temp => 20,
        ProbeCategory::Reject | ProbeCategory::Unknown => 0,
    };
    let penalties = [
        (signals.disposable, 20),
        (signals.role_based, 10),
        (signals.catch_all, 10),
        (signals.greylist, 5),
        (!signals.has_spf, 5),
        (!signals.has_dmarc, 5),
    ];
    for (applies, penalty) in penalties {
        if applies {
            score -= penalty;
        }
    }
    score.clamp(0, 100) as u8
}

/// Final status; rules are evaluated top-down and the first match wins.
pub fn resolve_status(signals: &Signals) -> VerificationStatus {
    if signals.disposable {
        VerificationStatus::Disposable
    } else if (!signals.has_mx && !signals.has_address) || signals.smtp == ProbeCategory::Reject {
        VerificationStatus::Invalid
    } else if signals.catch_all {
        VerificationStatus::CatchAll
    } else if signals.smtp == ProbeCategory::Accept {
        VerificationStatus::Valid
    } else {
        VerificationStatus::Unknown
    }
}

/// Additive bounce risk.
pub fn bounce_risk(signals: &Signals) -> u32 {
    let mut risk = 0;
    if !signals.has_mx {
        risk += 60;
    }
    if signals.smtp == ProbeCategory::Reject {
        risk += 80;
    }
    if signals.catch_all {
        risk += 20;
    }
    if signals.high_risk {
        risk += 20;
    }
    risk
}
