//! Fan-out of verifications over a fixed worker pool.
//!
//! Workers pull indices from one shared counter and write into the slot for
//! that index, so results always come back in input order.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::verify::{VerificationResult, VerifyOptions, verify_email};

/// Inputs beyond this are dropped.
pub const MAX_BULK_EMAILS: usize = 1000;
pub const BULK_WORKERS: usize = 20;

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport {
    pub count: usize,
    /// Same order and length as the (truncated) input.
    pub results: Vec<VerificationResult>,
}

/// Verify every address with the real engine, `bulk` mode forced on.
pub fn verify_bulk<S: AsRef<str> + Sync>(emails: &[S], options: &VerifyOptions) -> BulkReport {
    let options = options.clone().with_bulk(true);
    dispatch(emails, |email| verify_email(email, &options))
}

/// Run `verify` over `emails` on up to [`BULK_WORKERS`] threads.
///
/// An item whose verification errors or panics becomes a
/// [`VerificationResult::degraded`] entry; the rest of the batch is unaffected.
pub fn dispatch<S, F, E>(emails: &[S], verify: F) -> BulkReport
where
    S: AsRef<str> + Sync,
    F: Fn(&str) -> Result<VerificationResult, E> + Sync,
    E: fmt::Display,
{
    let emails = &emails[..emails.len().min(MAX_BULK_EMAILS)];
    let slots: Vec<OnceLock<VerificationResult>> =
        emails.iter().map(|_| OnceLock::new()).collect();
    let next = AtomicUsize::new(0);
    let workers = BULK_WORKERS.min(emails.len());
    debug!(items = emails.len(), workers, "bulk dispatch started");

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(email) = emails.get(index) else {
                        break;
                    };
                    let result = run_item(email.as_ref(), &verify);
                    // each index is handed out once
                    let _ = slots[index].set(result);
                }
            });
        }
    });

    let results: Vec<VerificationResult> = slots
        .into_iter()
        .zip(emails)
        .map(|(slot, email)| {
            slot.into_inner()
                .unwrap_or_else(|| VerificationResult::degraded(email.as_ref().trim(), "not processed"))
        })
        .collect();

    BulkReport {
        count: results.len(),
        results,
    }
}

fn run_item<F, E>(email: &str, verify: &F) -> VerificationResult
where
    F: Fn(&str) -> Result<VerificationResult, E>,
    E: fmt::Display,
{
    match panic::catch_unwind(AssertUnwindSafe(|| verify(email))) {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            warn!(%email, error = %err, "bulk item failed");
            VerificationResult::degraded(email.trim(), err.to_string())
        }
        Err(_) => {
            warn!(%email, "bulk item panicked");
            VerificationResult::degraded(email.trim(), "verification panicked")
        }
    }
}

/// Pull addresses out of CSV text.
///
/// With an `email` header cell, that column is read from the following rows;
/// otherwise the first cell of every row is taken. Empty cells are skipped.
#[cfg(feature = "with-csv")]
pub fn emails_from_csv(text: &str) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record);
    }

    let Some(header) = rows.first() else {
        return Ok(Vec::new());
    };
    let (column, body) = match header.iter().position(|cell| cell.eq_ignore_ascii_case("email")) {
        Some(column) => (column, &rows[1..]),
        None => (0, &rows[..]),
    };

    Ok(body
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::{Flag, VerificationStatus};

    fn fake_result(email: &str) -> VerificationResult {
        VerificationResult {
            email: email.to_string(),
            status: VerificationStatus::Valid,
            score: 70,
            flags: Default::default(),
            details: "SMTP confirmed mailbox".to_string(),
            steps: Vec::new(),
        }
    }

    #[test]
    fn failures_stay_in_their_slot() {
        let emails = ["a@example.com", "boom@example.com", "c@example.com"];
        let report = dispatch(&emails, |email| {
            if email.starts_with("boom") {
                Err("connection reset by peer".to_string())
            } else {
                Ok(fake_result(email))
            }
        });

        assert_eq!(report.count, 3);
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[0].email, "a@example.com");
        assert_eq!(report.results[2].email, "c@example.com");
        assert_eq!(report.results[0].status, VerificationStatus::Valid);

        let failed = &report.results[1];
        assert_eq!(failed.email, "boom@example.com");
        assert_eq!(failed.status, VerificationStatus::Unknown);
        assert_eq!(failed.score, 0);
        assert_eq!(failed.flags.iter().collect::<Vec<_>>(), vec![Flag::Error]);
        assert_eq!(failed.details, "connection reset by peer");
    }

    #[test]
    fn panics_are_contained() {
        let emails = vec!["ok@example.com".to_string(), "panic@example.com".to_string()];
        let report = dispatch(&emails, |email| {
            if email.starts_with("panic") {
                panic!("probe exploded");
            }
            Ok::<_, String>(fake_result(email))
        });
        assert_eq!(report.results[0].status, VerificationStatus::Valid);
        assert!(report.results[1].has_flag(Flag::Error));
        assert_eq!(report.results[1].details, "verification panicked");
    }

    #[test]
    fn order_is_preserved_across_workers() {
        let emails: Vec<String> = (0..250).map(|i| format!("user{i}@example.com")).collect();
        let report = dispatch(&emails, |email| Ok::<_, String>(fake_result(email)));
        assert_eq!(report.count, 250);
        for (input, result) in emails.iter().zip(&report.results) {
            assert_eq!(input, &result.email);
        }
    }

    #[test]
    fn input_is_truncated() {
        let emails: Vec<String> = (0..MAX_BULK_EMAILS + 5)
            .map(|i| format!("u{i}@example.com"))
            .collect();
        let report = dispatch(&emails, |email| Ok::<_, String>(fake_result(email)));
        assert_eq!(report.count, MAX_BULK_EMAILS);
        assert_eq!(report.results.last().map(|r| r.email.as_str()), Some("u999@example.com"));
    }

    #[test]
    fn empty_input() {
        let emails: Vec<String> = Vec::new();
        let report = dispatch(&emails, |email| Ok::<_, String>(fake_result(email)));
        assert_eq!(report.count, 0);
        assert!(report.results.is_empty());
    }

    #[cfg(feature = "with-csv")]
    #[test]
    fn csv_with_email_header() {
        let text = "name,Email\nJane, jane@example.com \n\nBob,\nAl,al@example.com\n";
        assert_eq!(
            emails_from_csv(text).unwrap(),
            vec!["jane@example.com", "al@example.com"]
        );
    }

    #[cfg(feature = "with-csv")]
    #[test]
    fn csv_without_header_takes_first_column() {
        let text = "jane@example.com,Jane\nbob@example.com\n";
        assert_eq!(
            emails_from_csv(text).unwrap(),
            vec!["jane@example.com", "bob@example.com"]
        );
    }
}
