use tracing::debug;

use super::resolver::{DnsLookup, fqdn};
use super::DkimFinding;

/// Selectors probed when the real one is unknown.
pub const DEFAULT_SELECTORS: &[&str] = &["default", "selector1", "google"];

/// Probe `<selector>._domainkey.<domain>` for each selector in order and
/// return the first one whose TXT mentions `v=DKIM1`.
pub(crate) fn probe_selectors<R>(
    resolver: &R,
    ascii_domain: &str,
    selectors: &[&str],
) -> Option<DkimFinding>
where
    R: DnsLookup + ?Sized,
{
    for selector in selectors {
        let name = fqdn(&format!("{selector}._domainkey"), ascii_domain);
        let records = match resolver.lookup_txt(&name) {
            Ok(records) => records,
            Err(err) => {
                debug!(%name, error = %err, "DKIM selector lookup degraded to absent");
                continue;
            }
        };
        let joined = records.concat();
        if joined.to_ascii_lowercase().contains("v=dkim1") {
            return Some(DkimFinding {
                selector: selector.to_string(),
                record: joined,
            });
        }
    }
    None
}
