use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use tracing::debug;

use super::probe::RcptProbe;
use super::types::{CatchAllReport, CatchAllVerdict, ProbeCategory, SmtpProbeResult};

/// Hosts tried before giving up, in ascending MX preference.
pub const MAX_CATCH_ALL_HOSTS: usize = 3;

const LOCAL_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Probe `local@domain` and a random sibling address on the same host.
///
/// Hosts are tried in order; a host is skipped only when one of its probes
/// fails at the connection level.
pub fn detect_catch_all<P>(prober: &P, hosts: &[String], local: &str, domain: &str) -> CatchAllReport
where
    P: RcptProbe + ?Sized,
{
    let target_address = format!("{local}@{domain}");
    let mut last_error = String::from("no mail hosts");

    for host in hosts.iter().take(MAX_CATCH_ALL_HOSTS) {
        let target = match prober.probe(host, &target_address) {
            Ok(result) => result,
            Err(err) => {
                debug!(%host, error = %err, "target probe failed, trying next host");
                last_error = err.to_string();
                continue;
            }
        };
        let control_address = format!("{}@{domain}", synthetic_local());
        let control = match prober.probe(host, &control_address) {
            Ok(result) => result,
            Err(err) => {
                debug!(%host, error = %err, "control probe failed, trying next host");
                last_error = err.to_string();
                continue;
            }
        };
        let verdict = derive_verdict(&target, &control);
        return CatchAllReport {
            host: Some(host.clone()),
            target,
            control,
            verdict,
        };
    }

    CatchAllReport {
        host: None,
        target: SmtpProbeResult::unknown("unreachable"),
        control: SmtpProbeResult::unknown(last_error),
        verdict: CatchAllVerdict::Unknown,
    }
}

/// First match wins: a rejected target, then target accepted with the
/// control rejected, then both taken.
pub fn derive_verdict(target: &SmtpProbeResult, control: &SmtpProbeResult) -> CatchAllVerdict {
    match (target.category, control.category) {
        (ProbeCategory::Reject, _) => CatchAllVerdict::DoesNotExist,
        (ProbeCategory::Accept, ProbeCategory::Reject) => CatchAllVerdict::Exists,
        (ProbeCategory::Accept, ProbeCategory::Accept | ProbeCategory::Temp) => {
            CatchAllVerdict::CatchAll
        }
        _ => CatchAllVerdict::Unknown,
    }
}

/// `verify-<millis base36>-<6 chars>`, unlikely to exist anywhere.
pub(crate) fn synthetic_local() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| char::from(LOCAL_CHARSET[rng.gen_range(0..LOCAL_CHARSET.len())]))
        .collect();
    format!("verify-{}-{suffix}", to_base36(millis))
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::new();
    loop {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
