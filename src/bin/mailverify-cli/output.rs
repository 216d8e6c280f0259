#[cfg(any(feature = "with-serde", feature = "with-csv"))]
use anyhow::Context;
use anyhow::{Result, bail};
use std::path::Path;

use mailverify_lib::{QuickCheck, VerificationResult, VerificationStatus};

use crate::args::Format;

pub fn write_results(
    results: &[VerificationResult],
    format: Format,
    out: Option<&Path>,
    steps: bool,
) -> Result<()> {
    match format {
        Format::Human => {
            write_human(results, steps);
            Ok(())
        }
        Format::Json => write_json(results, out),
        Format::Ndjson => write_ndjson(results, out),
        Format::Csv => write_csv(results, out),
    }
}

pub fn write_quick(check: &QuickCheck, format: Format, out: Option<&Path>) -> Result<()> {
    match format {
        Format::Human => {
            print_quick(check);
            Ok(())
        }
        Format::Json | Format::Ndjson => write_quick_json(check, format, out),
        Format::Csv => bail!("format=csv is not available for probe, use human|json|ndjson"),
    }
}

/// 2 when any address came back invalid.
pub fn exit_code(results: &[VerificationResult]) -> i32 {
    if results
        .iter()
        .any(|r| r.status == VerificationStatus::Invalid)
    {
        2
    } else {
        0
    }
}

fn write_human(results: &[VerificationResult], steps: bool) {
    for r in results {
        let tag = format!("[{}]", r.status.as_str().to_ascii_uppercase());
        println!("{tag:<12} {} score={} :: {}", r.email, r.score, r.details);
        if !r.flags.is_empty() {
            println!("             flags: {}", r.flags.join(", "));
        }
        if !steps {
            continue;
        }
        for step in &r.steps {
            println!("             {} {}", mark(step.pass), step.name);
            for sub in &step.subs {
                match &sub.info {
                    Some(info) => println!("               {} {} ({info})", mark(sub.pass), sub.name),
                    None => println!("               {} {}", mark(sub.pass), sub.name),
                }
            }
        }
    }
}

fn mark(pass: bool) -> &'static str {
    if pass { "ok  " } else { "FAIL" }
}

fn print_quick(check: &QuickCheck) {
    println!("[{}] {}", check.status, check.message);
    for mx in &check.mx {
        println!("        mx: {} {}", mx.preference, mx.exchange);
    }
    println!("        spf: {}", check.spf.as_deref().unwrap_or("-"));
    println!("        dmarc: {}", check.dmarc.as_deref().unwrap_or("-"));
    if let Some(probe) = &check.probe {
        println!(
            "        probe: {} via {} (target {} {}, control {} {})",
            probe.verdict,
            probe.host.as_deref().unwrap_or("-"),
            probe.target.category,
            probe.target.code,
            probe.control.category,
            probe.control.code,
        );
    }
}

#[cfg(feature = "with-serde")]
fn write_json(results: &[VerificationResult], out: Option<&Path>) -> Result<()> {
    let s = serde_json::to_string_pretty(results)?;
    emit(out, s.as_bytes())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &[VerificationResult], _: Option<&Path>) -> Result<()> {
    bail!("format=json requires the 'with-serde' feature")
}

#[cfg(feature = "with-serde")]
fn write_ndjson(results: &[VerificationResult], out: Option<&Path>) -> Result<()> {
    let mut buf = Vec::new();
    for r in results {
        serde_json::to_writer(&mut buf, r)?;
        buf.push(b'\n');
    }
    emit(out, &buf)
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson(_: &[VerificationResult], _: Option<&Path>) -> Result<()> {
    bail!("format=ndjson requires the 'with-serde' feature")
}

#[cfg(feature = "with-serde")]
fn write_quick_json(check: &QuickCheck, format: Format, out: Option<&Path>) -> Result<()> {
    let mut s = if format == Format::Json {
        serde_json::to_string_pretty(check)?
    } else {
        serde_json::to_string(check)?
    };
    s.push('\n');
    emit(out, s.as_bytes())
}

#[cfg(not(feature = "with-serde"))]
fn write_quick_json(_: &QuickCheck, _: Format, _: Option<&Path>) -> Result<()> {
    bail!("format=json requires the 'with-serde' feature")
}

#[cfg(feature = "with-csv")]
fn write_csv(results: &[VerificationResult], out: Option<&Path>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["email", "status", "score", "flags", "details"])?;
    for r in results {
        wtr.write_record([
            r.email.as_str(),
            r.status.as_str(),
            r.score.to_string().as_str(),
            r.flags.join("|").as_str(),
            r.details.as_str(),
        ])?;
    }
    let data = wtr.into_inner().context("flush csv buffer")?;
    emit(out, &data)
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &[VerificationResult], _: Option<&Path>) -> Result<()> {
    bail!("format=csv requires the 'with-csv' feature")
}

#[cfg(any(feature = "with-serde", feature = "with-csv"))]
fn emit(out: Option<&Path>, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let Some(path) = out else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(bytes)?;
        if !bytes.ends_with(b"\n") {
            stdout.write_all(b"\n")?;
        }
        return Ok(());
    };

    let tmp = path.with_extension("tmp");
    {
        let mut f = std::fs::File::create(&tmp)
            .with_context(|| format!("create {}", tmp.display()))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
