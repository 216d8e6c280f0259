#[path = "mailverify-cli/args.rs"]
mod args;
#[path = "mailverify-cli/output.rs"]
mod output;

use std::io::{self, BufRead, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};
use mailverify_lib::{quick_check, verify_bulk, verify_email};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let out = cli.out.as_deref();

    // 0 ok, 2 any invalid, 1 fatal
    let code = match &cli.cmd {
        Commands::Verify {
            emails,
            stdin,
            probe,
            steps,
        } => {
            let mut emails = emails.clone();
            if *stdin {
                emails.extend(read_lines(io::stdin().lock())?);
            }
            if emails.is_empty() {
                bail!("no address given, pass some or use --stdin");
            }
            let options = cli.verify_options(probe);
            let results = emails
                .iter()
                .map(|email| verify_email(email, &options))
                .collect::<Result<Vec<_>, _>>()?;
            output::write_results(&results, cli.format, out, *steps)?;
            output::exit_code(&results)
        }
        Commands::Bulk { file, csv, probe } => {
            let text = read_input(file.as_deref())?;
            let emails = if *csv {
                from_csv(&text)?
            } else {
                read_lines(text.as_bytes())?
            };
            if emails.is_empty() {
                bail!("no email addresses in input");
            }
            let report = verify_bulk(&emails, &cli.verify_options(probe));
            output::write_results(&report.results, cli.format, out, false)?;
            output::exit_code(&report.results)
        }
        Commands::Probe {
            email,
            no_deep,
            timeout_ms,
        } => {
            let smtp = cli.smtp_options().with_timeout_ms(*timeout_ms);
            let check = quick_check(email, !no_deep, &smtp)?;
            output::write_quick(&check, cli.format, out)?;
            if check.ok() { 0 } else { 2 }
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn read_lines(reader: impl BufRead) -> Result<Vec<String>> {
    let mut emails = Vec::new();
    for line in reader.lines() {
        let line = line.context("read input")?;
        let line = line.trim();
        if !line.is_empty() {
            emails.push(line.to_string());
        }
    }
    Ok(emails)
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("read stdin")?;
            Ok(text)
        }
    }
}

#[cfg(feature = "with-csv")]
fn from_csv(text: &str) -> Result<Vec<String>> {
    mailverify_lib::emails_from_csv(text).context("parse csv input")
}

#[cfg(not(feature = "with-csv"))]
fn from_csv(_: &str) -> Result<Vec<String>> {
    bail!("--csv requires the 'with-csv' feature")
}
