use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mailverify_lib::smtp_verify::{DEFAULT_HELO_DOMAIN, DEFAULT_TIMEOUT_MS, HELO_DOMAIN_ENV};
use mailverify_lib::verify::DEFAULT_VERIFY_TIMEOUT_MS;
use mailverify_lib::{SmtpProbeOptions, VerifyOptions};

#[derive(Parser)]
#[command(name = "mailverify-cli", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,

    /// domain announced in EHLO
    #[arg(long, global = true, env = HELO_DOMAIN_ENV, default_value = DEFAULT_HELO_DOMAIN)]
    pub helo: String,

    /// SMTP port of the probed mail servers
    #[arg(long, global = true, default_value_t = 25)]
    pub port: u16,

    /// output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Human)]
    pub format: Format,

    /// write the report to a file instead of stdout (json/ndjson/csv)
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full verification of one or more addresses
    Verify {
        emails: Vec<String>,
        /// read addresses from stdin (one per line)
        #[arg(long)]
        stdin: bool,
        #[command(flatten)]
        probe: ProbeArgs,
        /// print every step and sub-check (human format)
        #[arg(long)]
        steps: bool,
    },
    /// Verify a list of addresses on the worker pool
    Bulk {
        /// input file, stdin when absent
        file: Option<PathBuf>,
        /// parse the input as CSV (feature `with-csv`)
        #[arg(long)]
        csv: bool,
        #[command(flatten)]
        probe: ProbeArgs,
    },
    /// Domain-level check: mail route, SPF, DMARC, optional catch-all probe
    Probe {
        email: String,
        /// skip the SMTP probe
        #[arg(long)]
        no_deep: bool,
        /// SMTP timeout (ms), clamped to 3000..=20000
        #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,
    },
}

#[derive(clap::Args)]
pub struct ProbeArgs {
    /// skip the SMTP and catch-all probes
    #[arg(long)]
    pub no_deep: bool,
    /// overall timeout (ms), clamped to 2000..=15000
    #[arg(long = "timeout", default_value_t = DEFAULT_VERIFY_TIMEOUT_MS)]
    pub timeout_ms: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Human,
    Json,
    Ndjson,
    Csv,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn smtp_options(&self) -> SmtpProbeOptions {
        SmtpProbeOptions::default()
            .with_helo_domain(self.helo.clone())
            .with_port(self.port)
    }

    pub fn verify_options(&self, probe: &ProbeArgs) -> VerifyOptions {
        VerifyOptions::default()
            .with_deep(!probe.no_deep)
            .with_timeout_ms(probe.timeout_ms)
            .with_smtp(self.smtp_options())
    }
}
