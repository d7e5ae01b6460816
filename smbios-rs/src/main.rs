use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use smbios_uuid::SmbiosUuid;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Print the platform UUID stored in the SMBIOS System Information table
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print only the UUID
    #[arg(short, long)]
    quiet: bool,

    /// Exit with a non-zero status when no UUID could be read
    #[arg(long, env = "SMBIOS_UUID_STRICT")]
    strict: bool,
}

fn setup_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}

/// Writes the lookup result and returns the process exit status.
///
/// Failures are reported on `err` as a single line and only change the exit
/// status under `--strict`.
fn report(
    cli: &Cli,
    result: smbios_uuid::Result<SmbiosUuid>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<u8> {
    match result {
        Ok(uuid) if cli.quiet => writeln!(out, "{uuid}")?,
        Ok(uuid) => writeln!(out, "SMBIOS UUID: {uuid}")?,
        Err(e) => {
            tracing::debug!(error = ?e, "failed to read SMBIOS UUID");
            writeln!(err, "Error: {e}")?;
            if cli.strict {
                return Ok(1);
            }
        }
    }
    Ok(0)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging()?;

    let status = report(
        &cli,
        smbios_uuid::system_uuid(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;
    Ok(ExitCode::from(status))
}
