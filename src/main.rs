use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rootca::config::{DEFAULT_KEY_BITS, DEFAULT_VALIDITY_DAYS};
use rootca::{CaBundle, IssuerConfig, issue_with_config};
use tracing_subscriber::EnvFilter;

/// rootca: issue a self-signed root certificate authority.
///
/// Writes `ca.crt` and `ca.key` (mode 0600) under `--out`, or prints both
/// PEM blocks to stdout when no output directory is given.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Domain used as Common Name and sole DNS Subject Alternative Name.
    #[arg(short, long)]
    domain: String,

    /// Directory to write `ca.crt` and `ca.key` into. Created if missing.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// RSA modulus size in bits.
    #[arg(long, default_value_t = DEFAULT_KEY_BITS)]
    key_bits: usize,

    /// Days the certificate stays valid.
    #[arg(long, default_value_t = DEFAULT_VALIDITY_DAYS)]
    validity_days: i64,

    /// Print the PEM blocks to stdout even when writing files.
    #[arg(long)]
    print: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = IssuerConfig::builder()
        .key_bits(cli.key_bits)
        .validity_days(cli.validity_days)
        .build();
    let print = cli.print || cli.out.is_none();

    match issue_with_config(&config, cli.out.as_deref(), &cli.domain) {
        Ok(bundle) => {
            if print {
                print_bundle(&bundle);
            }
            Ok(())
        }
        Err(err) => {
            if print {
                if let Some(bundle) = err.bundle() {
                    print_bundle(bundle);
                }
            }
            Err(err.into())
        }
    }
}

fn print_bundle(bundle: &CaBundle) {
    print!("{}", bundle.certificate);
    print!("{}", bundle.private_key);
}
