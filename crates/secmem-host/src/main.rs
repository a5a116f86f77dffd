//! Secure memory host binary.
//!
//! Reads attribute commands from stdin, one per line, and writes one reply
//! per command to stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Ephemeral KEK (generated at startup)
//! echo "write clear 0 000102" | secmem --name alice
//!
//! # Fixed KEK
//! secmem --kek 000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f
//! ```

use std::io::{self, BufRead, Write};

use clap::Parser;
use secmem_crypto::KekTransform;
use secmem_host::{Command, HostConfig, Reply, SecureMemoryHost};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

/// Secure memory key staging host
#[derive(Parser, Debug)]
#[command(name = "secmem")]
#[command(about = "Clear/black key buffers behind a line-oriented attribute interface")]
#[command(version)]
struct Args {
    /// Name announced in lifecycle logs
    #[arg(short, long, default_value = "world")]
    name: String,

    /// Key-encryption key as 64 hex characters (generated when omitted)
    #[arg(long)]
    kek: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let transform = match args.kek {
        Some(text) => {
            let kek = Zeroizing::new(hex::decode(Zeroizing::new(text).as_str())?);
            KekTransform::from_slice(&kek)?
        },
        None => {
            tracing::warn!("No KEK provided - generating an ephemeral key-encryption key");
            tracing::warn!("Black keys will not unwrap after this process exits");
            KekTransform::generate()?
        },
    };

    let host = SecureMemoryHost::init(HostConfig { name: args.name }, transform);
    let mut out = io::stdout().lock();

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "error {e}")?;
                continue;
            },
        };

        match command.execute(&host) {
            Ok(reply) => {
                writeln!(out, "{reply}")?;
                if matches!(reply, Reply::Quit) {
                    break;
                }
            },
            Err(e) => {
                tracing::debug!("command failed: {e}");
                writeln!(out, "err {} {e}", e.errno())?;
            },
        }
    }

    host.shutdown();

    Ok(())
}
