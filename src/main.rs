//! tcp-writer - push stdin lines over a stream socket
//!
//! Usage:
//!   tcp-writer --addr 127.0.0.1:6000      Send each stdin line over TCP
//!   tcp-writer --unix /run/collector.sock Send over a Unix-domain socket
//!   tcp-writer -c tcp-writer.toml --json  Use a config file, JSON summary

mod cli;

use bytes::Bytes;
use clap::Parser;
use serde::Serialize;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use tcp_writer::config::Config;
use tcp_writer::error::{Result, TransportError};
use tcp_writer::logging;
use tcp_writer::Writer;
use tracing::{info, warn};

/// What was sent, printed on success
#[derive(Debug, Serialize)]
struct Summary {
    peer: String,
    lines: usize,
    bytes: usize,
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    match run(&cli) {
        Ok(summary) => {
            if cli.json {
                match serde_json::to_string(&summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("tcp-writer: {}", e),
                }
            } else {
                println!(
                    "Sent {} lines ({} bytes) to {}",
                    summary.lines, summary.bytes, summary.peer
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("tcp-writer: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli) -> Result<Summary> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);
    logging::init_tracing(config.logging.verbose);

    let writer = config.build_writer()?;
    let peer = writer.peer().unwrap_or_default();
    writer.open()?;
    info!(%peer, "connected");

    let summary = match pump(&writer, io::stdin().lock()) {
        Ok((lines, bytes)) => Summary { peer, lines, bytes },
        Err(e) => {
            // The transport stays connected after an I/O failure
            if let Err(close_err) = writer.close() {
                warn!(error = %close_err, "close after failure");
            }
            return Err(e);
        }
    };

    writer.close()?;
    writer.destroy()?;
    Ok(summary)
}

/// Send every input line as `[line, "\n"]`, returning (lines, bytes)
fn pump(writer: &Writer, input: impl BufRead) -> Result<(usize, usize)> {
    const NEWLINE: Bytes = Bytes::from_static(b"\n");

    let mut lines = 0;
    let mut bytes = 0;
    for line in input.lines() {
        let line = line.map_err(|e| TransportError::Io {
            path: PathBuf::from("<stdin>"),
            source: e,
        })?;
        let frame = Bytes::from(line);
        bytes += frame.len() + NEWLINE.len();
        writer.write_frames(&[frame, NEWLINE])?;
        lines += 1;
    }
    Ok((lines, bytes))
}
