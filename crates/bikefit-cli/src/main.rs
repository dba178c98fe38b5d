use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bikefit::{CalcError, Request, Response, evaluate};
use clap::Parser;

#[derive(Parser)]
#[command(name = "bikefit")]
#[command(about = "Run bike-fit calculation requests and print JSON responses")]
#[command(version)]
struct Cli {
    /// Request file; reads stdin when omitted
    path: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(short, long)]
    pretty: bool,

    /// Treat each input line as a separate request
    #[arg(short, long)]
    lines: bool,
}

fn main() -> Result<ExitCode> {
    // stdout carries responses, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut out = io::stdout().lock();
    let mut failures = 0usize;

    if cli.lines {
        let reader: Box<dyn BufRead> = match &cli.path {
            Some(path) => Box::new(io::BufReader::new(
                std::fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
            )),
            None => Box::new(io::stdin().lock()),
        };
        for (index, line) in reader.lines().enumerate() {
            let line = line.context("failed to read input line")?;
            if line.trim().is_empty() {
                continue;
            }
            tracing::debug!(line = index + 1, "processing request");
            let response = run(&line, &mut failures);
            // One response per line regardless of --pretty
            writeln!(out, "{}", serde_json::to_string(&response)?)?;
        }
    } else {
        let input = match &cli.path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            None => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
                buf
            }
        };
        let response = run(&input, &mut failures);
        let rendered = if cli.pretty {
            serde_json::to_string_pretty(&response)?
        } else {
            serde_json::to_string(&response)?
        };
        writeln!(out, "{rendered}")?;
    }

    out.flush()?;
    Ok(if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Evaluate one request. Failures are reported on stderr and still produce a
/// `{ success: false }` response.
fn run(input: &str, failures: &mut usize) -> Response {
    match Request::from_json(input).and_then(|request| evaluate(&request)) {
        Ok(result) => Response::ok(result),
        Err(err) => {
            *failures += 1;
            let response = Response::failure(&err);
            report(err);
            response
        }
    }
}

fn report(err: CalcError) {
    eprintln!("{:?}", miette::Report::new(err));
}
