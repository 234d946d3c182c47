use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use platlog_parsers::{CatalogKind, EventKind, classify, diagnose};

mod config;
mod filter;
mod tally;

use config::Config;
use filter::LineFilter;
use tally::Tally;

/// Platlog - Classify AWS Lambda and Heroku log lines into typed JSON events
#[derive(Parser, Debug)]
#[command(name = "platlog")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files to read (reads stdin when none are given)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Source family: combined, lambda or heroku
    #[arg(short, long)]
    catalog: Option<CatalogKind>,

    /// Config file (defaults to ~/.platlog/platlog.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Only emit events of this kind (repeatable)
    #[arg(short, long = "kind", value_name = "KIND")]
    kinds: Vec<EventKind>,

    /// Only classify lines matching this regex
    #[arg(short = 'm', long = "match", value_name = "REGEX")]
    pattern: Option<String>,

    /// Invert the --match regex
    #[arg(long, requires = "pattern")]
    invert: bool,

    /// Also emit a record for lines that match no shape
    #[arg(long)]
    unmatched: bool,

    /// Print per-kind counts to stderr when done
    #[arg(long)]
    stats: bool,
}

/// Output record for a line no matcher accepted
#[derive(Serialize)]
#[serde(tag = "type")]
struct Unmatched<'a> {
    line: &'a str,
}

fn main() {
    let args = Args::parse();
    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };

    // RUST_LOG wins over the config file
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Run the classifier
    if let Err(e) = run(args, config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Per-run settings resolved from args and config
struct Session {
    catalog: CatalogKind,
    filter: LineFilter,
    emit_unmatched: bool,
    stats: bool,
    tally: Tally,
}

fn run(args: Args, config: Config) -> Result<()> {
    let mut filter = LineFilter::new(args.pattern.as_deref().unwrap_or(""))
        .context("invalid --match pattern")?
        .with_kinds(args.kinds.iter().copied().collect::<HashSet<_>>());
    if args.invert {
        filter = filter.inverted();
    }

    let mut session = Session {
        catalog: args.catalog.unwrap_or(config.catalog),
        filter,
        emit_unmatched: args.unmatched || config.emit_unmatched,
        stats: args.stats,
        tally: Tally::default(),
    };
    if session.filter.is_empty() {
        tracing::debug!(catalog = %session.catalog, "classifying every line");
    } else {
        tracing::debug!(catalog = %session.catalog, filter = ?session.filter, "classifying filtered lines");
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.files.is_empty() {
        process(io::stdin().lock(), &mut session, &mut out).context("failed reading stdin")?;
    } else {
        for path in &args.files {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            process(BufReader::new(file), &mut session, &mut out)
                .with_context(|| format!("failed reading {}", path.display()))?;
        }
    }

    out.flush()?;

    if session.stats {
        eprintln!("{}", session.tally);
    }

    Ok(())
}

/// Classify every line from `reader`, writing one JSON record per emitted line
fn process<R: BufRead, W: Write>(mut reader: R, session: &mut Session, out: &mut W) -> Result<()> {
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let raw = String::from_utf8_lossy(&buf);
        let line = strip_line_ending(&raw);

        if !session.filter.accepts_line(line) {
            continue;
        }

        let event = classify(line, session.catalog);
        if session.stats {
            session.tally.record(event.as_ref());
            if event.is_none() && diagnose(line, session.catalog).near_misses().next().is_some() {
                session.tally.record_near_miss();
            }
        }

        if !session.filter.accepts_event(event.as_ref()) {
            continue;
        }

        match &event {
            Some(event) => serde_json::to_writer(&mut *out, event)?,
            None if session.emit_unmatched => serde_json::to_writer(&mut *out, &Unmatched { line })?,
            None => continue,
        }
        out.write_all(b"\n")?;
    }

    Ok(())
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
