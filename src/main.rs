//! Hashsleuth CLI - compute checksums and identify unknown digest algorithms.
//!
//! This is the main entry point for the hashsleuth command-line application.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use indicatif::{ProgressBar, ProgressStyle};
use memmap2::Mmap;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hashsleuth::find::MATCH_LIMIT;
use hashsleuth::prelude::*;

/// Hashsleuth - checksum computation and algorithm discovery
#[derive(Parser)]
#[command(name = "hashsleuth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find which algorithm turns a message into a known digest
    Find {
        /// Digest width in bits
        #[arg(short, long)]
        width: u32,

        /// Message the digest was computed over (txt:, hex:, dec:, oct:, bin:, base64:)
        #[arg(short = 'q', long)]
        sequence: Sequence,

        /// Expected digest, written in --encoding
        #[arg(short, long, required_unless_present = "expected_hex", conflicts_with = "expected_hex")]
        expected: Option<String>,

        /// Expected digest as raw hex bytes, compared exactly
        #[arg(long)]
        expected_hex: Option<String>,

        /// Encoding of --expected
        #[arg(short = 'E', long, env = "HASHSLEUTH_ENCODING", default_value = "hex")]
        encoding: Encoding,

        /// Brute-force worker threads (default: one per core)
        #[arg(short, long, env = "HASHSLEUTH_THREADS")]
        threads: Option<usize>,

        /// Strategies to leave out (catalogue, documented, brute-force)
        #[arg(long, value_delimiter = ',')]
        skip: Vec<StrategyKind>,

        /// Brute-force matches kept in the report; all are still counted
        #[arg(long, env = "HASHSLEUTH_MAX_MATCHES", default_value_t = MATCH_LIMIT)]
        max_matches: usize,

        /// Cancel the search after this many seconds
        #[arg(long, env = "HASHSLEUTH_TIMEOUT")]
        timeout: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Show every candidate and a per-strategy summary
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compute a digest of a sequence, files, or standard input
    Compute {
        /// Algorithm id, catalogue CRC name or crc: parameter string
        #[arg(short, long)]
        algorithm: String,

        /// Message to hash instead of files
        #[arg(short = 'q', long, conflicts_with = "files")]
        sequence: Option<Sequence>,

        /// Files to hash; standard input when none are given
        files: Vec<PathBuf>,

        /// Output encoding
        #[arg(short = 'E', long, env = "HASHSLEUTH_ENCODING", default_value = "hex")]
        encoding: Encoding,
    },

    /// Check a digest against an expected value
    Check {
        /// Algorithm id, catalogue CRC name or crc: parameter string
        #[arg(short, long)]
        algorithm: String,

        /// Expected digest, written in --encoding
        #[arg(short, long)]
        expected: String,

        /// Message to hash instead of a file
        #[arg(short = 'q', long, conflicts_with = "file")]
        sequence: Option<Sequence>,

        /// File to hash; standard input when absent
        file: Option<PathBuf>,

        /// Encoding of --expected
        #[arg(short = 'E', long, env = "HASHSLEUTH_ENCODING", default_value = "hex")]
        encoding: Encoding,
    },

    /// List available algorithms
    List {
        /// Only algorithms with this output width
        #[arg(short, long)]
        width: Option<u32>,

        /// Also list the CRC catalogue
        #[arg(short, long)]
        catalogue: bool,
    },
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Find {
            width,
            sequence,
            expected,
            expected_hex,
            encoding,
            threads,
            skip,
            max_matches,
            timeout,
            json,
            verbose,
        } => {
            let expected = expected_value(expected, expected_hex.as_deref(), encoding)?;
            let mut options = SearchOptions::default()
                .with_threads(threads)
                .with_max_matches(max_matches)
                .with_verbose(verbose);
            for strategy in skip {
                options = options.without(strategy);
            }
            let request = SearchRequest::new(width, sequence, expected);
            let outcome = cmd_find(request, options, timeout.map(Duration::from_secs), json)?;
            Ok(match outcome {
                Outcome::Found => ExitCode::SUCCESS,
                Outcome::NotFound => ExitCode::from(1),
            })
        }
        Commands::Compute {
            algorithm,
            sequence,
            files,
            encoding,
        } => cmd_compute(&algorithm, sequence, &files, encoding),
        Commands::Check {
            algorithm,
            expected,
            sequence,
            file,
            encoding,
        } => cmd_check(&algorithm, &expected, sequence, file.as_deref(), encoding),
        Commands::List { width, catalogue } => cmd_list(width, catalogue),
    }
}

fn expected_value(text: Option<String>, hex: Option<&str>, encoding: Encoding) -> Result<Expected> {
    match (text, hex) {
        (_, Some(hex)) => {
            let bytes = Sequence::parse(&format!("hex:{hex}")).context("Invalid --expected-hex")?;
            Ok(Expected::bytes(bytes.into_bytes()))
        }
        (Some(text), None) => Ok(Expected::text(text, encoding)),
        (None, None) => anyhow::bail!("Either --expected or --expected-hex is required"),
    }
}

fn cmd_find(
    request: SearchRequest,
    options: SearchOptions,
    timeout: Option<Duration>,
    json: bool,
) -> Result<Outcome> {
    let verbose = options.verbose;
    let registry = Registry::builtin().context("Failed to load digest registry")?;
    let orchestrator = SearchOrchestrator::new(&registry, options)?;
    let cancel = CancelToken::new();

    let (observer, events) = ChannelObserver::channel();
    let observer = observer.with_progress(!json);

    let start = Instant::now();
    let report = std::thread::scope(|scope| {
        let (finished, finished_rx) = crossbeam_channel::bounded::<()>(0);
        if let Some(limit) = timeout {
            let cancel = &cancel;
            scope.spawn(move || cancel_after(limit, cancel, &finished_rx));
        }
        let printer = scope.spawn(move || render_events(events, verbose));
        let report = orchestrator.search(&request, &observer, &cancel);
        drop(finished);
        drop(observer);
        if printer.join().is_err() {
            eprintln!("Progress display stopped unexpectedly");
        }
        report
    });
    let report = match (report, timeout) {
        (Err(hashsleuth::find::Error::Cancelled), Some(limit)) => {
            anyhow::bail!("Search cancelled after {}s", limit.as_secs())
        }
        (report, _) => report?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for m in &report.matches {
            println!("{}  {}", m.id, m.description);
        }
        if report.truncated {
            eprintln!(
                "Showing {} of {} matches (raise --max-matches to keep more)",
                report.matches.len(),
                report.found
            );
        }
        if verbose {
            for s in &report.strategies {
                match (&s.skipped, s.found) {
                    (Some(reason), _) => eprintln!("{:<12} skipped: {reason}", s.strategy.name()),
                    (None, found) => eprintln!(
                        "{:<12} searched {}, found {}",
                        s.strategy.name(),
                        s.searched,
                        found.unwrap_or(0)
                    ),
                }
            }
            eprintln!(
                "Searched {} candidates in {:?}, found {}",
                report.searched,
                start.elapsed(),
                report.found
            );
        }
        if !report.is_found() {
            eprintln!("No algorithm found for width {}", report.width);
        }
    }

    Ok(report.outcome)
}

/// Cancel the search unless `finished` disconnects within `limit`.
fn cancel_after(limit: Duration, cancel: &CancelToken, finished: &Receiver<()>) {
    if let Err(RecvTimeoutError::Timeout) = finished.recv_timeout(limit) {
        debug!(?limit, "timeout reached, cancelling search");
        cancel.cancel();
    }
}

/// Print search events until the observer is dropped.
fn render_events(events: Receiver<SearchEvent>, verbose: bool) {
    let mut bar: Option<ProgressBar> = None;

    for event in events {
        match event {
            SearchEvent::Started(strategy) if verbose => eprintln!("Running {strategy}"),
            SearchEvent::Candidate(_, id) => eprintln!("  trying {id}"),
            SearchEvent::Matched(strategy, m) if verbose => {
                let line = format!("  [{strategy}] match: {} ({})", m.id, m.description);
                match &bar {
                    Some(pb) => pb.println(line),
                    None => eprintln!("{line}"),
                }
            }
            SearchEvent::Progress { done, total, .. } => {
                let pb = bar.get_or_insert_with(|| progress_bar(total));
                advance(pb, done);
            }
            SearchEvent::Finished(StrategyKind::BruteForce, _) => {
                if let Some(pb) = bar.take() {
                    pb.finish_and_clear();
                }
            }
            SearchEvent::Skipped(strategy, reason) => eprintln!("Warning: skipping {strategy}: {reason}"),
            _ => {}
        }
    }

    if let Some(pb) = bar {
        pb.abandon();
    }
}

/// Workers report out of order; never move the bar backwards.
fn advance(pb: &ProgressBar, done: u64) {
    pb.set_position(done.max(pb.position()));
}

fn progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} polynomials ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn cmd_compute(
    algorithm: &str,
    sequence: Option<Sequence>,
    files: &[PathBuf],
    encoding: Encoding,
) -> Result<ExitCode> {
    let registry = Registry::builtin().context("Failed to load digest registry")?;
    let mut digest = registry
        .instantiate(algorithm)
        .with_context(|| format!("Unknown algorithm {algorithm:?}"))?;

    if let Some(sequence) = sequence {
        let value = digest.digest(sequence.as_bytes());
        println!("{}  {}", encoding.encode(&value), sequence);
    } else if files.is_empty() {
        let value = digest_stdin(digest.as_mut())?;
        println!("{}  -", encoding.encode(&value));
    } else {
        for path in files {
            let value = digest_file(digest.as_mut(), path)?;
            println!("{}  {}", encoding.encode(&value), path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_check(
    algorithm: &str,
    expected: &str,
    sequence: Option<Sequence>,
    file: Option<&Path>,
    encoding: Encoding,
) -> Result<ExitCode> {
    let registry = Registry::builtin().context("Failed to load digest registry")?;
    let mut digest = registry
        .instantiate(algorithm)
        .with_context(|| format!("Unknown algorithm {algorithm:?}"))?;

    let value = match (sequence, file) {
        (Some(sequence), _) => digest.digest(sequence.as_bytes()),
        (None, Some(path)) => digest_file(digest.as_mut(), path)?,
        (None, None) => digest_stdin(digest.as_mut())?,
    };

    let expected = Expected::text(expected, encoding);
    if expected.matches(&value) {
        println!("OK");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("MISMATCH: computed {}", encoding.encode(&value));
        Ok(ExitCode::from(1))
    }
}

fn cmd_list(width: Option<u32>, catalogue: bool) -> Result<ExitCode> {
    let registry = Registry::builtin().context("Failed to load digest registry")?;

    let algorithms = registry.list_algorithms(width);
    for (id, description) in &algorithms {
        println!("{id:<16} {description}");
    }
    let mut count = algorithms.len();

    if catalogue {
        let entries: Vec<_> = match width {
            Some(w) => registry.catalogue().with_width(w).collect(),
            None => registry.catalogue().entries().iter().collect(),
        };
        for entry in &entries {
            println!("{:<20} crc:{}  {}", entry.id, entry.model, entry.description);
        }
        count += entries.len();
    }

    println!("\nTotal: {} algorithms", count);

    Ok(ExitCode::SUCCESS)
}

/// Digest a file through a read-only memory map.
fn digest_file(digest: &mut dyn Digest, path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let len = file.metadata()?.len();
    debug!(path = %path.display(), len, "hashing file");

    // Mapping an empty file fails on some platforms.
    if len == 0 {
        return Ok(digest.digest(&[]));
    }

    let mmap = unsafe { Mmap::map(&file) }.with_context(|| format!("Failed to map {}", path.display()))?;
    Ok(digest.digest(&mmap))
}

fn digest_stdin(digest: &mut dyn Digest) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut data)
        .context("Failed to read standard input")?;
    Ok(digest.digest(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_find() {
        let cli = Cli::try_parse_from([
            "hashsleuth",
            "find",
            "--width",
            "16",
            "-q",
            "txt:123456789",
            "-e",
            "31c3",
            "--skip",
            "brute-force,documented",
        ])
        .unwrap();

        match cli.command {
            Commands::Find {
                width,
                sequence,
                expected,
                skip,
                ..
            } => {
                assert_eq!(width, 16);
                assert_eq!(sequence.as_bytes(), b"123456789");
                assert_eq!(expected.as_deref(), Some("31c3"));
                assert_eq!(skip, vec![StrategyKind::BruteForce, StrategyKind::Documented]);
            }
            _ => panic!("expected find"),
        }
    }

    #[test]
    fn test_find_requires_an_expected_value() {
        let result = Cli::try_parse_from(["hashsleuth", "find", "-w", "8", "-q", "txt:1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_expected_value() {
        let raw = expected_value(None, Some("31 C3"), Encoding::Hex).unwrap();
        assert_eq!(raw, Expected::bytes([0x31, 0xC3]));

        let text = expected_value(Some(" y/Q5Jg== ".into()), None, Encoding::Base64).unwrap();
        assert_eq!(text, Expected::text("y/Q5Jg==", Encoding::Base64));

        assert!(expected_value(None, None, Encoding::Hex).is_err());
        assert!(expected_value(None, Some("xyz"), Encoding::Hex).is_err());
    }

    #[test]
    fn test_digest_file() {
        let registry = Registry::builtin().unwrap();
        let mut crc = registry.instantiate("crc32").unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"123456789").unwrap();
        file.flush().unwrap();
        assert_eq!(digest_file(crc.as_mut(), file.path()).unwrap(), vec![0xCB, 0xF4, 0x39, 0x26]);

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(digest_file(crc.as_mut(), empty.path()).unwrap(), vec![0, 0, 0, 0]);

        assert!(digest_file(crc.as_mut(), Path::new("/nonexistent/hashsleuth")).is_err());
    }

    #[test]
    fn test_find_outcomes() {
        let options = SearchOptions::default().without(StrategyKind::BruteForce);
        let found = SearchRequest::new(16, b"123456789".to_vec(), Expected::bytes([0x31, 0xC3]));
        assert_eq!(cmd_find(found, options.clone(), None, true).unwrap(), Outcome::Found);

        let missing = SearchRequest::new(16, b"123456789".to_vec(), Expected::bytes([0x00, 0x01]));
        assert_eq!(cmd_find(missing, options, None, true).unwrap(), Outcome::NotFound);
    }

    #[test]
    fn test_progress_never_goes_backwards() {
        let pb = ProgressBar::hidden();
        pb.set_length(8192);
        advance(&pb, 4096);
        advance(&pb, 8192);
        advance(&pb, 4096);
        assert_eq!(pb.position(), 8192);
    }

    #[test]
    fn test_cancel_after_timeout() {
        let cancel = CancelToken::new();
        let (_finished, finished_rx) = crossbeam_channel::bounded::<()>(0);
        cancel_after(Duration::from_millis(10), &cancel, &finished_rx);
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_no_cancel_when_search_finishes() {
        let cancel = CancelToken::new();
        let (finished, finished_rx) = crossbeam_channel::bounded::<()>(0);
        drop(finished);
        cancel_after(Duration::from_secs(60), &cancel, &finished_rx);
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn test_find_times_out() {
        let request = SearchRequest::new(32, b"123456789".to_vec(), Expected::bytes([0, 0, 0, 0]));
        let options = SearchOptions::default().with_strategies([StrategyKind::BruteForce]);
        let err = cmd_find(request, options, Some(Duration::from_millis(50)), true).unwrap_err();
        assert!(err.to_string().contains("cancelled"), "{err}");
    }
}
