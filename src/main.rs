//! gpu-grep -- literal substring search offloaded to a parallel compute
//! backend, reported grep-style with line numbers.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::Parser;

use gpu_grep::report::Reporter;
use gpu_grep::search::{resolve_records, LineIndex, Searcher, SearchOptions};

/// Literal substring search on a parallel compute backend.
///
/// Reads the whole haystack into memory, launches one comparison task per
/// candidate offset, and prints every matching line.
#[derive(Parser, Debug)]
#[command(name = "gpu-grep", version, about)]
struct CliArgs {
    /// Literal pattern to search for (compared byte-for-byte, no regex).
    #[arg(value_name = "PATTERN")]
    pattern: String,

    /// File to search; reads standard input when omitted.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

fn main() {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            process::exit(0);
        }
        Err(e) => {
            // Usage error: message to stderr, exit 1.
            let _ = e.print();
            process::exit(1);
        }
    };

    process::exit(run(&args));
}

fn run(args: &CliArgs) -> i32 {
    let (haystack, source) = read_haystack(args.file.as_deref());

    let searcher = match Searcher::with_default_backend() {
        Ok(searcher) => searcher,
        Err(e) => {
            eprintln!("[gpu-grep] fatal: {}", e);
            return e.exit_code();
        }
    };

    let outcome = match searcher.search(&haystack, args.pattern.as_bytes(), &SearchOptions::default())
    {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("[gpu-grep] fatal: {}", e);
            return e.exit_code();
        }
    };

    let index = LineIndex::build(&haystack);
    let records = resolve_records(&haystack, &index, &outcome.offsets);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let reporter = Reporter::new(&args.pattern, &source);
    if let Err(e) =
        reporter.write_report(&outcome, &records, &mut stdout.lock(), &mut stderr.lock())
    {
        // Broken pipe on stdout (e.g. piped to head) is not a failure.
        if e.kind() == io::ErrorKind::BrokenPipe {
            return 0;
        }
        eprintln!("[gpu-grep] write failed: {}", e);
        return 2;
    }
    let _ = stdout.lock().flush();

    0
}

/// Read the haystack and produce its source label.
///
/// An unreadable source is reported to stderr and treated as EMPTY input,
/// yielding a "Found 0 matches" run with exit code 0. Questionable, but it
/// is the established behavior of this tool.
fn read_haystack(file: Option<&Path>) -> (Vec<u8>, String) {
    match file {
        Some(path) => {
            let source = path.display().to_string();
            match std::fs::read(path) {
                Ok(bytes) => (bytes, source),
                Err(e) => {
                    eprintln!(
                        "[gpu-grep] warning: cannot read '{}': {}; treating as empty input",
                        source, e
                    );
                    (Vec::new(), source)
                }
            }
        }
        None => {
            let mut buf = Vec::new();
            if let Err(e) = io::stdin().lock().read_to_end(&mut buf) {
                eprintln!(
                    "[gpu-grep] warning: cannot read stdin: {}; treating as empty input",
                    e
                );
                buf.clear();
            }
            (buf, "stdin".to_string())
        }
    }
}
