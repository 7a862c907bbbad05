//! LMJSON command-line tool for checking and inspecting LMJSON documents.
//!
//! Usage: lmjson [OPTIONS] [PATH]...
//!
//! Each PATH is a file or a directory that is searched recursively for
//! `*.lmjson` documents. With no PATH, a single document is read from stdin.
//!
//! Options:
//!   --check          Only report whether each document parses
//!   -q, --quiet      Print nothing for documents that parse
//!   -h, --help       Print help
//!   -V, --version    Print version
//!
//! The exit status is 1 if any document failed to parse or could not be read.
//! Set `RUST_LOG` (for example `RUST_LOG=liblmjson=debug`) to see parser logs.

use clap::Parser;
use liblmjson::parse_with_filename;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "lmjson",
    version,
    about = "Check and inspect LMJSON documents"
)]
struct Cli {
    #[arg(long, help = "Only report whether each document parses")]
    check: bool,
    #[arg(short, long, help = "Print nothing for documents that parse")]
    quiet: bool,
    #[arg(help = "Files, or directories searched recursively for *.lmjson; stdin when omitted")]
    paths: Vec<PathBuf>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if cli.paths.is_empty() {
        let mut input = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut input) {
            eprintln!("Error reading stdin: {}", e);
            process::exit(1);
        }
        process::exit(process_input(&input, None, &cli));
    }

    let mut had_errors = false;
    for path in &cli.paths {
        let files = match discover(path) {
            Ok(files) => files,
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                had_errors = true;
                continue;
            }
        };
        tracing::debug!(path = %path.display(), count = files.len(), "discovered documents");
        for file in files {
            if process_file(&file, &cli) != 0 {
                had_errors = true;
            }
        }
    }

    process::exit(if had_errors { 1 } else { 0 });
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Expand a command-line path into the documents it names: the file itself,
/// or every `*.lmjson` below a directory, sorted.
fn discover(path: &Path) -> Result<Vec<PathBuf>, String> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let root = PathBuf::from(glob::Pattern::escape(&path.to_string_lossy()));
    let pattern = root.join("**").join("*.lmjson");
    let entries = glob::glob(&pattern.to_string_lossy()).map_err(|e| e.to_string())?;
    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(file) => files.push(file),
            Err(e) => tracing::warn!(error = %e, "skipping unreadable entry"),
        }
    }
    files.sort();
    Ok(files)
}

fn process_file(path: &Path, cli: &Cli) -> i32 {
    match fs::read_to_string(path) {
        Ok(input) => process_input(&input, Some(path), cli),
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            1
        }
    }
}

fn process_input(input: &str, input_file: Option<&Path>, cli: &Cli) -> i32 {
    let filename = input_file.map(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| p.display().to_string())
    });

    match parse_with_filename(input, filename.as_deref()) {
        Ok(value) => {
            if cli.quiet {
                return 0;
            }
            match (cli.check, input_file) {
                (true, Some(path)) => println!("{}: ok", path.display()),
                (true, None) => println!("ok"),
                (false, _) => println!("{:#?}", value),
            }
            0
        }
        Err(e) => {
            match input_file {
                Some(path) => eprintln!("{}: {}", path.display(), e.render()),
                None => eprintln!("Parse error: {}", e.render()),
            }
            1
        }
    }
}
