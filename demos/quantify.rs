//! Example: building a DAFSA from a word list file and reporting its size.
//!
//! The word list holds one word per line, in sorted order. Blank lines and
//! lines starting with `#` are skipped. Optionally the automaton is written
//! back out as a JSON tree; an existing output file is left alone.
//!
//! Run with: cargo run --example quantify -- words.txt [out.json] [probe...]
//!
//! Set `RUST_LOG=debug` to see build summaries.

use std::env;
use std::process::ExitCode;

use dafsa::build_from_file;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: quantify <word-list> [out.json] [probe...]");
        return ExitCode::FAILURE;
    };

    let dafsa = match build_from_file(&path) {
        Ok(dafsa) => dafsa,
        Err(err) => {
            eprintln!("{path}: {err}");
            if let Some(source) = std::error::Error::source(&err) {
                eprintln!("  caused by: {source}");
            }
            return ExitCode::FAILURE;
        }
    };

    println!("{path}:");
    println!("{}", dafsa.stats());

    let mut probes: Vec<String> = args.collect();
    if probes.first().is_some_and(|arg| arg.ends_with(".json")) {
        let out = probes.remove(0);
        if let Err(err) = write_json(&dafsa, &out) {
            eprintln!("{out}: {err}");
            return ExitCode::FAILURE;
        }
        println!("\nwrote {out}");
    }

    if !probes.is_empty() {
        println!("\nLookups:");
    }
    for probe in &probes {
        let verdict = if dafsa.contains(probe.as_str()) {
            "word"
        } else if dafsa.has_prefix(probe.as_str()) {
            "prefix"
        } else {
            "no"
        };
        println!("  {probe}: {verdict}");
    }

    ExitCode::SUCCESS
}

/// Fails instead of overwriting an existing file.
#[cfg(feature = "serialization")]
fn write_json(dafsa: &dafsa::Dafsa, out: &str) -> Result<(), Box<dyn std::error::Error>> {
    dafsa::serialization::store_json(dafsa, out)?;
    Ok(())
}

#[cfg(not(feature = "serialization"))]
fn write_json(_: &dafsa::Dafsa, _: &str) -> Result<(), Box<dyn std::error::Error>> {
    Err("built without the `serialization` feature".into())
}
