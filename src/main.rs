//! Main entry point for the zipseek CLI application.
//!
//! Lists the file entries of a ZIP archive or streams selected entries to
//! stdout, reading only the Central Directory and the requested payloads.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};

use zipseek::{Cli, Index};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let index = Index::open(&cli.file).with_context(|| format!("cannot index {}", cli.file))?;

    if cli.is_listing() {
        list_files(&index, cli.verbose);
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    for name in &cli.entries {
        if cli.print_names {
            writeln!(stdout, "--- {name} ---")?;
        }
        let mut reader = zipseek::open_zip_entry(&index, name)?;
        io::copy(&mut reader, &mut stdout)
            .with_context(|| format!("cannot read {name} from {}", cli.file))?;
    }
    stdout.flush()?;

    Ok(())
}

/// Print entry names, or a table with offsets, sizes and methods in verbose mode.
fn list_files(index: &Index, verbose: bool) {
    if !verbose {
        for name in index.get_entries() {
            println!("{name}");
        }
        return;
    }

    println!(
        "{:>10}  {:>10}  {:>10}  {:>7}  Name",
        "Offset", "Size", "Length", "Method"
    );
    println!("{}", "-".repeat(60));

    let mut total_compressed = 0u64;
    let mut total_uncompressed = 0u64;
    for name in index.get_entries() {
        let entry = index.find_zip_entry(name);
        println!(
            "{:>10}  {:>10}  {:>10}  {:>7}  {}",
            entry.offset, entry.comp_length, entry.uncomp_length, entry.method(), name
        );
        total_compressed += entry.comp_length as u64;
        total_uncompressed += entry.uncomp_length as u64;
    }

    println!("{}", "-".repeat(60));
    println!(
        "{:>10}  {:>10}  {:>10}  {:>7}  {} files",
        "",
        total_compressed,
        total_uncompressed,
        "",
        index.len()
    );
}
