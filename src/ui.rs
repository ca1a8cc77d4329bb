#![forbid(unsafe_code)]

use crate::config::{PackConfig, DEFAULT_LEVEL};
use crate::pak;
use inquire::{Confirm, Text};
use std::path::PathBuf;

fn prompt_err(e: inquire::InquireError) -> pak::PakError {
    pak::PakError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

fn optional_path(s: &str) -> Option<PathBuf> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(PathBuf::from(s))
    }
}

fn parse_level(s: &str) -> i32 {
    s.trim().parse::<i32>().unwrap_or(DEFAULT_LEVEL).clamp(1, 22)
}

pub fn run(verbose: bool) -> pak::PakResult<()> {
    println!("pakker wizard\n");

    let source = Text::new("Input file, folder or pattern")
        .with_default("./assets")
        .prompt()
        .map_err(prompt_err)?;

    let destination = Text::new("Output file or folder (no wildcards)")
        .with_default("./packed")
        .prompt()
        .map_err(prompt_err)?;

    let recursive = Confirm::new("Recurse into subfolders?")
        .with_default(false)
        .prompt()
        .map_err(prompt_err)?;

    let test_dates = Confirm::new("Skip files whose output is newer?")
        .with_default(true)
        .prompt()
        .map_err(prompt_err)?;

    let exceptions_raw = Text::new("Exceptions file (optional)")
        .with_default("")
        .prompt()
        .map_err(prompt_err)?;
    let exceptions = optional_path(&exceptions_raw);

    let level_raw = Text::new("Zstd level (1..=22)")
        .with_default(&DEFAULT_LEVEL.to_string())
        .prompt()
        .map_err(prompt_err)?;
    let level = parse_level(&level_raw);

    println!("\nPack summary:");
    println!("  input     : {source}");
    println!("  output    : {destination}");
    println!("  recursive : {recursive}");
    println!("  test dates: {test_dates}");
    match &exceptions {
        Some(p) => println!("  exceptions: {}", p.display()),
        None => println!("  exceptions: <none>"),
    }
    println!("  zstd      : level {level}");

    let proceed = Confirm::new("Proceed?")
        .with_default(true)
        .prompt()
        .map_err(prompt_err)?;
    if !proceed {
        return Ok(());
    }

    let config = PackConfig {
        recursive,
        test_dates,
        verbose,
        exceptions,
        ..PackConfig::default()
    }
    .with_level(level);

    let report = pak::pack(&source, &destination, &config)?;
    println!("\n{} file(s) written, {} packed", report.written, report.packed);
    Ok(())
}
