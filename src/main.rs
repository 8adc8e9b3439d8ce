// smps2bin - An SMPS2ASM music script assembler for Mega Drive sound drivers
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! smps2bin CLI
//!
//! Assembles an SMPS2ASM music script into a binary for one of the SMPS
//! sound drivers.

use clap::Parser;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use smps2bin::error::RenderOptions;
use smps2bin::output::{default_output_path, write_bin};
use smps2bin::watch::SourceWatcher;
use smps2bin::{assemble, format_error, format_warning, AssemblerOptions, DriverVersion, ErrorPolicy};

const EXIT_ASSEMBLY: u8 = 1;
const EXIT_READ: u8 = 3;
const EXIT_WRITE: u8 = 4;
const EXIT_WATCH: u8 = 6;

/// smps2bin - An SMPS2ASM music script assembler
#[derive(Parser, Debug)]
#[command(name = "smps2bin")]
#[command(version)]
#[command(about = "Assemble SMPS2ASM music scripts for the Mega Drive SMPS sound drivers")]
#[command(long_about = r#"
smps2bin assembles SMPS2ASM music scripts into the binary song format of
the Sega Mega Drive SMPS sound drivers. Songs written for one driver can be
assembled for any other; tempos, pitches, voices and coordination flags
are converted.

Drivers:
  1  Sonic 1
  2  Sonic 2
  3  Sonic 3 & Knuckles
  4  Sonic 3D Blast
  5  Flamewing's extended S&K driver

Example usage:
  smps2bin song.asm -d 3
  smps2bin song.asm -d 2 --offset $1380 -o song.bin
  smps2bin song.asm -d 5 --watch
"#)]
struct Cli {
    /// SMPS2ASM source file
    input: PathBuf,

    /// Output file (defaults to INPUT with a .bin extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target driver (1-5)
    #[arg(short, long)]
    driver: DriverVersion,

    /// Address the song is loaded at ($1380, 0x1380 or decimal)
    #[arg(long, default_value = "0", value_parser = parse_offset)]
    offset: u32,

    /// Report every error instead of stopping at the first one
    #[arg(long)]
    keep_going: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Re-assemble whenever the input changes
    #[arg(short, long)]
    watch: bool,

    /// Disable coloured diagnostics
    #[arg(long)]
    no_color: bool,
}

/// Parse an address given as `$hex`, `0xhex` or decimal.
fn parse_offset(text: &str) -> Result<u32, String> {
    let text = text.trim();
    let parsed = if let Some(hex) = text.strip_prefix('$') {
        u32::from_str_radix(hex, 16)
    } else if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        text.parse()
    };
    parsed.map_err(|e| format!("invalid offset '{}': {}", text, e))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));
    let options = AssemblerOptions::new(cli.driver)
        .with_base_offset(cli.offset)
        .with_error_policy(if cli.keep_going {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Abort
        });
    let render = RenderOptions {
        color: !cli.no_color && std::io::stderr().is_terminal(),
    };

    tracing::debug!(
        input = %cli.input.display(),
        output = %output_path.display(),
        driver = %cli.driver,
        offset = cli.offset,
        "starting"
    );

    let status = build(&cli.input, &output_path, &options, render);
    if !cli.watch {
        return status;
    }

    let watcher = match SourceWatcher::new(&cli.input) {
        Ok(watcher) => watcher,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_WATCH);
        }
    };
    println!("Watching {} for changes (Ctrl+C to stop)", cli.input.display());

    loop {
        if let Err(e) = watcher.wait_for_change() {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_WATCH);
        }
        println!();
        println!("Change detected, re-assembling...");
        // Failures are reported and the watch continues.
        let _ = build(&cli.input, &output_path, &options, render);
    }
}

/// Read, assemble and write one binary.
fn build(input: &Path, output: &Path, options: &AssemblerOptions, render: RenderOptions) -> ExitCode {
    let filename = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("<input>");

    let source = match std::fs::read_to_string(input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: Cannot read {}: {}", input.display(), e);
            return ExitCode::from(EXIT_READ);
        }
    };

    let assembly = match assemble(&source, options) {
        Ok(assembly) => assembly,
        Err(errors) => {
            let count = errors.len();
            for error in errors {
                eprint!("{}", format_error(&error, &source, Some(filename), render));
            }
            eprintln!(
                "Assembly failed with {} error{}, no output written",
                count,
                if count == 1 { "" } else { "s" }
            );
            return ExitCode::from(EXIT_ASSEMBLY);
        }
    };

    for warning in &assembly.warnings {
        eprint!("{}", format_warning(warning, &source, Some(filename), render));
    }

    if let Err(e) = write_bin(&assembly.code, output) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_WRITE);
    }

    println!(
        "Assembled {} -> {} ({} bytes, driver {})",
        filename,
        output.display(),
        assembly.code.len(),
        options.target
    );
    ExitCode::SUCCESS
}
