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

//! End-to-end CLI integration tests.

use std::process::{Command, Output};
use tempfile::TempDir;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_smps2bin"))
}

fn write_source(dir: &TempDir, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, source).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    cargo_bin()
        .args(args)
        .arg("--no-color")
        .output()
        .expect("Failed to execute command")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_flag() {
    let output = cargo_bin().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("smps2bin"));
    assert!(stdout.contains("--driver"));
    assert!(stdout.contains("--offset"));
    assert!(stdout.contains("--keep-going"));
}

#[test]
fn test_version_flag() {
    let output = cargo_bin().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("smps2bin"));
    assert!(stdout.contains("0.1.0"));
}

#[test]
fn test_assemble_to_default_output() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "song.asm", "Song:\tsmpsHeaderStartSong 2\n\tsmpsStop\n");

    let output = run(&[input.to_str().unwrap(), "-d", "3"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let bin = dir.path().join("song.bin");
    assert_eq!(std::fs::read(bin).unwrap(), vec![0xF2]);
}

#[test]
fn test_assemble_with_output_and_offset() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "song.asm", "\tdc.b 0\nHere:\tsmpsJump Here\n");
    let out = dir.path().join("custom.bin");

    let output = run(&[
        input.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--driver",
        "2",
        "--offset",
        "$1380",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(std::fs::read(out).unwrap(), vec![0x00, 0xF6, 0x81, 0x13]);
}

#[test]
fn test_unsupported_flag_writes_no_output() {
    let dir = TempDir::new().unwrap();
    let input = write_source(
        &dir,
        "ssgeg.asm",
        "Song:\tsmpsHeaderStartSong 3\n\tsmpsSSGEG $00, $00, $00, $00\n",
    );

    let output = run(&[input.to_str().unwrap(), "-d", "1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("E203"));
    assert!(!dir.path().join("ssgeg.bin").exists());
}

#[test]
fn test_failed_run_keeps_previous_output() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "song.asm", "\tdc.b 256\n");
    let bin = dir.path().join("song.bin");
    std::fs::write(&bin, [0xAA]).unwrap();

    let output = run(&[input.to_str().unwrap(), "-d", "2"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("E202"));
    assert_eq!(std::fs::read(&bin).unwrap(), vec![0xAA]);
}

#[test]
fn test_keep_going_reports_all_errors() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "bad.asm", "\tdc.b 256\n\tsmpsDance\n");

    let output = run(&[input.to_str().unwrap(), "-d", "2", "--keep-going"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("E202"));
    assert!(err.contains("E200"));
    assert!(err.contains("2 errors"));
}

#[test]
fn test_warnings_do_not_fail() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "song.asm", "\tsmpsHeaderStartSong 1\n\tsmpsStopSpecial\n");

    let output = run(&[input.to_str().unwrap(), "-d", "2"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("W003"));
    assert_eq!(std::fs::read(dir.path().join("song.bin")).unwrap(), vec![0xF2]);
}

#[test]
fn test_missing_input_file() {
    let output = run(&[
        "/nonexistent/song.asm",
        "-d",
        "2",
    ]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_unwritable_output() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "song.asm", "\tsmpsStop\n");
    let out = dir.path().join("missing").join("song.bin");

    let output = run(&[input.to_str().unwrap(), "-o", out.to_str().unwrap(), "-d", "2"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_invalid_driver_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "song.asm", "\tsmpsStop\n");

    let output = run(&[input.to_str().unwrap(), "-d", "6"]);
    assert_eq!(output.status.code(), Some(2));

    let output = run(&[input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_offset_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "song.asm", "\tsmpsStop\n");

    let output = run(&[input.to_str().unwrap(), "-d", "2", "--offset", "$xyz"]);
    assert_eq!(output.status.code(), Some(2));
}
