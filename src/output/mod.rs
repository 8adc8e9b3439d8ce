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

//! Writing assembled binaries to disk.
//!
//! The output is the raw assembled byte stream with no container around it;
//! the sound driver loads it at the base offset given to the assembler.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension used when no output path is given.
pub const DEFAULT_EXTENSION: &str = "bin";

/// Errors that can occur while writing output.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The output file could not be created or written.
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The output path for `input` when none is given: same name, `.bin` extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(DEFAULT_EXTENSION)
}

/// Write an assembled binary.
pub fn write_bin(code: &[u8], path: &Path) -> Result<(), OutputError> {
    let write = || -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(code)?;
        file.flush()
    };
    write().map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("music/Song.asm")),
            PathBuf::from("music/Song.bin")
        );
        assert_eq!(
            default_output_path(Path::new("song")),
            PathBuf::from("song.bin")
        );
    }

    #[test]
    fn test_write_bin() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.bin");
        write_bin(&[0xF2, 0x00, 0xE3], &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xF2, 0x00, 0xE3]);
    }

    #[test]
    fn test_write_bin_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.bin");
        let err = write_bin(&[0], &path).unwrap_err();
        assert!(err.to_string().contains("out.bin"));
    }
}
