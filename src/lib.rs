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

//! SMPS2ASM assembler library
//!
//! Assembles SMPS2ASM music scripts into the binary song format of the
//! Sega Mega Drive SMPS sound drivers (Sonic 1, Sonic 2, Sonic 3 & Knuckles,
//! Sonic 3D Blast and Flamewing's extended driver). A song written for one
//! driver can be assembled for another; the assembler converts tempos,
//! pitches, voices and coordination flags along the way.
//!
//! # Modules
//!
//! - [`error`] - Error and warning types, diagnostic rendering
//! - [`lexer`] - Splitting source lines into labels, mnemonics and arguments
//! - [`symbols`] - Symbol table, literals and the default dictionary
//! - [`driver`] - Driver versions and families
//! - [`convert`] - Cross-driver value conversions
//! - [`encoder`] - Per-mnemonic byte encoding
//! - [`assembler`] - Two-pass assembly with forward references
//! - [`output`] - Writing binaries
//! - [`watch`] - Re-assembly on file change
//!
//! # Example
//!
//! ```no_run
//! use smps2bin::{assemble, AssemblerOptions, DriverVersion};
//!
//! let source = "Song:\tsmpsHeaderStartSong 2\n\tsmpsStop\n";
//! let options = AssemblerOptions::new(DriverVersion::SONIC_3);
//! match assemble(source, &options) {
//!     Ok(assembly) => println!("{} bytes", assembly.code.len()),
//!     Err(errors) => eprintln!("{}", errors),
//! }
//! ```

pub mod assembler;
pub mod convert;
pub mod driver;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod output;
pub mod symbols;
pub mod watch;

pub use assembler::{Assembler, AssemblerOptions, Assembly, ErrorPolicy};
pub use driver::DriverVersion;
pub use error::{
    format_error, format_warning, CompileError, CompileWarning, ErrorCode, Errors, Result,
    Span, WarningCode,
};

/// The version of the assembler.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the assembler.
pub const NAME: &str = "smps2bin";

/// Assemble SMPS2ASM source text.
///
/// Runs the lexer and both assembly passes. On success the binary is
/// returned together with any warnings; on failure every recorded error is
/// returned and no binary is produced.
pub fn assemble(
    source: &str,
    options: &AssemblerOptions,
) -> std::result::Result<Assembly, Errors> {
    let lines = lexer::tokenize(source)?;
    Assembler::new(*options).run(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "smps2bin");
    }

    #[test]
    fn test_assemble_minimal_song() {
        let source = "Song:\tsmpsHeaderStartSong 2\n\tsmpsStop\n";
        let assembly = assemble(source, &AssemblerOptions::new(DriverVersion::SONIC_3)).unwrap();
        assert_eq!(assembly.code, vec![0xF2]);
        assert!(assembly.warnings.is_empty());
    }

    #[test]
    fn test_assemble_reports_lexer_errors() {
        let errors = assemble("\tdc.b 1 2\n", &AssemblerOptions::new(DriverVersion::SONIC_1))
            .unwrap_err();
        assert_eq!(errors.first().unwrap().code, ErrorCode::ExpectedComma);
    }
}
