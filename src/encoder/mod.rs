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

//! Opcode lowering.
//!
//! An [`Encoder`] is created for each instruction. It borrows the run's
//! [`AssemblyContext`] and writes the bytes for one mnemonic, depending on
//! the target driver and on the source driver declared by the song header.
//! The work is split over a few extension traits:
//! - [`EmitHelpers`] for byte, word and pointer emission
//! - [`HeaderEmitter`] for song and SFX headers
//! - [`FlagEmitter`] for coordination flags
//! - [`VoiceEmitter`] for FM voice definitions

pub mod emit;
pub mod flags;
pub mod header;
pub mod opcodes;
pub mod table;
pub mod voice;

pub use emit::EmitHelpers;
pub use flags::FlagEmitter;
pub use header::HeaderEmitter;
pub use table::{Opcode, OpcodeInfo, OpcodeTable};
pub use voice::{PackedVoice, VoiceAccumulator, VoiceEmitter};

use crate::assembler::AssemblyContext;
use crate::driver::DriverVersion;
use crate::error::{CompileError, CompileWarning, ErrorCode, Result, Span, WarningCode};
use crate::symbols::SymbolTable;

/// Resolved instruction arguments.
///
/// When any argument was still undefined on the first pass, the unresolved
/// ones are zero and the set is marked provisional. Encoders then skip
/// checks that depend on the real values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operands {
    values: Vec<u32>,
    provisional: bool,
}

impl Operands {
    pub fn new(values: Vec<u32>, provisional: bool) -> Self {
        Self {
            values,
            provisional,
        }
    }

    /// Fully resolved operands.
    pub fn resolved(values: Vec<u32>) -> Self {
        Self::new(values, false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_provisional(&self) -> bool {
        self.provisional
    }

    /// The same values, marked provisional.
    pub fn into_provisional(self) -> Self {
        Self::new(self.values, true)
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Operand `index`, if present.
    pub fn get(&self, index: usize) -> Option<u32> {
        self.values.get(index).copied()
    }

    /// Operand `index`; zero when absent. The operand count is checked
    /// against the mnemonic table before any encoder runs.
    pub fn value(&self, index: usize) -> u32 {
        self.get(index).unwrap_or(0)
    }

    /// Low byte of operand `index`.
    pub fn byte(&self, index: usize) -> u8 {
        self.value(index) as u8
    }

    /// Low word of operand `index`.
    pub fn word(&self, index: usize) -> u16 {
        self.value(index) as u16
    }
}

/// Lowers one instruction into the output stream.
pub struct Encoder<'a> {
    pub(crate) context: &'a mut AssemblyContext,
    pub(crate) symbols: &'a SymbolTable,
    pub(crate) warnings: &'a mut Vec<CompileWarning>,
    pub(crate) mnemonic: &'a str,
    pub(crate) span: Span,
    pub(crate) provisional: bool,
}

impl<'a> Encoder<'a> {
    pub fn new(
        context: &'a mut AssemblyContext,
        symbols: &'a SymbolTable,
        warnings: &'a mut Vec<CompileWarning>,
        mnemonic: &'a str,
        span: Span,
    ) -> Self {
        Self {
            context,
            symbols,
            warnings,
            mnemonic,
            span,
            provisional: false,
        }
    }

    /// Encode `info` with `operands` at the current stream position.
    pub fn encode(&mut self, info: &OpcodeInfo, operands: &Operands) -> Result<()> {
        if operands.len() < info.min_operands {
            return Err(self
                .error(
                    ErrorCode::MissingOperand,
                    format!(
                        "{} needs at least {} operand{}, got {}",
                        info.mnemonic,
                        info.min_operands,
                        if info.min_operands == 1 { "" } else { "s" },
                        operands.len()
                    ),
                )
                .with_hint("separate operands with commas"));
        }

        self.provisional = operands.is_provisional();
        let ops = operands;

        match info.opcode {
            Opcode::DcB => self.emit_raw_bytes(ops),

            Opcode::HeaderStartSong => self.start_song(ops),
            Opcode::HeaderVoice => self.header_voice(ops),
            Opcode::HeaderVoiceNull => self.header_voice_null(),
            Opcode::HeaderVoiceUvb => self.header_voice_uvb(),
            Opcode::HeaderChan => self.header_chan(ops),
            Opcode::HeaderTempo => self.header_tempo(ops),
            Opcode::HeaderDac => self.header_dac(ops),
            Opcode::HeaderFm => self.header_fm(ops),
            Opcode::HeaderPsg => self.header_psg(ops),
            Opcode::HeaderTempoSfx | Opcode::HeaderChanSfx => {
                self.emit_byte(ops.byte(0));
                Ok(())
            }
            Opcode::HeaderSfxChannel => self.header_sfx_channel(ops),

            opcode if opcode.is_voice_setter() => self.set_voice_parameter(opcode, ops),
            Opcode::VcTotalLevel => self.finish_voice(ops),

            opcode => self.coordination_flag(opcode, ops),
        }
    }

    /// `dc.b`: one byte per operand.
    fn emit_raw_bytes(&mut self, ops: &Operands) -> Result<()> {
        if let Some(&value) = ops.values().iter().find(|&&v| v > 0xFF) {
            return Err(self
                .error(
                    ErrorCode::ByteOverflow,
                    format!("dc.b value ${:X} does not fit into a byte", value),
                )
                .with_hint("dc.b values must be in the range 0-255"));
        }
        for &value in ops.values() {
            self.emit_byte(value as u8);
        }
        Ok(())
    }

    pub(crate) fn target(&self) -> DriverVersion {
        self.context.target
    }

    /// The song's source driver.
    pub(crate) fn source(&self) -> Result<DriverVersion> {
        self.context
            .song
            .source
            .ok_or_else(|| self.missing_header())
    }

    pub(crate) fn format_version(&self) -> Result<u32> {
        self.context
            .song
            .format_version
            .ok_or_else(|| self.missing_header())
    }

    pub(crate) fn song_start(&self) -> Result<u32> {
        self.context
            .song
            .song_start
            .ok_or_else(|| self.missing_header())
    }

    fn missing_header(&self) -> CompileError {
        self.error(
            ErrorCode::MissingSongHeader,
            format!("{} used before smpsHeaderStartSong", self.mnemonic),
        )
        .with_hint("start the song with smpsHeaderStartSong <driver>")
    }

    pub(crate) fn error(&self, code: ErrorCode, message: impl Into<String>) -> CompileError {
        CompileError::new(code, message, self.span)
    }

    /// Error for an opcode the target driver has no equivalent of.
    pub(crate) fn unsupported(&self) -> CompileError {
        self.error(
            ErrorCode::UnsupportedInDriver,
            format!(
                "{} is not supported by the {} driver",
                self.mnemonic,
                self.target().name()
            ),
        )
    }

    /// Record a warning unless the operands are provisional.
    pub(crate) fn warn(&mut self, code: WarningCode, message: impl Into<String>) {
        if !self.provisional {
            self.warnings
                .push(CompileWarning::new(code, message, self.span));
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Encode single instructions against a fresh context.

    use super::*;

    pub struct Harness {
        pub context: AssemblyContext,
        pub symbols: SymbolTable,
        pub warnings: Vec<CompileWarning>,
        table: OpcodeTable,
    }

    impl Harness {
        pub fn new(target: u32) -> Self {
            let target = DriverVersion::new(target).unwrap();
            Self {
                context: AssemblyContext::new(target, 0),
                symbols: SymbolTable::with_defaults(target).unwrap(),
                warnings: Vec::new(),
                table: OpcodeTable::new(),
            }
        }

        /// A harness whose song header declares `source`.
        pub fn song(target: u32, source: u32) -> Self {
            let mut harness = Self::new(target);
            harness.run("smpsHeaderStartSong", &[source]).unwrap();
            harness
        }

        pub fn run_with(&mut self, mnemonic: &str, operands: Operands) -> Result<Vec<u8>> {
            let start = self.context.stream.position();
            let info = *self.table.lookup(mnemonic).unwrap();
            Encoder::new(
                &mut self.context,
                &self.symbols,
                &mut self.warnings,
                mnemonic,
                Span::default(),
            )
            .encode(&info, &operands)?;
            Ok(self.context.stream.as_bytes()[start..self.context.stream.position()].to_vec())
        }

        pub fn run(&mut self, mnemonic: &str, values: &[u32]) -> Result<Vec<u8>> {
            self.run_with(mnemonic, Operands::resolved(values.to_vec()))
        }
    }
}
