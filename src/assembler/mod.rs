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

//! Two-pass assembly.
//!
//! Pass one walks the source in order, binding labels at the current logical
//! address and encoding every instruction. Instructions with an argument
//! that names a label not yet seen are encoded with zero placeholders and
//! queued. Pass two revisits the queue in source order: each entry is
//! re-encoded in place with the song state it originally saw, and must write
//! exactly as many bytes as it did the first time.
//!
//! FM voice setters write no bytes, so a setter with a forward reference
//! only leaves a placeholder in the voice being built. The closing
//! `smpsVcTotalLevel` is deferred while any such placeholder is live and
//! re-runs those setters before packing the voice on pass two.

pub mod context;
mod deferred;
pub mod stream;

pub use context::{AssemblyContext, SongState};
pub use stream::OutputStream;

use deferred::{DeferredInstruction, DeferredQueue};

use crate::driver::DriverVersion;
use crate::encoder::{Encoder, Opcode, OpcodeInfo, OpcodeTable, Operands};
use crate::error::{CompileError, CompileWarning, ErrorCode, Errors, Span};
use crate::lexer::{Instruction, SourceLine};
use crate::symbols::{undefined_symbol_error, Resolution, Symbol, SymbolTable};

/// What to do when an instruction fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop at the first error.
    #[default]
    Abort,
    /// Skip the failing instruction and report every error at the end.
    Continue,
}

/// Settings for one assembly run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblerOptions {
    pub target: DriverVersion,
    /// Logical address of the first output byte.
    pub base_offset: u32,
    pub error_policy: ErrorPolicy,
}

impl AssemblerOptions {
    pub fn new(target: DriverVersion) -> Self {
        Self {
            target,
            base_offset: 0,
            error_policy: ErrorPolicy::Abort,
        }
    }

    pub fn with_base_offset(mut self, base_offset: u32) -> Self {
        self.base_offset = base_offset;
        self
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }
}

/// The result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub code: Vec<u8>,
    pub warnings: Vec<CompileWarning>,
    /// How many instructions needed the second pass.
    pub deferred: usize,
}

/// Drives both passes over a tokenized source.
#[derive(Debug)]
pub struct Assembler {
    options: AssemblerOptions,
    table: OpcodeTable,
}

/// Per-run mutable state.
struct Run {
    context: AssemblyContext,
    symbols: SymbolTable,
    warnings: Vec<CompileWarning>,
    deferred: DeferredQueue,
    errors: Errors,
}

impl Assembler {
    pub fn new(options: AssemblerOptions) -> Self {
        Self {
            options,
            table: OpcodeTable::new(),
        }
    }

    /// Assemble `lines` into a binary.
    ///
    /// Any error, under either policy, means no binary.
    pub fn run(&self, lines: &[SourceLine]) -> Result<Assembly, Errors> {
        let target = self.options.target;
        let mut run = Run {
            context: AssemblyContext::new(target, self.options.base_offset),
            symbols: SymbolTable::with_defaults(target)?,
            warnings: Vec::new(),
            deferred: DeferredQueue::new(),
            errors: Errors::new(),
        };

        tracing::debug!(driver = %target, lines = lines.len(), "pass one");
        for line in lines {
            if let Some(label) = &line.label {
                let address = run.context.logical_address();
                if let Err(error) = run
                    .symbols
                    .define(Symbol::label(label.text.as_str(), address, label.span))
                {
                    self.fail(&mut run, error)?;
                }
            }

            if let Some(instruction) = &line.instruction {
                tracing::trace!(
                    line = line.line,
                    mnemonic = %instruction.mnemonic.text,
                    address = run.context.logical_address(),
                    "encoding"
                );
                if let Err(error) = self.first_pass(&mut run, instruction) {
                    self.fail(&mut run, error)?;
                }
            }
        }

        let deferred = std::mem::take(&mut run.deferred);
        let deferred_count = deferred.len();
        if !deferred.is_empty() {
            tracing::debug!(deferred = deferred_count, "pass two");
        }
        for entry in deferred {
            if let Err(error) = self.second_pass(&mut run, entry) {
                self.fail(&mut run, error)?;
            }
        }
        run.context.stream.seek_end();

        if run.errors.has_errors() {
            return Err(run.errors);
        }

        tracing::debug!(bytes = run.context.stream.len(), "assembly finished");
        Ok(Assembly {
            code: run.context.stream.into_bytes(),
            warnings: run.warnings,
            deferred: deferred_count,
        })
    }

    /// Record `error`; under [`ErrorPolicy::Abort`] end the run with it.
    fn fail(&self, run: &mut Run, error: CompileError) -> Result<(), Errors> {
        tracing::debug!(code = error.code_str(), "{}", error.message);
        run.errors.push(error);
        match self.options.error_policy {
            ErrorPolicy::Abort => Err(std::mem::take(&mut run.errors)),
            ErrorPolicy::Continue => Ok(()),
        }
    }

    fn first_pass(&self, run: &mut Run, instruction: &Instruction) -> Result<(), CompileError> {
        let info = self.lookup(instruction)?;
        let offset = run.context.stream.position();

        run.symbols.clear_undefined();
        let (mut operands, _) = resolve_operands(&mut run.symbols, instruction);
        if info.opcode == Opcode::VcTotalLevel && run.context.song.has_pending_voice() {
            operands = operands.into_provisional();
        }
        let song = operands
            .is_provisional()
            .then(|| run.context.song.clone());

        let result = Encoder::new(
            &mut run.context,
            &run.symbols,
            &mut run.warnings,
            info.mnemonic,
            instruction.span(),
        )
        .encode(&info, &operands);

        if let Err(error) = result {
            run.context.stream.truncate(offset);
            return Err(error);
        }

        if info.opcode.is_voice_setter() {
            run.context
                .song
                .record_voice_setter(info, instruction, operands.is_provisional());
        }

        if let Some(song) = song {
            run.deferred.push(DeferredInstruction {
                info,
                instruction: instruction.clone(),
                output_offset: offset,
                encoded_length: run.context.stream.position() - offset,
                song,
            });
        }
        Ok(())
    }

    fn second_pass(&self, run: &mut Run, entry: DeferredInstruction) -> Result<(), CompileError> {
        run.context.stream.seek(entry.output_offset);
        run.context.song = entry.song;

        run.symbols.clear_undefined();
        let (operands, undefined_span) = resolve_operands(&mut run.symbols, &entry.instruction);
        if let Some(name) = run.symbols.undefined() {
            let span = undefined_span.unwrap_or_else(|| entry.instruction.span());
            return Err(undefined_symbol_error(name, span)
                .with_hint("define the label somewhere in the file"));
        }
        if entry.info.opcode == Opcode::VcTotalLevel {
            self.replay_voice_setters(run)?;
        }

        Encoder::new(
            &mut run.context,
            &run.symbols,
            &mut run.warnings,
            entry.info.mnemonic,
            entry.instruction.span(),
        )
        .encode(&entry.info, &operands)?;

        let written = run.context.stream.position() - entry.output_offset;
        if written != entry.encoded_length {
            return Err(CompileError::new(
                ErrorCode::EncodingLengthMismatch,
                format!(
                    "{} encoded to {} bytes once its labels were known, but {} were reserved",
                    entry.info.mnemonic, written, entry.encoded_length
                ),
                entry.instruction.span(),
            ));
        }
        Ok(())
    }

    /// Re-run the setters that left placeholders in the voice being closed.
    fn replay_voice_setters(&self, run: &mut Run) -> Result<(), CompileError> {
        let setters = std::mem::take(&mut run.context.song.pending_voice);
        for setter in &setters {
            run.symbols.clear_undefined();
            let (operands, _) = resolve_operands(&mut run.symbols, &setter.instruction);
            if operands.is_provisional() {
                // Reported by the setter's own queue entry.
                continue;
            }
            tracing::trace!(mnemonic = setter.info.mnemonic, "replaying voice setter");
            Encoder::new(
                &mut run.context,
                &run.symbols,
                &mut run.warnings,
                setter.info.mnemonic,
                setter.instruction.span(),
            )
            .encode(&setter.info, &operands)?;
        }
        Ok(())
    }

    fn lookup(&self, instruction: &Instruction) -> Result<OpcodeInfo, CompileError> {
        let mnemonic = &instruction.mnemonic;
        self.table.lookup(&mnemonic.text).copied().ok_or_else(|| {
            CompileError::new(
                ErrorCode::UnknownInstruction,
                format!("Unknown instruction '{}'", mnemonic.text),
                mnemonic.span,
            )
        })
    }
}

/// Resolve every argument of `instruction`.
///
/// Unresolved arguments become zero and mark the operands provisional. The
/// span of the last unresolved argument is returned with them.
fn resolve_operands(symbols: &mut SymbolTable, instruction: &Instruction) -> (Operands, Option<Span>) {
    let mut values = Vec::with_capacity(instruction.args.len());
    let mut undefined = None;
    for arg in &instruction.args {
        match symbols.resolve(&arg.text) {
            Resolution::Value(value) => values.push(value),
            Resolution::Undefined(_) => {
                undefined = Some(arg.span);
                values.push(0);
            }
        }
    }
    (Operands::new(values, undefined.is_some()), undefined)
}
