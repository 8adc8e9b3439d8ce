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

//! Instructions whose operands were not all known on the first pass.

use super::context::SongState;
use crate::encoder::OpcodeInfo;
use crate::lexer::Instruction;

/// An instruction encoded with placeholder operands, to be re-encoded
/// once every label is known.
#[derive(Debug, Clone)]
pub struct DeferredInstruction {
    pub info: OpcodeInfo,
    pub instruction: Instruction,
    /// Stream offset the placeholder encoding starts at.
    pub output_offset: usize,
    /// Bytes written by the placeholder encoding.
    pub encoded_length: usize,
    /// Song state seen by the first encoding.
    pub song: SongState,
}

/// Deferred instructions in source order.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    entries: Vec<DeferredInstruction>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: DeferredInstruction) {
        tracing::debug!(
            mnemonic = %entry.instruction.mnemonic.text,
            offset = entry.output_offset,
            length = entry.encoded_length,
            "deferring instruction with unresolved operands"
        );
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for DeferredQueue {
    type Item = DeferredInstruction;
    type IntoIter = std::vec::IntoIter<DeferredInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
