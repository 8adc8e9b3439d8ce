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

//! Per-run assembly state.

use super::stream::OutputStream;
use crate::driver::DriverVersion;
use crate::encoder::{OpcodeInfo, VoiceAccumulator};
use crate::lexer::Instruction;

/// A voice setter that ran with placeholder operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVoiceSetter {
    pub info: OpcodeInfo,
    pub instruction: Instruction,
}

/// State established by `smpsHeaderStartSong` and the voice setters.
///
/// Deferred instructions snapshot this so a second-pass re-encode sees
/// what the first pass saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongState {
    /// Driver the song was written for.
    pub source: Option<DriverVersion>,
    /// SMPS2ASM format version the song uses.
    pub format_version: Option<u32>,
    /// Logical address of the song header.
    pub song_start: Option<u32>,
    /// FM voice parameters collected so far.
    pub voice: VoiceAccumulator,
    /// Number of voices finished since the song start.
    pub voice_index: u32,
    /// Setters whose values in `voice` are still placeholders.
    pub pending_voice: Vec<PendingVoiceSetter>,
}

impl SongState {
    /// Note that a voice setter ran. A setter overwrites every field an
    /// earlier setter of the same kind wrote, so only the latest one counts.
    pub fn record_voice_setter(
        &mut self,
        info: OpcodeInfo,
        instruction: &Instruction,
        provisional: bool,
    ) {
        self.pending_voice
            .retain(|pending| pending.info.opcode != info.opcode);
        if provisional {
            self.pending_voice.push(PendingVoiceSetter {
                info,
                instruction: instruction.clone(),
            });
        }
    }

    /// True while some voice field holds a placeholder.
    pub fn has_pending_voice(&self) -> bool {
        !self.pending_voice.is_empty()
    }
}

/// Everything an encoder may read or change during one run.
#[derive(Debug)]
pub struct AssemblyContext {
    pub target: DriverVersion,
    pub stream: OutputStream,
    pub song: SongState,
}

impl AssemblyContext {
    pub fn new(target: DriverVersion, base_offset: u32) -> Self {
        Self {
            target,
            stream: OutputStream::new(base_offset),
            song: SongState::default(),
        }
    }

    /// Logical address of the next byte to be written.
    pub fn logical_address(&self) -> u32 {
        self.stream.logical_address()
    }
}
