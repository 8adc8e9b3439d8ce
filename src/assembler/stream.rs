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

//! Growable output buffer with a seekable write position.

/// The bytes produced by an assembly run.
///
/// Writes overwrite existing bytes when the position has been moved back,
/// and append otherwise. The logical address of the write position is the
/// position plus the base offset the song will be loaded at.
#[derive(Debug, Clone, Default)]
pub struct OutputStream {
    buffer: Vec<u8>,
    position: usize,
    base_offset: u32,
}

impl OutputStream {
    /// Create an empty stream that will be loaded at `base_offset`.
    pub fn new(base_offset: u32) -> Self {
        Self {
            buffer: Vec::new(),
            position: 0,
            base_offset,
        }
    }

    /// Write one byte at the current position.
    pub fn write_byte(&mut self, byte: u8) {
        if self.position < self.buffer.len() {
            self.buffer[self.position] = byte;
        } else {
            self.buffer.push(byte);
        }
        self.position += 1;
    }

    /// Current write position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Logical address of the write position.
    pub fn logical_address(&self) -> u32 {
        (self.position as u32).wrapping_add(self.base_offset)
    }

    pub fn base_offset(&self) -> u32 {
        self.base_offset
    }

    /// Move the write position, clamped to the end of the written data.
    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.buffer.len());
    }

    /// Move the write position to the end of the written data.
    pub fn seek_end(&mut self) {
        self.position = self.buffer.len();
    }

    /// Drop everything from `position` on and move there.
    pub fn truncate(&mut self, position: usize) {
        self.buffer.truncate(position);
        self.position = self.position.min(self.buffer.len());
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}
