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

//! Emit helper methods for opcode lowering.
//!
//! Words and pointers are stored differently by the driver generations:
//! - Sonic 1 writes words big-endian, and pointers relative to the song
//!   start (tracks) or to the pointer itself (jumps)
//! - Sonic 2 onwards write words little-endian and absolute Z80 addresses

use super::opcodes::flags;
use super::Encoder;
use crate::error::{ErrorCode, Result};

/// Extension trait for low-level byte emission.
pub trait EmitHelpers {
    /// Emit a single byte.
    fn emit_byte(&mut self, byte: u8);

    /// Emit several bytes in order.
    fn emit_bytes(&mut self, bytes: &[u8]);

    /// Emit a 16-bit word in the target driver's byte order.
    fn emit_word(&mut self, word: u16);

    /// Emit a `$FF`-prefixed extended flag.
    fn emit_meta(&mut self, code: u8);

    /// Emit a pointer to a channel's track or to a voice bank.
    fn emit_channel_pointer(&mut self, location: u32) -> Result<()>;

    /// Emit the target of a jump, call or loop.
    fn emit_jump_target(&mut self, location: u32);

    /// Logical address of the next byte.
    fn logical_address(&self) -> u32;
}

impl EmitHelpers for Encoder<'_> {
    fn emit_byte(&mut self, byte: u8) {
        self.context.stream.write_byte(byte);
    }

    fn emit_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.emit_byte(byte);
        }
    }

    fn emit_word(&mut self, word: u16) {
        let bytes = if self.target().uses_absolute_pointers() {
            word.to_le_bytes()
        } else {
            word.to_be_bytes()
        };
        self.emit_bytes(&bytes);
    }

    fn emit_meta(&mut self, code: u8) {
        self.emit_bytes(&[flags::META, code]);
    }

    fn emit_channel_pointer(&mut self, location: u32) -> Result<()> {
        if self.target().uses_absolute_pointers() {
            self.emit_word(location as u16);
            return Ok(());
        }

        let song_start = self.song_start()?;
        if location < song_start && !self.provisional {
            return Err(self
                .error(
                    ErrorCode::TrackBeforeSongStart,
                    format!(
                        "Pointer to ${:04X} precedes the song start at ${:04X}",
                        location, song_start
                    ),
                )
                .with_hint("Sonic 1 stores track pointers relative to the song header"));
        }
        self.emit_word(location.wrapping_sub(song_start) as u16);
        Ok(())
    }

    fn emit_jump_target(&mut self, location: u32) {
        if self.target().uses_absolute_pointers() {
            self.emit_word(location as u16);
        } else {
            let relative = location
                .wrapping_sub(self.logical_address())
                .wrapping_sub(1);
            self.emit_word(relative as u16);
        }
    }

    fn logical_address(&self) -> u32 {
        self.context.logical_address()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::super::Operands;
    use crate::error::ErrorCode;

    #[test]
    fn test_word_order_by_target() {
        let mut s1 = Harness::new(1);
        assert_eq!(s1.run("smpsContinuousLoop", &[0x1234]).unwrap_err().code, ErrorCode::UnsupportedInDriver);
        assert_eq!(s1.run("smpsJump", &[0x0005]).unwrap(), vec![0xF6, 0x00, 0x03]);

        let mut s2 = Harness::new(2);
        assert_eq!(s2.run("smpsJump", &[0x1234]).unwrap(), vec![0xF6, 0x34, 0x12]);
    }

    #[test]
    fn test_sonic1_channel_pointer_relative_to_song_start() {
        let mut h = Harness::new(1);
        h.run("dc.b", &[0, 0]).unwrap();
        h.run("smpsHeaderStartSong", &[1]).unwrap();
        assert_eq!(h.run("smpsHeaderFM", &[0x12, 0, 0]).unwrap(), vec![0x00, 0x10, 0, 0]);
    }

    #[test]
    fn test_sonic1_track_before_song_start() {
        let mut h = Harness::new(1);
        h.run("dc.b", &[0, 0]).unwrap();
        h.run("smpsHeaderStartSong", &[1]).unwrap();
        let err = h.run("smpsHeaderFM", &[0x01, 0, 0]).unwrap_err();
        assert_eq!(err.code, ErrorCode::TrackBeforeSongStart);
    }

    #[test]
    fn test_provisional_pointer_skips_check() {
        let mut h = Harness::new(1);
        h.run("dc.b", &[0, 0]).unwrap();
        h.run("smpsHeaderStartSong", &[1]).unwrap();
        let bytes = h
            .run_with("smpsHeaderFM", Operands::new(vec![0, 0, 0], true))
            .unwrap();
        assert_eq!(bytes.len(), 4);
    }

    #[test]
    fn test_sonic1_pointer_without_header() {
        let mut h = Harness::new(1);
        let err = h.run("smpsHeaderFM", &[0, 0, 0]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingSongHeader);
    }
}
