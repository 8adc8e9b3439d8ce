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

//! FM voice definitions.
//!
//! The `smpsVc*` setters only fill a [`VoiceAccumulator`]; the closing
//! `smpsVcTotalLevel` packs the accumulated parameters into the 25-byte
//! voice layout the YM2612 drivers load.
//!
//! Setters and the closing instruction may name labels defined later. The
//! assembler then re-runs them on the second pass, so a provisional pack
//! only has to get the length right.

use super::{Encoder, EmitHelpers, Opcode, Operands};
use crate::convert::{algorithm_tl_masks, tl_mask_conflict};
use crate::driver::{DriverVersion, FamilyCrossing};
use crate::error::{ErrorCode, Result, WarningCode};

/// Size of a packed FM voice.
pub const VOICE_SIZE: usize = 25;

/// Per-operator values, operator 1 first.
type PerOperator = [u32; 4];

/// FM parameters collected by the voice setters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceAccumulator {
    pub feedback: u32,
    pub algorithm: u32,
    pub unused_bits: u32,
    pub d1r_unknown: PerOperator,
    pub detune: PerOperator,
    pub coarse_freq: PerOperator,
    pub rate_scale: PerOperator,
    pub attack_rate: PerOperator,
    /// Amplitude modulation bits, already shifted into place.
    pub amp_mod: PerOperator,
    pub decay_rate1: PerOperator,
    pub decay_rate2: PerOperator,
    pub decay_level: PerOperator,
    pub release_rate: PerOperator,
}

/// A voice ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedVoice {
    pub bytes: [u8; VOICE_SIZE],
    /// The raw TL bytes disagree with the algorithm's carrier layout.
    pub tl_conflict: bool,
}

impl VoiceAccumulator {
    /// Pack the voice with its total levels for `target`.
    pub fn pack(
        &self,
        total_levels: PerOperator,
        source: DriverVersion,
        target: DriverVersion,
        format_version: u32,
    ) -> PackedVoice {
        let mut total_levels = total_levels;
        let mut masks = if format_version == 0 {
            algorithm_tl_masks(self.algorithm)
        } else {
            [0; 4]
        };
        let mut tl_conflict = false;

        match FamilyCrossing::between(source, target) {
            FamilyCrossing::OldToNew => {
                masks = algorithm_tl_masks(self.algorithm);
                for tl in &mut total_levels {
                    *tl &= 0x7F;
                }
            }
            FamilyCrossing::NewToOld => {
                tl_conflict = tl_mask_conflict(total_levels, self.algorithm);
            }
            FamilyCrossing::None => {}
        }

        let order: [usize; 4] = if target == DriverVersion::SONIC_2 {
            [3, 1, 2, 0]
        } else {
            [3, 2, 1, 0]
        };

        let mut bytes = [0u8; VOICE_SIZE];
        bytes[0] = (self.unused_bits << 6)
            .wrapping_add(self.feedback << 3)
            .wrapping_add(self.algorithm) as u8;

        let rows: [&dyn Fn(usize) -> u32; 6] = [
            &|op| (self.detune[op] << 4).wrapping_add(self.coarse_freq[op]),
            &|op| (self.rate_scale[op] << 6).wrapping_add(self.attack_rate[op]),
            &|op| self.amp_mod[op] | self.decay_rate1[op] | self.d1r_unknown[op],
            &|op| self.decay_rate2[op],
            &|op| (self.decay_level[op] << 4).wrapping_add(self.release_rate[op]),
            &|op| total_levels[op] | u32::from(masks[op]),
        ];
        for (row, value) in rows.iter().enumerate() {
            for (slot, &op) in order.iter().enumerate() {
                bytes[1 + row * 4 + slot] = value(op) as u8;
            }
        }

        PackedVoice { bytes, tl_conflict }
    }
}

/// Extension trait for the `smpsVc*` pseudo-instructions.
pub trait VoiceEmitter {
    /// Store one voice parameter; emits nothing.
    ///
    /// Provisional operands store their zero placeholders.
    fn set_voice_parameter(&mut self, opcode: Opcode, ops: &Operands) -> Result<()>;

    /// `smpsVcTotalLevel`: write the finished voice.
    fn finish_voice(&mut self, ops: &Operands) -> Result<()>;
}

impl VoiceEmitter for Encoder<'_> {
    fn set_voice_parameter(&mut self, opcode: Opcode, ops: &Operands) -> Result<()> {
        let four = [ops.value(0), ops.value(1), ops.value(2), ops.value(3)];
        let amp_shift = match opcode {
            Opcode::VcAmpMod if self.format_version()? == 0 => 5,
            Opcode::VcAmpMod => 7,
            _ => 0,
        };

        let voice = &mut self.context.song.voice;
        match opcode {
            Opcode::VcFeedback => voice.feedback = ops.value(0),
            Opcode::VcAlgorithm => voice.algorithm = ops.value(0),
            Opcode::VcUnusedBits => {
                voice.unused_bits = ops.value(0);
                voice.d1r_unknown = if ops.len() >= 5 {
                    [ops.value(1), ops.value(2), ops.value(3), ops.value(4)]
                } else {
                    [0; 4]
                };
            }
            Opcode::VcDetune => voice.detune = four,
            Opcode::VcCoarseFreq => voice.coarse_freq = four,
            Opcode::VcRateScale => voice.rate_scale = four,
            Opcode::VcAttackRate => voice.attack_rate = four,
            Opcode::VcAmpMod => voice.amp_mod = four.map(|am| am << amp_shift),
            Opcode::VcDecayRate1 => voice.decay_rate1 = four,
            Opcode::VcDecayRate2 => voice.decay_rate2 = four,
            Opcode::VcDecayLevel => voice.decay_level = four,
            Opcode::VcReleaseRate => voice.release_rate = four,
            other => {
                return Err(self.error(
                    ErrorCode::UnknownInstruction,
                    format!("{:?} is not a voice parameter", other),
                ))
            }
        }
        Ok(())
    }

    fn finish_voice(&mut self, ops: &Operands) -> Result<()> {
        let source = self.source()?;
        let format_version = self.format_version()?;
        let total_levels = [ops.value(0), ops.value(1), ops.value(2), ops.value(3)];
        let packed = self
            .context
            .song
            .voice
            .pack(total_levels, source, self.target(), format_version);

        if packed.tl_conflict {
            let index = self.context.song.voice_index;
            self.warn(
                WarningCode::TlMaskMismatch,
                format!(
                    "Voice ${:X} has TL bits that do not match its algorithm; it will not work in the {} driver",
                    index,
                    self.target().name()
                ),
            );
        }

        self.emit_bytes(&packed.bytes);
        self.context.song.voice_index += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::super::Operands;
    use super::*;
    use pretty_assertions::assert_eq;

    fn define_voice(h: &mut Harness, algorithm: u32) {
        h.run("smpsVcAlgorithm", &[algorithm]).unwrap();
        h.run("smpsVcFeedback", &[3]).unwrap();
        h.run("smpsVcUnusedBits", &[0]).unwrap();
        h.run("smpsVcDetune", &[1, 2, 3, 4]).unwrap();
        h.run("smpsVcCoarseFreq", &[5, 6, 7, 8]).unwrap();
        h.run("smpsVcRateScale", &[0, 1, 2, 3]).unwrap();
        h.run("smpsVcAttackRate", &[0x1F, 0x1E, 0x1D, 0x1C]).unwrap();
        h.run("smpsVcAmpMod", &[1, 0, 0, 0]).unwrap();
        h.run("smpsVcDecayRate1", &[1, 2, 3, 4]).unwrap();
        h.run("smpsVcDecayRate2", &[5, 6, 7, 8]).unwrap();
        h.run("smpsVcDecayLevel", &[1, 2, 3, 4]).unwrap();
        h.run("smpsVcReleaseRate", &[5, 6, 7, 8]).unwrap();
    }

    #[test]
    fn test_setters_emit_nothing() {
        let mut h = Harness::song(3, 3);
        define_voice(&mut h, 2);
        assert!(h.context.stream.is_empty());
        assert_eq!(h.context.song.voice.amp_mod, [0x20, 0, 0, 0]);
    }

    #[test]
    fn test_pack_operator_order() {
        let mut h = Harness::song(3, 3);
        define_voice(&mut h, 2);
        let bytes = h.run("smpsVcTotalLevel", &[0x10, 0x11, 0x12, 0x13]).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x1A, // feedback 3, algorithm 2
                0x48, 0x37, 0x26, 0x15, // DT/CF
                0xDC, 0x9D, 0x5E, 0x1F, // RS/AR
                0x04, 0x03, 0x02, 0x21, // AM/D1R
                0x08, 0x07, 0x06, 0x05, // D2R
                0x48, 0x37, 0x26, 0x15, // DL/RR
                0x13, 0x12, 0x11, 0x90, // TL, op1 masked
            ]
        );
        assert_eq!(h.context.song.voice_index, 1);
    }

    #[test]
    fn test_sonic2_swaps_middle_operators() {
        let mut h = Harness::song(2, 2);
        define_voice(&mut h, 2);
        let bytes = h.run("smpsVcTotalLevel", &[0x10, 0x11, 0x12, 0x13]).unwrap();
        assert_eq!(&bytes[1..5], &[0x48, 0x26, 0x37, 0x15]);
        assert_eq!(&bytes[21..25], &[0x13, 0x11, 0x12, 0x90]);
    }

    #[test]
    fn test_format_version_one_has_no_masks() {
        let mut h = Harness::new(3);
        h.run("smpsHeaderStartSong", &[3, 1]).unwrap();
        define_voice(&mut h, 7);
        h.run("smpsVcAmpMod", &[1, 0, 0, 0]).unwrap();
        assert_eq!(h.context.song.voice.amp_mod, [0x80, 0, 0, 0]);
        let bytes = h.run("smpsVcTotalLevel", &[0x10, 0x11, 0x12, 0x13]).unwrap();
        assert_eq!(&bytes[21..25], &[0x13, 0x12, 0x11, 0x10]);
    }

    #[test]
    fn test_old_to_new_forces_masks() {
        let mut h = Harness::new(3);
        h.run("smpsHeaderStartSong", &[1, 1]).unwrap();
        define_voice(&mut h, 7);
        let bytes = h.run("smpsVcTotalLevel", &[0x90, 0x91, 0x12, 0x13]).unwrap();
        assert_eq!(&bytes[21..25], &[0x93, 0x92, 0x91, 0x90]);
    }

    #[test]
    fn test_new_to_old_warns_on_tl_conflict() {
        let mut h = Harness::song(1, 3);
        define_voice(&mut h, 0);
        let bytes = h.run("smpsVcTotalLevel", &[0x10, 0x11, 0x92, 0x13]).unwrap();
        assert_eq!(bytes.len(), VOICE_SIZE);
        assert!(h.warnings.is_empty());

        define_voice(&mut h, 4);
        h.run("smpsVcTotalLevel", &[0x10, 0x11, 0x92, 0x13]).unwrap();
        assert_eq!(h.warnings.len(), 1);
        assert_eq!(h.warnings[0].code, WarningCode::TlMaskMismatch);
        assert!(h.warnings[0].message.contains("Voice $1"));
    }

    #[test]
    fn test_unused_bits_with_d1r_unknowns() {
        let mut h = Harness::song(3, 3);
        h.run("smpsVcUnusedBits", &[1, 0x40, 0, 0, 0]).unwrap();
        assert_eq!(h.context.song.voice.d1r_unknown, [0x40, 0, 0, 0]);
        h.run("smpsVcUnusedBits", &[1]).unwrap();
        assert_eq!(h.context.song.voice.d1r_unknown, [0; 4]);
    }

    #[test]
    fn test_provisional_voice_keeps_length_without_warnings() {
        let mut h = Harness::song(1, 3);
        define_voice(&mut h, 4);
        h.run_with("smpsVcFeedback", Operands::new(vec![0], true)).unwrap();
        assert_eq!(h.context.song.voice.feedback, 0);
        let bytes = h
            .run_with("smpsVcTotalLevel", Operands::new(vec![0x10, 0, 0x92, 0], true))
            .unwrap();
        assert_eq!(bytes.len(), VOICE_SIZE);
        assert!(h.warnings.is_empty());
    }
}
