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

//! Coordination flag encoding.
//!
//! Most flags are a fixed prefix followed by their operands as bytes; those
//! live in a table. The rest differ between the driver families.

use super::emit::EmitHelpers;
use super::header::HeaderEmitter;
use super::opcodes::{flags, meta, DEFAULT_MOD_ENVELOPE, MAX_REL_RATE_WRITES};
use super::{Encoder, Opcode, Operands};
use crate::convert::Modulation;
use crate::driver::{DriverVersion, FamilyCrossing};
use crate::error::{Result, WarningCode};

/// Drivers a flag exists in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Availability {
    All,
    NewFamily,
    Flamedriver,
}

/// A flag that is a prefix followed by `operands` byte operands.
struct SimpleFlag {
    opcode: Opcode,
    availability: Availability,
    prefix: &'static [u8],
    operands: usize,
}

const fn simple(
    opcode: Opcode,
    availability: Availability,
    prefix: &'static [u8],
    operands: usize,
) -> SimpleFlag {
    SimpleFlag {
        opcode,
        availability,
        prefix,
        operands,
    }
}

const SIMPLE_FLAGS: &[SimpleFlag] = &[
    simple(Opcode::Detune, Availability::All, &[flags::DETUNE], 1),
    simple(Opcode::AlterVol, Availability::All, &[flags::ALTER_VOL], 1),
    simple(Opcode::PsgAlterVol, Availability::All, &[flags::PSG_ALTER_VOL], 1),
    simple(Opcode::Stop, Availability::All, &[flags::STOP], 0),
    simple(Opcode::PsgForm, Availability::All, &[flags::PSG_FORM], 1),
    simple(Opcode::PsgVoice, Availability::All, &[flags::PSG_VOICE], 1),
    simple(Opcode::StopFm, Availability::NewFamily, &[flags::STOP_FM_S3], 0),
    simple(Opcode::SpindashRev, Availability::NewFamily, &[flags::SPINDASH_REV_S3], 0),
    simple(Opcode::SetNote, Availability::NewFamily, &[flags::SET_NOTE_S3], 1),
    simple(Opcode::FmiCommand, Availability::NewFamily, &[flags::FMI_COMMAND_S3], 2),
    simple(Opcode::ModChange2, Availability::NewFamily, &[flags::MOD_CHANGE2_S3], 2),
    simple(Opcode::ModChange, Availability::NewFamily, &[flags::MOD_CHANGE_S3], 1),
    simple(Opcode::AlternateSmps, Availability::NewFamily, &[flags::ALTERNATE_SMPS_S3], 1),
    simple(Opcode::Fm3SpecialMode, Availability::NewFamily, &[flags::FM3_SPECIAL_S3], 4),
    simple(Opcode::HaltMusic, Availability::NewFamily, &[flags::META, meta::HALT_MUSIC], 1),
    simple(Opcode::SsgEg, Availability::NewFamily, &[flags::META, meta::SSG_EG], 4),
    simple(Opcode::FmVolEnv, Availability::NewFamily, &[flags::META, meta::FM_VOL_ENV], 2),
    simple(
        Opcode::ResetSpindashRev,
        Availability::NewFamily,
        &[flags::META, meta::RESET_SPINDASH_REV],
        0,
    ),
    simple(
        Opcode::ChanFmCommand,
        Availability::Flamedriver,
        &[flags::META, meta::CHAN_FM_COMMAND],
        2,
    ),
    simple(Opcode::PitchSlide, Availability::Flamedriver, &[flags::META, meta::PITCH_SLIDE], 1),
    simple(Opcode::SetLfo, Availability::Flamedriver, &[flags::META, meta::SET_LFO], 2),
    simple(Opcode::PlayMusic, Availability::Flamedriver, &[flags::META, meta::PLAY_MUSIC], 1),
];

/// Extension trait for coordination flags.
pub trait FlagEmitter {
    /// Encode any coordination flag.
    fn coordination_flag(&mut self, opcode: Opcode, ops: &Operands) -> Result<()>;
}

impl FlagEmitter for Encoder<'_> {
    fn coordination_flag(&mut self, opcode: Opcode, ops: &Operands) -> Result<()> {
        if let Some(flag) = SIMPLE_FLAGS.iter().find(|f| f.opcode == opcode) {
            self.require(flag.availability)?;
            self.emit_bytes(flag.prefix);
            for i in 0..flag.operands {
                self.emit_byte(ops.byte(i));
            }
            return Ok(());
        }

        let target = self.target();
        let new = target.is_new_family();

        match opcode {
            Opcode::Pan => {
                let value = ops.value(0).wrapping_add(ops.value(1));
                self.emit_bytes(&[flags::PAN, value as u8]);
            }
            Opcode::Nop => {
                if !new {
                    self.emit_bytes(&[flags::NOP_S12, ops.byte(0)]);
                }
            }
            Opcode::Return => {
                self.emit_byte(if new { flags::RETURN_S3 } else { flags::RETURN_S12 });
            }
            Opcode::Fade => self.fade(ops)?,
            Opcode::ChanTempoDiv => {
                if target >= DriverVersion::FLAMEDRIVER {
                    self.emit_meta(meta::CHAN_TEMPO_DIV);
                    self.emit_byte(ops.byte(0));
                } else if new {
                    return Err(self
                        .unsupported()
                        .with_hint("use Flamewing's driver for per-channel tempo dividers"));
                } else {
                    self.emit_bytes(&[flags::CHAN_TEMPO_DIV_S12, ops.byte(0)]);
                }
            }
            Opcode::NoteFill => self.note_fill(ops)?,
            Opcode::ChangeTransposition => {
                let flag = if new { flags::TRANSPOSE_S3 } else { flags::TRANSPOSE_S12 };
                self.emit_bytes(&[flag, ops.byte(0)]);
            }
            Opcode::SetTempoMod => {
                let modifier = self.tempo_modifier(ops.value(0))?;
                if new {
                    self.emit_meta(meta::SET_TEMPO_MOD);
                } else {
                    self.emit_byte(flags::SET_TEMPO_MOD_S12);
                }
                self.emit_byte(modifier);
            }
            Opcode::SetTempoDiv => {
                if new {
                    self.emit_meta(meta::SET_TEMPO_DIV);
                } else {
                    self.emit_byte(flags::SET_TEMPO_DIV_S12);
                }
                self.emit_byte(ops.byte(0));
            }
            Opcode::SetVol => {
                if !new {
                    return Err(self.unsupported());
                }
                self.emit_bytes(&[flags::SET_VOLUME_S3, ops.byte(0)]);
            }
            Opcode::ClearPush => {
                if target != DriverVersion::SONIC_1 {
                    return Err(self.unsupported());
                }
                self.emit_byte(flags::CLEAR_PUSH_S1);
            }
            Opcode::StopSpecial => {
                if target == DriverVersion::SONIC_1 {
                    self.emit_byte(flags::STOP_SPECIAL_S1);
                } else {
                    self.warn(
                        WarningCode::Degraded,
                        format!(
                            "smpsStopSpecial does not exist in the {} driver, emitting smpsStop",
                            target.name()
                        ),
                    );
                    self.emit_byte(flags::STOP);
                }
            }
            Opcode::FmVoice => {
                self.emit_byte(flags::FM_VOICE);
                match ops.get(1) {
                    Some(song) if new => {
                        self.emit_bytes(&[ops.byte(0) | 0x80, song.wrapping_add(0x81) as u8]);
                    }
                    _ => self.emit_byte(ops.byte(0)),
                }
            }
            Opcode::ModSet => {
                let modulation = Modulation {
                    wait: ops.value(0),
                    speed: ops.value(1),
                    change: ops.value(2),
                    step: ops.value(3),
                };
                let bytes = modulation.convert(self.source()?, target);
                self.emit_byte(flags::MOD_SET);
                self.emit_bytes(&bytes);
            }
            Opcode::ModOn => {
                if new {
                    let envelope = ops.get(0).map_or(DEFAULT_MOD_ENVELOPE, |v| v as u8);
                    self.emit_bytes(&[flags::MOD_ON_S3, envelope]);
                } else if ops.is_empty() {
                    self.emit_byte(flags::MOD_ON_S12);
                } else {
                    self.warn(
                        WarningCode::Degraded,
                        "Modulation envelopes do not exist in the Sonic 1 and Sonic 2 drivers, smpsModOn dropped",
                    );
                }
            }
            Opcode::ModOff => {
                self.emit_byte(if new { flags::MOD_OFF_S3 } else { flags::MOD_OFF_S12 });
            }
            Opcode::Jump => {
                self.emit_byte(flags::JUMP);
                self.emit_jump_target(ops.value(0));
            }
            Opcode::Loop => {
                self.emit_bytes(&[flags::LOOP, ops.byte(0), ops.byte(1)]);
                self.emit_jump_target(ops.value(2));
            }
            Opcode::Call => {
                self.emit_byte(flags::CALL);
                self.emit_jump_target(ops.value(0));
            }
            Opcode::FmAlterVol => match ops.get(1) {
                Some(fm) if new => {
                    self.emit_bytes(&[flags::FM_PSG_ALTER_VOL_S3, ops.byte(0), fm as u8]);
                }
                Some(fm) => self.emit_bytes(&[flags::ALTER_VOL, fm as u8]),
                None => self.emit_bytes(&[flags::ALTER_VOL, ops.byte(0)]),
            },
            Opcode::PlayDacSample => {
                self.require(Availability::NewFamily)?;
                self.emit_bytes(&[flags::PLAY_DAC_S3, ops.byte(0) & 0x7F]);
            }
            Opcode::ConditionalJump => {
                self.require(Availability::NewFamily)?;
                self.emit_bytes(&[flags::CONDITIONAL_JUMP_S3, ops.byte(0)]);
                self.emit_word(ops.word(1));
            }
            Opcode::ContinuousLoop => {
                self.require(Availability::NewFamily)?;
                self.emit_byte(flags::CONTINUOUS_LOOP_S3);
                self.emit_word(ops.word(0));
            }
            Opcode::CopyData => {
                self.require(Availability::NewFamily)?;
                self.emit_meta(meta::COPY_DATA);
                self.emit_word(ops.word(0));
                self.emit_byte(ops.byte(1));
            }
            Opcode::PlaySound => {
                self.require(Availability::NewFamily)?;
                if target >= DriverVersion::FLAMEDRIVER {
                    self.warn(
                        WarningCode::PlaySoundSfxOnly,
                        "smpsPlaySound only plays SFX in Flamewing's driver; use smpsPlayMusic for music or fades",
                    );
                }
                self.emit_meta(meta::PLAY_SOUND);
                self.emit_byte(ops.byte(0));
            }
            Opcode::MaxRelRate => {
                if new {
                    for (register, value) in MAX_REL_RATE_WRITES {
                        self.emit_bytes(&[flags::FMI_COMMAND_S3, register, value]);
                    }
                } else {
                    self.emit_byte(flags::MAX_REL_RATE_S12);
                }
            }
            other => {
                return Err(self.error(
                    crate::error::ErrorCode::UnknownInstruction,
                    format!("{:?} is not a coordination flag", other),
                ))
            }
        }
        Ok(())
    }
}

impl Encoder<'_> {
    fn require(&self, availability: Availability) -> Result<()> {
        let target = self.target();
        let available = match availability {
            Availability::All => true,
            Availability::NewFamily => target.is_new_family(),
            Availability::Flamedriver => target >= DriverVersion::FLAMEDRIVER,
        };
        if available {
            Ok(())
        } else {
            Err(self.unsupported())
        }
    }

    fn fade(&mut self, ops: &Operands) -> Result<()> {
        let source = self.source()?;
        if self.target().is_new_family() {
            self.emit_byte(flags::FADE_IN_S3);
            if let Some(value) = ops.get(0) {
                self.emit_byte(value as u8);
            }
            if source.is_old_family() {
                self.emit_byte(flags::STOP);
            }
        } else if source.is_new_family() && ops.get(0).is_some_and(|v| v != 0xFF) {
            // A Sonic 3 fade with a duration is a no-op in the old drivers.
        } else {
            self.emit_byte(flags::FADE_IN_S12);
        }
        Ok(())
    }

    fn note_fill(&mut self, ops: &Operands) -> Result<()> {
        let source = self.source()?;
        let target = self.target();
        let value = ops.byte(0);

        if target >= DriverVersion::FLAMEDRIVER && source.is_old_family() {
            self.emit_meta(meta::NOTE_FILL);
            self.emit_byte(value);
        } else {
            match FamilyCrossing::between(source, target) {
                FamilyCrossing::OldToNew => self.warn(
                    WarningCode::NoteFillTiming,
                    "Note fill will not work as intended unless the value is divided by the tempo divider",
                ),
                FamilyCrossing::NewToOld => self.warn(
                    WarningCode::NoteFillTiming,
                    "Note fill will not work as intended unless the value is multiplied by the tempo divider",
                ),
                FamilyCrossing::None => {}
            }
        }

        self.emit_bytes(&[flags::NOTE_FILL, value]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use crate::error::{ErrorCode, WarningCode};
    use pretty_assertions::assert_eq;

    fn bytes(target: u32, source: u32, mnemonic: &str, values: &[u32]) -> Vec<u8> {
        Harness::song(target, source).run(mnemonic, values).unwrap()
    }

    fn error(target: u32, mnemonic: &str, values: &[u32]) -> ErrorCode {
        Harness::song(target, target)
            .run(mnemonic, values)
            .unwrap_err()
            .code
    }

    #[test]
    fn test_pan_adds_operands() {
        assert_eq!(bytes(1, 1, "smpsPan", &[0x80, 0x12]), vec![0xE0, 0x92]);
    }

    #[test]
    fn test_family_dependent_flags() {
        assert_eq!(bytes(2, 2, "smpsReturn", &[]), vec![0xE3]);
        assert_eq!(bytes(3, 3, "smpsReturn", &[]), vec![0xF9]);
        assert_eq!(bytes(2, 2, "smpsNop", &[1]), vec![0xE2, 1]);
        assert_eq!(bytes(4, 4, "smpsNop", &[1]), vec![]);
        assert_eq!(bytes(1, 1, "smpsAlterPitch", &[5]), vec![0xE9, 5]);
        assert_eq!(bytes(3, 3, "smpsChangeTransposition", &[5]), vec![0xFB, 5]);
        assert_eq!(bytes(2, 2, "smpsModOff", &[]), vec![0xF4]);
        assert_eq!(bytes(3, 3, "smpsModOff", &[]), vec![0xFA]);
        assert_eq!(bytes(2, 2, "smpsSetTempoDiv", &[2]), vec![0xEB, 2]);
        assert_eq!(bytes(5, 5, "smpsSetTempoDiv", &[2]), vec![0xFF, 0x04, 2]);
    }

    #[test]
    fn test_fade() {
        assert_eq!(bytes(3, 3, "smpsFade", &[]), vec![0xE2]);
        assert_eq!(bytes(3, 3, "smpsFade", &[5]), vec![0xE2, 5]);
        assert_eq!(bytes(3, 1, "smpsFade", &[]), vec![0xE2, 0xF2]);
        assert_eq!(bytes(1, 3, "smpsFade", &[5]), vec![]);
        assert_eq!(bytes(1, 3, "smpsFade", &[0xFF]), vec![0xE4]);
        assert_eq!(bytes(2, 2, "smpsFade", &[]), vec![0xE4]);
    }

    #[test]
    fn test_chan_tempo_div() {
        assert_eq!(bytes(1, 1, "smpsChanTempoDiv", &[2]), vec![0xE5, 2]);
        assert_eq!(bytes(5, 5, "smpsChanTempoDiv", &[2]), vec![0xFF, 0x08, 2]);
        assert_eq!(error(3, "smpsChanTempoDiv", &[2]), ErrorCode::UnsupportedInDriver);
    }

    #[test]
    fn test_note_fill() {
        assert_eq!(bytes(5, 1, "smpsNoteFill", &[6]), vec![0xFF, 0x0A, 6, 0xE8, 6]);
        assert_eq!(bytes(2, 2, "smpsNoteFill", &[6]), vec![0xE8, 6]);

        let mut h = Harness::song(3, 2);
        assert_eq!(h.run("smpsNoteFill", &[6]).unwrap(), vec![0xE8, 6]);
        assert_eq!(h.warnings[0].code, WarningCode::NoteFillTiming);
    }

    #[test]
    fn test_set_tempo_mod() {
        assert_eq!(bytes(3, 2, "smpsSetTempoMod", &[0x10]), vec![0xFF, 0x00, 0xF0]);
        assert_eq!(bytes(2, 2, "smpsSetTempoMod", &[0x10]), vec![0xEA, 0x10]);
    }

    #[test]
    fn test_old_only_flags() {
        assert_eq!(bytes(1, 1, "smpsClearPush", &[]), vec![0xED]);
        assert_eq!(error(2, "smpsClearPush", &[]), ErrorCode::UnsupportedInDriver);
        assert_eq!(bytes(1, 1, "smpsStopSpecial", &[]), vec![0xEE]);
        assert_eq!(error(2, "smpsSetVol", &[1]), ErrorCode::UnsupportedInDriver);
        assert_eq!(bytes(3, 3, "smpsSetVol", &[1]), vec![0xE4, 1]);
    }

    #[test]
    fn test_stop_special_degrades() {
        let mut h = Harness::song(2, 2);
        assert_eq!(h.run("smpsStopSpecial", &[]).unwrap(), vec![0xF2]);
        assert_eq!(h.warnings[0].code, WarningCode::Degraded);
    }

    #[test]
    fn test_fm_voice() {
        assert_eq!(bytes(2, 2, "smpsFMvoice", &[3, 1]), vec![0xEF, 3]);
        assert_eq!(bytes(3, 3, "smpsSetvoice", &[3, 1]), vec![0xEF, 0x83, 0x82]);
        assert_eq!(bytes(3, 3, "smpsFMvoice", &[3]), vec![0xEF, 3]);
    }

    #[test]
    fn test_mod_set() {
        assert_eq!(bytes(3, 1, "smpsModSet", &[1, 2, 3, 4]), vec![0xF0, 2, 2, 3, 10]);
        assert_eq!(bytes(2, 2, "smpsModSet", &[1, 2, 3, 4]), vec![0xF0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_mod_on() {
        assert_eq!(bytes(3, 3, "smpsModOn", &[]), vec![0xF4, 0x80]);
        assert_eq!(bytes(3, 3, "smpsModOn", &[2]), vec![0xF4, 2]);
        assert_eq!(bytes(2, 2, "smpsModOn", &[]), vec![0xF1]);

        let mut h = Harness::song(2, 3);
        assert_eq!(h.run("smpsModOn", &[2]).unwrap(), vec![]);
        assert_eq!(h.warnings[0].code, WarningCode::Degraded);
    }

    #[test]
    fn test_loop_and_call() {
        assert_eq!(bytes(2, 2, "smpsLoop", &[0, 2, 0x1234]), vec![0xF7, 0, 2, 0x34, 0x12]);
        assert_eq!(bytes(2, 2, "smpsCall", &[0x1234]), vec![0xF8, 0x34, 0x12]);
    }

    #[test]
    fn test_fm_alter_vol() {
        assert_eq!(bytes(3, 3, "smpsFMAlterVol", &[1, 2]), vec![0xE5, 1, 2]);
        assert_eq!(bytes(2, 2, "smpsFMAlterVol", &[1, 2]), vec![0xE6, 2]);
        assert_eq!(bytes(3, 3, "smpsFMAlterVol", &[1]), vec![0xE6, 1]);
    }

    #[test]
    fn test_new_family_only() {
        for (mnemonic, values) in [
            ("smpsStopFM", &[][..]),
            ("smpsSpindashRev", &[]),
            ("smpsPlayDACSample", &[0x81]),
            ("smpsConditionalJump", &[0, 0]),
            ("smpsSetNote", &[0]),
            ("smpsFMICommand", &[0, 0]),
            ("smpsModChange2", &[0, 0]),
            ("smpsModChange", &[0]),
            ("smpsContinuousLoop", &[0]),
            ("smpsAlternateSMPS", &[0]),
            ("smpsFM3SpecialMode", &[0, 0, 0, 0]),
            ("smpsPlaySound", &[0]),
            ("smpsHaltMusic", &[0]),
            ("smpsCopyData", &[0, 0]),
            ("smpsSSGEG", &[0, 0, 0, 0]),
            ("smpsFMVolEnv", &[0, 0]),
            ("smpsResetSpindashRev", &[]),
        ] {
            assert_eq!(error(2, mnemonic, values), ErrorCode::UnsupportedInDriver, "{}", mnemonic);
            assert!(Harness::song(3, 3).run(mnemonic, values).is_ok(), "{}", mnemonic);
        }
    }

    #[test]
    fn test_flamedriver_only() {
        assert_eq!(error(4, "smpsPitchSlide", &[1]), ErrorCode::UnsupportedInDriver);
        assert_eq!(bytes(5, 5, "smpsPitchSlide", &[1]), vec![0xFF, 0x0B, 1]);
        assert_eq!(bytes(5, 5, "smpsSetLFO", &[1, 2]), vec![0xFF, 0x0C, 1, 2]);
        assert_eq!(bytes(5, 5, "smpsPlayMusic", &[1]), vec![0xFF, 0x0D, 1]);
        assert_eq!(bytes(5, 5, "smpsChanFMCommand", &[1, 2]), vec![0xFF, 0x09, 1, 2]);
    }

    #[test]
    fn test_new_family_encodings() {
        assert_eq!(bytes(3, 3, "smpsPlayDACSample", &[0x81]), vec![0xEA, 0x01]);
        assert_eq!(bytes(3, 3, "smpsConditionalJump", &[1, 0x1234]), vec![0xEB, 1, 0x34, 0x12]);
        assert_eq!(bytes(4, 4, "smpsCopyData", &[0x1234, 3]), vec![0xFF, 0x03, 0x34, 0x12, 3]);
        assert_eq!(bytes(3, 3, "smpsSSGEG", &[1, 2, 3, 4]), vec![0xFF, 0x05, 1, 2, 3, 4]);
        assert_eq!(bytes(3, 3, "smpsFMFlutter", &[1, 2]), vec![0xFF, 0x06, 1, 2]);
    }

    #[test]
    fn test_play_sound_notice_on_flamedriver() {
        let mut h = Harness::song(5, 5);
        assert_eq!(h.run("smpsPlaySound", &[1]).unwrap(), vec![0xFF, 0x01, 1]);
        assert_eq!(h.warnings[0].code, WarningCode::PlaySoundSfxOnly);
        let mut h = Harness::song(3, 3);
        h.run("smpsPlaySound", &[1]).unwrap();
        assert!(h.warnings.is_empty());
    }

    #[test]
    fn test_max_rel_rate() {
        assert_eq!(
            bytes(3, 3, "smpsMaxRelRate", &[]),
            vec![0xEE, 0x88, 0x0F, 0xEE, 0x8C, 0x0F]
        );
        assert_eq!(bytes(1, 1, "smpsWeirdD1LRR", &[]), vec![0xF9]);
    }
}
