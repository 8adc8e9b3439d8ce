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

//! Song and SFX header encoding.

use super::emit::EmitHelpers;
use super::opcodes::{SFX_PLAYBACK_CONTROL, UNIVERSAL_VOICE_BANK};
use super::{Encoder, Operands};
use crate::convert::{convert_main_tempo, psg_pitch};
use crate::driver::DriverVersion;
use crate::error::{ErrorCode, Result, WarningCode};
use crate::symbols::defaults::{CHANNEL_FM6, CHANNEL_NOISE};

/// Newest SMPS2ASM format version the encoders understand.
pub const SMPS2ASM_VERSION: u32 = 1;

/// Extension trait for header pseudo-instructions.
pub trait HeaderEmitter {
    /// `smpsHeaderStartSong src[, ver]`: record the song start and source driver.
    fn start_song(&mut self, ops: &Operands) -> Result<()>;

    /// `smpsHeaderVoice loc`
    fn header_voice(&mut self, ops: &Operands) -> Result<()>;

    /// `smpsHeaderVoiceNull`
    fn header_voice_null(&mut self) -> Result<()>;

    /// `smpsHeaderVoiceUVB`: point at Sonic 3's universal voice bank.
    fn header_voice_uvb(&mut self) -> Result<()>;

    /// `smpsHeaderChan fm, psg`
    fn header_chan(&mut self, ops: &Operands) -> Result<()>;

    /// `smpsHeaderTempo div, mod`
    fn header_tempo(&mut self, ops: &Operands) -> Result<()>;

    /// `smpsHeaderDAC loc[, pitch[, vol]]`
    fn header_dac(&mut self, ops: &Operands) -> Result<()>;

    /// `smpsHeaderFM loc, pitch, vol`
    fn header_fm(&mut self, ops: &Operands) -> Result<()>;

    /// `smpsHeaderPSG loc, pitch, vol, mod, env`
    fn header_psg(&mut self, ops: &Operands) -> Result<()>;

    /// `smpsHeaderSFXChannel ch, loc, pitch, vol`
    fn header_sfx_channel(&mut self, ops: &Operands) -> Result<()>;

    /// Main tempo modifier converted for the target driver.
    fn tempo_modifier(&mut self, value: u32) -> Result<u8>;

    /// PSG pitch displacement converted for the target driver.
    fn psg_pitch(&self, value: u32) -> Result<u8>;
}

impl HeaderEmitter for Encoder<'_> {
    fn start_song(&mut self, ops: &Operands) -> Result<()> {
        if self.provisional {
            return Err(self
                .error(
                    ErrorCode::HeaderNotEvaluable,
                    "smpsHeaderStartSong must be evaluable on the first pass",
                )
                .with_hint("use literal values for the driver and format version"));
        }

        let number = ops.value(0);
        let source = DriverVersion::new(number).ok_or_else(|| {
            self.error(
                ErrorCode::InvalidDriver,
                format!("Source driver {} does not exist", number),
            )
            .with_hint("drivers are numbered 1 (Sonic 1) to 5 (Flamewing's)")
        })?;

        let version = ops.get(1).unwrap_or(0);
        if version > SMPS2ASM_VERSION {
            return Err(self.error(
                ErrorCode::UnsupportedFormatVersion,
                format!(
                    "Song targets SMPS2ASM version {}, newest supported is {}",
                    version, SMPS2ASM_VERSION
                ),
            ));
        }

        let address = self.logical_address();
        let song = &mut self.context.song;
        song.source = Some(source);
        song.format_version = Some(version);
        song.song_start = Some(address);
        song.voice_index = 0;
        Ok(())
    }

    fn header_voice(&mut self, ops: &Operands) -> Result<()> {
        check_voice_pointer_position(self)?;
        self.emit_channel_pointer(ops.value(0))
    }

    fn header_voice_null(&mut self) -> Result<()> {
        check_voice_pointer_position(self)?;
        self.emit_word(0);
        Ok(())
    }

    fn header_voice_uvb(&mut self) -> Result<()> {
        check_voice_pointer_position(self)?;
        match self.target().number() {
            3 | 4 => {
                self.emit_word(UNIVERSAL_VOICE_BANK);
                Ok(())
            }
            _ => Err(self
                .unsupported()
                .with_hint("the universal voice bank only exists in the Sonic 3 and 3D drivers")),
        }
    }

    fn header_chan(&mut self, ops: &Operands) -> Result<()> {
        self.emit_bytes(&[ops.byte(0), ops.byte(1)]);
        Ok(())
    }

    fn header_tempo(&mut self, ops: &Operands) -> Result<()> {
        let modifier = self.tempo_modifier(ops.value(1))?;
        self.emit_bytes(&[ops.byte(0), modifier]);
        Ok(())
    }

    fn header_dac(&mut self, ops: &Operands) -> Result<()> {
        self.emit_channel_pointer(ops.value(0))?;
        self.emit_bytes(&[ops.byte(1), ops.byte(2)]);
        Ok(())
    }

    fn header_fm(&mut self, ops: &Operands) -> Result<()> {
        self.emit_channel_pointer(ops.value(0))?;
        self.emit_bytes(&[ops.byte(1), ops.byte(2)]);
        Ok(())
    }

    fn header_psg(&mut self, ops: &Operands) -> Result<()> {
        let pitch = self.psg_pitch(ops.value(1))?;
        self.emit_channel_pointer(ops.value(0))?;
        self.emit_bytes(&[pitch, ops.byte(2), ops.byte(3), ops.byte(4)]);
        Ok(())
    }

    fn header_sfx_channel(&mut self, ops: &Operands) -> Result<()> {
        let channel = ops.value(0);
        if !self.provisional {
            let noise = self.symbols.value_of("cNoise").unwrap_or(CHANNEL_NOISE);
            let fm6 = self.symbols.value_of("cFM6").unwrap_or(CHANNEL_FM6);
            if self.target().is_new_family() && channel == noise {
                return Err(self
                    .error(
                        ErrorCode::UnsupportedChannel,
                        "Channel ID cNoise ($E0) is unsafe in the Sonic 3 driver",
                    )
                    .with_hint("turn the channel into a noise channel with smpsPSGform instead"));
            }
            if self.target().is_old_family() && channel == fm6 {
                return Err(self
                    .error(
                        ErrorCode::UnsupportedChannel,
                        "Channel ID cFM6 ($06) is not supported by the Sonic 1 and Sonic 2 drivers",
                    )
                    .with_hint("move the SFX to another channel"));
            }
        }

        let pitch = if channel & 0x80 != 0 {
            self.psg_pitch(ops.value(2))?
        } else {
            ops.byte(2)
        };

        self.emit_bytes(&[SFX_PLAYBACK_CONTROL, channel as u8]);
        self.emit_channel_pointer(ops.value(1))?;
        self.emit_bytes(&[pitch, ops.byte(3)]);
        Ok(())
    }

    fn tempo_modifier(&mut self, value: u32) -> Result<u8> {
        let source = self.source()?;
        match convert_main_tempo(value, source, self.target()) {
            Ok(conversion) => {
                if conversion.approximate {
                    self.warn(
                        WarningCode::ApproximateTempo,
                        format!(
                            "Main tempo modifier 0 from the {} driver has no exact equivalent",
                            source.name()
                        ),
                    );
                }
                Ok(conversion.value)
            }
            Err(_) if self.provisional => Ok(0),
            Err(invalid) => Err(self.error(
                ErrorCode::InvalidTempo,
                format!(
                    "Main tempo modifier {} is invalid in a song from the {} driver",
                    invalid.value,
                    invalid.source.name()
                ),
            )),
        }
    }

    fn psg_pitch(&self, value: u32) -> Result<u8> {
        Ok(psg_pitch(value, self.source()?, self.target()))
    }
}

/// Voice pointers are the first header field, directly at the song start.
fn check_voice_pointer_position(encoder: &Encoder<'_>) -> Result<()> {
    let song_start = encoder.song_start()?;
    if song_start != encoder.logical_address() {
        return Err(encoder
            .error(
                ErrorCode::MissingSongHeader,
                format!(
                    "{} must directly follow smpsHeaderStartSong",
                    encoder.mnemonic
                ),
            )
            .with_hint("the voice pointer is the first field of the song header"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::super::Operands;
    use crate::error::{ErrorCode, WarningCode};

    #[test]
    fn test_start_song_emits_nothing() {
        let mut h = Harness::new(2);
        assert_eq!(h.run("smpsHeaderStartSong", &[2, 1]).unwrap(), vec![]);
        assert_eq!(h.context.song.format_version, Some(1));
        assert_eq!(h.context.song.song_start, Some(0));
    }

    #[test]
    fn test_start_song_validation() {
        let mut h = Harness::new(2);
        assert_eq!(
            h.run("smpsHeaderStartSong", &[6]).unwrap_err().code,
            ErrorCode::InvalidDriver
        );
        assert_eq!(
            h.run("smpsHeaderStartSong", &[2, 2]).unwrap_err().code,
            ErrorCode::UnsupportedFormatVersion
        );
        assert_eq!(
            h.run_with("smpsHeaderStartSong", Operands::new(vec![0], true))
                .unwrap_err()
                .code,
            ErrorCode::HeaderNotEvaluable
        );
    }

    #[test]
    fn test_header_voice() {
        let mut h = Harness::song(2, 2);
        assert_eq!(h.run("smpsHeaderVoice", &[0x1234]).unwrap(), vec![0x34, 0x12]);
        let err = h.run("smpsHeaderVoiceNull", &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingSongHeader);
    }

    #[test]
    fn test_header_voice_without_song() {
        let mut h = Harness::new(3);
        let err = h.run("smpsHeaderVoice", &[0]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingSongHeader);
    }

    #[test]
    fn test_header_voice_uvb() {
        assert_eq!(
            Harness::song(3, 3).run("smpsHeaderVoiceUVB", &[]).unwrap(),
            vec![0xD8, 0x17]
        );
        assert_eq!(
            Harness::song(5, 3)
                .run("smpsHeaderVoiceUVB", &[])
                .unwrap_err()
                .code,
            ErrorCode::UnsupportedInDriver
        );
        assert_eq!(
            Harness::song(2, 3)
                .run("smpsHeaderVoiceUVB", &[])
                .unwrap_err()
                .code,
            ErrorCode::UnsupportedInDriver
        );
    }

    #[test]
    fn test_header_tempo_converts() {
        let mut h = Harness::song(3, 2);
        assert_eq!(h.run("smpsHeaderTempo", &[1, 0x10]).unwrap(), vec![1, 0xF0]);
        let err = h.run("smpsHeaderTempo", &[1, 0]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTempo);
    }

    #[test]
    fn test_header_tempo_provisional_skips_validation() {
        let mut h = Harness::song(3, 2);
        let bytes = h
            .run_with("smpsHeaderTempo", Operands::new(vec![1, 0], true))
            .unwrap();
        assert_eq!(bytes.len(), 2);
    }

    #[test]
    fn test_approximate_tempo_warning() {
        let mut h = Harness::song(1, 3);
        h.run("smpsHeaderTempo", &[1, 0]).unwrap();
        assert_eq!(h.warnings[0].code, WarningCode::ApproximateTempo);
    }

    #[test]
    fn test_header_dac_defaults() {
        let mut h = Harness::song(2, 2);
        h.run("dc.b", &[0, 0]).unwrap();
        assert_eq!(h.run("smpsHeaderDAC", &[0x100]).unwrap(), vec![0x00, 0x01, 0, 0]);
        assert_eq!(h.run("smpsHeaderDAC", &[0x100, 1, 2]).unwrap(), vec![0x00, 0x01, 1, 2]);
    }

    #[test]
    fn test_header_psg_pitch_conversion() {
        let mut h = Harness::song(3, 1);
        assert_eq!(
            h.run("smpsHeaderPSG", &[0x20, 0xF4, 1, 2, 3]).unwrap(),
            vec![0x20, 0x00, 0x00, 1, 2, 3]
        );
    }

    #[test]
    fn test_sfx_channel() {
        let mut h = Harness::song(2, 3);
        assert_eq!(
            h.run("smpsHeaderSFXChannel", &[0x80, 0x40, 0x0C, 5]).unwrap(),
            vec![0x80, 0x80, 0x40, 0x00, 0x00, 5]
        );
        assert_eq!(
            h.run("smpsHeaderSFXChannel", &[0x05, 0x40, 0x0C, 5]).unwrap(),
            vec![0x80, 0x05, 0x40, 0x00, 0x0C, 5]
        );
    }

    #[test]
    fn test_sfx_channel_rejections() {
        let err = Harness::song(3, 3)
            .run("smpsHeaderSFXChannel", &[0xE0, 0, 0, 0])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedChannel);
        let err = Harness::song(1, 1)
            .run("smpsHeaderSFXChannel", &[0x06, 0, 0, 0])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedChannel);
        assert!(Harness::song(3, 3)
            .run("smpsHeaderSFXChannel", &[0x06, 0, 0, 0])
            .is_ok());
    }

    #[test]
    fn test_sfx_header_bytes() {
        let mut h = Harness::new(1);
        assert_eq!(h.run("smpsHeaderTempoSFX", &[1]).unwrap(), vec![1]);
        assert_eq!(h.run("smpsHeaderChanSFX", &[3]).unwrap(), vec![3]);
    }
}
