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

//! Coordination flag bytes of the SMPS drivers.
//!
//! The Sonic 1/2 drivers and the Sonic 3 driver family share the `$E0`-`$FF`
//! range but assign many values differently. Constants are suffixed `_S12` or
//! `_S3` where the meaning differs; the Sonic 3 family also has a `$FF` prefix
//! for extended flags listed in [`meta`].

/// Single-byte coordination flags.
pub mod flags {
    pub const PAN: u8 = 0xE0;
    pub const DETUNE: u8 = 0xE1;

    pub const NOP_S12: u8 = 0xE2;
    pub const FADE_IN_S3: u8 = 0xE2;

    pub const RETURN_S12: u8 = 0xE3;
    pub const STOP_FM_S3: u8 = 0xE3;

    pub const FADE_IN_S12: u8 = 0xE4;
    pub const SET_VOLUME_S3: u8 = 0xE4;

    pub const CHAN_TEMPO_DIV_S12: u8 = 0xE5;
    pub const FM_PSG_ALTER_VOL_S3: u8 = 0xE5;

    pub const ALTER_VOL: u8 = 0xE6;
    pub const NOTE_FILL: u8 = 0xE8;

    pub const TRANSPOSE_S12: u8 = 0xE9;
    pub const SPINDASH_REV_S3: u8 = 0xE9;

    pub const SET_TEMPO_MOD_S12: u8 = 0xEA;
    pub const PLAY_DAC_S3: u8 = 0xEA;

    pub const SET_TEMPO_DIV_S12: u8 = 0xEB;
    pub const CONDITIONAL_JUMP_S3: u8 = 0xEB;

    pub const PSG_ALTER_VOL: u8 = 0xEC;

    pub const CLEAR_PUSH_S1: u8 = 0xED;
    pub const SET_NOTE_S3: u8 = 0xED;

    pub const STOP_SPECIAL_S1: u8 = 0xEE;
    pub const FMI_COMMAND_S3: u8 = 0xEE;

    pub const FM_VOICE: u8 = 0xEF;
    pub const MOD_SET: u8 = 0xF0;

    pub const MOD_ON_S12: u8 = 0xF1;
    pub const MOD_CHANGE2_S3: u8 = 0xF1;

    pub const STOP: u8 = 0xF2;
    pub const PSG_FORM: u8 = 0xF3;

    pub const MOD_OFF_S12: u8 = 0xF4;
    pub const MOD_ON_S3: u8 = 0xF4;
    pub const MOD_CHANGE_S3: u8 = 0xF4;

    pub const PSG_VOICE: u8 = 0xF5;
    pub const JUMP: u8 = 0xF6;
    pub const LOOP: u8 = 0xF7;
    pub const CALL: u8 = 0xF8;

    pub const MAX_REL_RATE_S12: u8 = 0xF9;
    pub const RETURN_S3: u8 = 0xF9;

    pub const MOD_OFF_S3: u8 = 0xFA;
    pub const TRANSPOSE_S3: u8 = 0xFB;
    pub const CONTINUOUS_LOOP_S3: u8 = 0xFC;
    pub const ALTERNATE_SMPS_S3: u8 = 0xFD;
    pub const FM3_SPECIAL_S3: u8 = 0xFE;

    /// Prefix for the extended flags in [`super::meta`].
    pub const META: u8 = 0xFF;
}

/// Second byte of `$FF`-prefixed flags (Sonic 3 family).
pub mod meta {
    pub const SET_TEMPO_MOD: u8 = 0x00;
    pub const PLAY_SOUND: u8 = 0x01;
    pub const HALT_MUSIC: u8 = 0x02;
    pub const COPY_DATA: u8 = 0x03;
    pub const SET_TEMPO_DIV: u8 = 0x04;
    pub const SSG_EG: u8 = 0x05;
    pub const FM_VOL_ENV: u8 = 0x06;
    pub const RESET_SPINDASH_REV: u8 = 0x07;

    // Flamedriver only.
    pub const CHAN_TEMPO_DIV: u8 = 0x08;
    pub const CHAN_FM_COMMAND: u8 = 0x09;
    pub const NOTE_FILL: u8 = 0x0A;
    pub const PITCH_SLIDE: u8 = 0x0B;
    pub const SET_LFO: u8 = 0x0C;
    pub const PLAY_MUSIC: u8 = 0x0D;
}

/// Playback-control byte that opens an SFX channel entry.
pub const SFX_PLAYBACK_CONTROL: u8 = 0x80;

/// Sonic 3's universal voice bank pointer.
pub const UNIVERSAL_VOICE_BANK: u16 = 0x17D8;

/// Modulation envelope used by `smpsModOn` without arguments on Sonic 3 drivers.
pub const DEFAULT_MOD_ENVELOPE: u8 = 0x80;

/// YM2612 register/value pairs emitted for `smpsMaxRelRate` on Sonic 3 drivers.
pub const MAX_REL_RATE_WRITES: [(u8, u8); 2] = [(0x88, 0x0F), (0x8C, 0x0F)];
