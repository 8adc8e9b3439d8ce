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

//! The default dictionary.
//!
//! Note names, pitch offsets, PSG envelope and DAC sample IDs, pan
//! directions and channel IDs every SMPS2ASM song may refer to. Envelope and
//! sample numbering depends on the target driver.

use super::SymbolTable;
use crate::driver::DriverVersion;
use crate::error::Result;

/// First note value (`nRst`).
pub const NOTE_BASE: u32 = 0x80;

/// Semitones in an octave; also the PSG pitch difference between driver families.
pub const PSG_DELTA: u32 = 12;

/// `smpsNoAttack` marker byte.
pub const NO_ATTACK: u32 = 0xE7;

const NOTE_NAMES: [&str; 12] = [
    "C", "Cs", "D", "Eb", "E", "F", "Fs", "G", "Ab", "A", "Bb", "B",
];

/// Highest octave with a full set of note names; it stops at `nBb7`.
const LAST_OCTAVE: u32 = 7;

const DAC_S1: [(&str, u32); 7] = [
    ("dKick", 0x81),
    ("dSnare", 0x82),
    ("dTimpani", 0x83),
    ("dHiTimpani", 0x88),
    ("dMidTimpani", 0x89),
    ("dLowTimpani", 0x8A),
    ("dVLowTimpani", 0x8B),
];

const DAC_S2: &[&str] = &[
    "dKick", "dSnare", "dClap", "dScratch", "dTimpani", "dHiTom", "dVLowClap", "dHiTimpani",
    "dMidTimpani", "dLowTimpani", "dVLowTimpani", "dMidTom", "dLowTom", "dFloorTom", "dHiClap",
    "dMidClap", "dLowClap",
];

const DAC_S3_SK_S3D: &[&str] = &[
    "dSnareS3", "dHighTom", "dMidTomS3", "dLowTomS3", "dFloorTomS3", "dKickS3",
    "dMuffledSnare", "dCrashCymbal", "dRideCymbal", "dLowMetalHit", "dMetalHit",
    "dHighMetalHit", "dHigherMetalHit", "dMidMetalHit", "dClapS3", "dElectricHighTom",
    "dElectricMidTom", "dElectricLowTom", "dElectricFloorTom", "dTightSnare",
    "dMidpitchSnare", "dLooseSnare", "dLooserSnare", "dHiTimpaniS3", "dLowTimpaniS3",
    "dMidTimpaniS3", "dQuickLooseSnare", "dClick", "dPowerKick", "dQuickGlassCrash",
];

const DAC_S3_SK: &[&str] = &[
    "dGlassCrashSnare", "dGlassCrash", "dGlassCrashKick", "dQuietGlassCrash",
    "dOddSnareKick", "dKickExtraBass", "dComeOn", "dDanceSnare", "dLooseKick",
    "dModLooseKick", "dWoo", "dGo", "dSnareGo", "dPowerTom", "dHiWoodBlock",
    "dLowWoodBlock", "dHiHitDrum", "dLowHitDrum", "dMetalCrashHit", "dEchoedClapHit",
    "dLowerEchoedClapHit", "dHipHopHitKick", "dHipHopHitPowerKick", "dBassHey",
    "dDanceStyleKick", "dHipHopHitKick2", "dHipHopHitKick3", "dReverseFadingWind",
    "dScratchS3", "dLooseSnareNoise", "dPowerKick2", "dCrashingNoiseWoo", "dQuickHit",
    "dKickHey", "dPowerKickHit", "dLowPowerKickHit", "dLowerPowerKickHit",
    "dLowestPowerKickHit",
];

const DAC_S3D: &[&str] = &["dFinalFightMetalCrash", "dIntroKick"];

const DAC_S3: &[&str] = &["dEchoedClapHit_S3", "dLowerEchoedClapHit_S3"];

const PAN: [(&str, u32); 5] = [
    ("panNone", 0x00),
    ("panRight", 0x40),
    ("panLeft", 0x80),
    ("panCentre", 0xC0),
    ("panCenter", 0xC0),
];

const CHANNELS: [(&str, u32); 8] = [
    ("cPSG1", 0x80),
    ("cPSG2", 0xA0),
    ("cPSG3", 0xC0),
    ("cNoise", 0xE0),
    ("cFM3", 0x02),
    ("cFM4", 0x04),
    ("cFM5", 0x05),
    ("cFM6", 0x06),
];

/// Channel ID of the PSG noise channel.
pub const CHANNEL_NOISE: u32 = 0xE0;

/// Channel ID of FM6, which doubles as the DAC on the old drivers.
pub const CHANNEL_FM6: u32 = 0x06;

/// Value of note `name` + `octave`, e.g. `("Bb", 6)` for `nBb6`.
pub fn note_value(name: &str, octave: u32) -> Option<u32> {
    let semitone = NOTE_NAMES.iter().position(|n| *n == name)? as u32;
    let index = octave * 12 + semitone;
    // nB7 would be $E0, which is a coordination flag.
    if index >= LAST_OCTAVE * 12 + 11 {
        return None;
    }
    Some(NOTE_BASE + 1 + index)
}

/// Fill `table` with the default dictionary for `target`.
pub fn populate_defaults(table: &mut SymbolTable, target: DriverVersion) -> Result<()> {
    table.define_builtin("nRst", NOTE_BASE)?;
    let mut value = NOTE_BASE + 1;
    'notes: for octave in 0..=LAST_OCTAVE {
        for name in NOTE_NAMES {
            if octave == LAST_OCTAVE && name == "B" {
                break 'notes;
            }
            table.define_builtin(&format!("n{}{}", name, octave), value)?;
            value += 1;
        }
    }

    for step in (1..=10u32).rev() {
        table.define_builtin(&format!("smpsPitch{:02}lo", step), (256 - 12 * step) & 0xFF)?;
    }
    table.define_builtin("smpsPitch00", 0)?;
    for step in 1..=10u32 {
        table.define_builtin(&format!("smpsPitch{:02}hi", step), 12 * step)?;
    }

    table.define_builtin("smpsNoAttack", NO_ATTACK)?;

    let bb6 = note("Bb", 6);
    let b6 = note("B", 6);
    let a5 = note("A", 5);
    if target.is_new_family() {
        table.define_builtin("nMaxPSG", bb6 - PSG_DELTA)?;
        table.define_builtin("nMaxPSG1", bb6)?;
        table.define_builtin("nMaxPSG2", b6)?;
    } else {
        table.define_builtin("nMaxPSG", a5)?;
        table.define_builtin("nMaxPSG1", a5 + PSG_DELTA)?;
        table.define_builtin("nMaxPSG2", a5 + PSG_DELTA)?;
    }

    populate_psg_envelopes(table, target)?;
    populate_dac_samples(table, target)?;

    for (name, value) in PAN.iter().chain(CHANNELS.iter()) {
        table.define_builtin(name, *value)?;
    }

    Ok(())
}

fn note(name: &str, octave: u32) -> u32 {
    // Only called with names from NOTE_NAMES below octave 7.
    note_value(name, octave).unwrap_or(NOTE_BASE)
}

fn populate_psg_envelopes(table: &mut SymbolTable, target: DriverVersion) -> Result<()> {
    let mut id = 1;
    if target.is_new_family() {
        for n in 1..=0x27u32 {
            table.define_builtin(&format!("sTone_{:02X}", n), id)?;
            id += 1;
        }
    }

    let flat_count = if target == DriverVersion::SONIC_1 { 9 } else { 0x0D };
    for n in 1..=flat_count {
        table.define_builtin(&format!("fTone_{:02X}", n), id)?;
        id += 1;
    }
    Ok(())
}

fn populate_dac_samples(table: &mut SymbolTable, target: DriverVersion) -> Result<()> {
    if target == DriverVersion::SONIC_1 {
        for (name, value) in DAC_S1 {
            table.define_builtin(name, value)?;
        }
        return Ok(());
    }

    let lists: &[&[&str]] = match target.number() {
        2 => &[DAC_S2],
        3 => &[DAC_S3_SK_S3D, DAC_S3_SK, DAC_S3],
        4 => &[DAC_S3_SK_S3D, DAC_S3_SK],
        _ => &[DAC_S3_SK_S3D, DAC_S3_SK, DAC_S2, DAC_S3D, DAC_S3],
    };

    let mut id = 0x81;
    for name in lists.iter().flat_map(|list| list.iter()) {
        table.define_builtin(name, id)?;
        id += 1;
    }
    Ok(())
}
