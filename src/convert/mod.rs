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

//! Numeric conversions between driver families.
//!
//! These are pure functions of their inputs and the source/target pair.
//! All results are truncated to a byte the way the drivers store them.

pub mod tempo;

pub use tempo::{convert_main_tempo, InvalidTempo, TempoConversion};

use crate::driver::{DriverVersion, FamilyCrossing};
use crate::symbols::defaults::PSG_DELTA;

/// Shift a PSG pitch displacement across the family boundary.
///
/// The Sonic 3 PSG frequency table starts an octave lower than the Sonic 1/2 one.
pub fn psg_pitch(pitch: u32, source: DriverVersion, target: DriverVersion) -> u8 {
    let value = match FamilyCrossing::between(source, target) {
        FamilyCrossing::OldToNew => pitch.wrapping_add(PSG_DELTA),
        FamilyCrossing::NewToOld => pitch.wrapping_sub(PSG_DELTA),
        FamilyCrossing::None => pitch,
    };
    value as u8
}

/// Modulation parameters as written by `smpsModSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modulation {
    pub wait: u32,
    pub speed: u32,
    pub change: u32,
    pub step: u32,
}

impl Modulation {
    /// Convert to the target's encoding and truncate each field to a byte.
    pub fn convert(self, source: DriverVersion, target: DriverVersion) -> [u8; 4] {
        let Modulation {
            wait,
            speed,
            change,
            step,
        } = self;

        match FamilyCrossing::between(source, target) {
            FamilyCrossing::OldToNew => [
                wait.wrapping_add(1) as u8,
                speed as u8,
                change as u8,
                step.wrapping_add(1).wrapping_mul(speed) as u8,
            ],
            FamilyCrossing::NewToOld => [
                wait.wrapping_sub(1) as u8,
                speed as u8,
                change as u8,
                (zero_as_256(step) / zero_as_256(speed)).wrapping_sub(1) as u8,
            ],
            FamilyCrossing::None => [wait as u8, speed as u8, change as u8, step as u8],
        }
    }
}

fn zero_as_256(n: u32) -> u32 {
    if n == 0 {
        256
    } else {
        n
    }
}

/// Operator TL masks implied by an FM algorithm, indexed operator 1 to 4.
///
/// Carrier operators get bit 7 set; which operators are carriers depends on
/// the algorithm.
pub fn algorithm_tl_masks(algorithm: u32) -> [u8; 4] {
    let bit = |carrier: bool| if carrier { 0x80 } else { 0x00 };
    [
        0x80,
        bit(algorithm >= 5),
        bit(algorithm >= 4),
        bit(algorithm == 7),
    ]
}

/// Whether raw TL values carry bit 7 on an operator the algorithm marks as a carrier.
///
/// Such voices were written for drivers that set the masks themselves and
/// break in the Sonic 1/2 drivers, which take TL bytes as-is.
pub fn tl_mask_conflict(total_levels: [u32; 4], algorithm: u32) -> bool {
    algorithm_tl_masks(algorithm)
        .iter()
        .zip(total_levels.iter())
        .any(|(mask, tl)| mask & 0x80 != 0 && tl & 0x80 != 0)
}
