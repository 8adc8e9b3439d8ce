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

//! Main tempo modifier conversion between driver families.
//!
//! Sonic 1 counts tempo as a timeout, Sonic 2 as an overflow accumulator and
//! Sonic 3 onwards as the complement of Sonic 2's. Validity is judged on
//! the whole modifier; only its low 8 bits are converted.

use crate::driver::DriverVersion;

/// Outcome of a successful tempo conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempoConversion {
    /// The converted modifier byte.
    pub value: u8,
    /// Set when the source value has no exact equivalent.
    pub approximate: bool,
}

/// A modifier the source driver cannot have produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTempo {
    pub value: u32,
    pub source: DriverVersion,
}

fn zero_as_256(n: u32) -> u32 {
    if n == 0 {
        256
    } else {
        n
    }
}

/// Sonic 2 to Sonic 1.
pub fn s2_to_s1(n: u8) -> u8 {
    let n = n as u32;
    (((768 - n) >> 1) / (256 - n)) as u8
}

/// Sonic 2 to Sonic 3.
pub fn s2_to_s3(n: u8) -> u8 {
    (256 - (n.max(1) as u32)) as u8
}

/// Sonic 1 to Sonic 2.
pub fn s1_to_s2(n: u8) -> u8 {
    let c = zero_as_256(n as u32);
    ((((c - 1) << 8) + (c >> 1)) / c) as u8
}

/// Sonic 1 to Sonic 3.
pub fn s1_to_s3(n: u8) -> u8 {
    s2_to_s3(s1_to_s2(n))
}

/// Sonic 3 to Sonic 1.
pub fn s3_to_s1(n: u8) -> u8 {
    s2_to_s1(s2_to_s3(n))
}

/// Sonic 3 to Sonic 2.
pub fn s3_to_s2(n: u8) -> u8 {
    s2_to_s3(n)
}

/// Convert a main tempo modifier written for `source` into one for `target`.
pub fn convert_main_tempo(
    modifier: u32,
    source: DriverVersion,
    target: DriverVersion,
) -> Result<TempoConversion, InvalidTempo> {
    let n = modifier as u8;
    let exact = |value| Ok(TempoConversion { value, approximate: false });

    if source == target || (source.is_new_family() && target.is_new_family()) {
        return exact(n);
    }

    match source.number() {
        1 => {
            if modifier == 1 {
                return Err(InvalidTempo {
                    value: modifier,
                    source,
                });
            }
            if target == DriverVersion::SONIC_2 {
                exact(s1_to_s2(n))
            } else {
                exact(s1_to_s3(n))
            }
        }
        2 => {
            if modifier == 0 {
                return Err(InvalidTempo {
                    value: modifier,
                    source,
                });
            }
            if target == DriverVersion::SONIC_1 {
                exact(s2_to_s1(n))
            } else {
                exact(s2_to_s3(n))
            }
        }
        _ => {
            let value = if target == DriverVersion::SONIC_1 {
                s3_to_s1(n)
            } else {
                s3_to_s2(n)
            };
            Ok(TempoConversion {
                value,
                approximate: modifier == 0,
            })
        }
    }
}
