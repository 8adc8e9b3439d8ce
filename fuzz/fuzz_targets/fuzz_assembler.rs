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

//! Fuzz target for the whole assembler.
//!
//! The input picks a target driver, an error policy and a source text. The
//! assembler must never panic, and a successful run must be reproducible.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_assembler -- -max_total_time=60

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use smps2bin::{assemble, AssemblerOptions, DriverVersion, ErrorPolicy};

#[derive(Debug, Arbitrary)]
struct Input {
    driver: u8,
    keep_going: bool,
    base_offset: u16,
    source: String,
}

fuzz_target!(|input: Input| {
    let Some(target) = DriverVersion::new(u32::from(input.driver % 5) + 1) else {
        return;
    };
    let options = AssemblerOptions::new(target)
        .with_base_offset(u32::from(input.base_offset))
        .with_error_policy(if input.keep_going {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Abort
        });

    if let Ok(first) = assemble(&input.source, &options) {
        let second = assemble(&input.source, &options).expect("second run failed");
        assert_eq!(first.code, second.code);
    }
});
