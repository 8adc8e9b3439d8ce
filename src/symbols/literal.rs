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

//! Numeric literal recognition.
//!
//! Literals are decimal (`42`), hexadecimal (`$2A`) or either of those with a
//! leading minus sign. Parsing is lenient: the longest run of valid digits is
//! used and anything after it is ignored.

/// Whether a token is treated as a literal instead of a symbol name.
pub fn is_literal(token: &str) -> bool {
    matches!(token.as_bytes().first(), Some(b'-' | b'$' | b'0'..=b'9'))
}

/// Parse a literal token into a wrapping 32-bit value.
///
/// Returns `None` if the token does not look like a literal at all.
pub fn parse_literal(token: &str) -> Option<u32> {
    if !is_literal(token) {
        return None;
    }

    let (negative, rest) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    let value = match rest.strip_prefix('$') {
        Some(hex) => accumulate(hex, 16),
        None => accumulate(rest, 10),
    };

    Some(if negative { value.wrapping_neg() } else { value })
}

fn accumulate(digits: &str, radix: u32) -> u32 {
    digits
        .chars()
        .map_while(|c| c.to_digit(radix))
        .fold(0u32, |acc, d| acc.wrapping_mul(radix).wrapping_add(d))
}
