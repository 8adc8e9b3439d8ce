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

//! Raw token definitions for SMPS2ASM source.

use logos::Logos;

/// A raw token as produced by the `logos` lexer.
///
/// Anything that is not a separator is part of a word; words are
/// classified into labels, mnemonics and arguments by their position
/// on the line.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A run of non-separator characters.
    #[regex(r"[^ \t:,;\r\n]+")]
    Word,

    /// `:` after a label.
    #[token(":")]
    Colon,

    /// `,` between arguments.
    #[token(",")]
    Comma,

    /// Spaces and tabs.
    #[regex(r"[ \t]+")]
    Whitespace,

    /// `;` up to the end of the line.
    #[regex(r";[^\r\n]*")]
    Comment,

    /// A line break (`\n`, `\r\n` or `\r`).
    #[regex(r"\r\n|\r|\n")]
    Newline,
}

impl Token {
    /// Short description used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Token::Word => "word",
            Token::Colon => "':'",
            Token::Comma => "','",
            Token::Whitespace => "whitespace",
            Token::Comment => "comment",
            Token::Newline => "end of line",
        }
    }
}
