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

//! Line lexer for SMPS2ASM source.
//!
//! Each source line is split into an optional label and an optional
//! instruction (mnemonic plus comma-separated arguments). Comments start
//! with `;`. A label must start in the first column; it ends at the first
//! space, tab or colon.

mod tokens;

pub use tokens::Token;

use logos::Logos;

use crate::error::{CompileError, ErrorCode, Span};

/// A piece of source text together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub span: Span,
}

impl Word {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

/// A mnemonic and its argument words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Word,
    pub args: Vec<Word>,
}

impl Instruction {
    /// Span from the mnemonic to the last argument.
    pub fn span(&self) -> Span {
        match self.args.last() {
            Some(last) => self.mnemonic.span.merge(&last.span),
            None => self.mnemonic.span,
        }
    }
}

/// One meaningful line of source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number.
    pub line: usize,
    pub label: Option<Word>,
    pub instruction: Option<Instruction>,
}

/// Split `source` into lines, dropping blank and comment-only ones.
pub fn tokenize(source: &str) -> Result<Vec<SourceLine>, CompileError> {
    let mut lines = Vec::new();
    let mut current: Vec<(Token, Span)> = Vec::new();
    let mut line_start = 0;
    let mut line_number = 1;

    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        let token = result.map_err(|_| {
            CompileError::new(
                ErrorCode::UnexpectedToken,
                format!("Unexpected character sequence '{}'", lexer.slice()),
                span,
            )
        })?;

        if token == Token::Newline {
            if let Some(line) = parse_line(source, &current, line_start, line_number)? {
                lines.push(line);
            }
            current.clear();
            line_start = span.end;
            line_number += 1;
        } else {
            current.push((token, span));
        }
    }

    if let Some(line) = parse_line(source, &current, line_start, line_number)? {
        lines.push(line);
    }

    Ok(lines)
}

fn parse_line(
    source: &str,
    tokens: &[(Token, Span)],
    line_start: usize,
    line_number: usize,
) -> Result<Option<SourceLine>, CompileError> {
    let word = |span: Span| Word::new(&source[span.start..span.end], span);

    let mut rest = tokens
        .iter()
        .take_while(|(token, _)| *token != Token::Comment)
        .peekable();

    let label = match rest.peek() {
        Some((Token::Word, span)) if span.start == line_start => {
            let label = word(*span);
            rest.next();
            Some(label)
        }
        _ => None,
    };

    while matches!(rest.peek(), Some((Token::Whitespace | Token::Colon, _))) {
        rest.next();
    }

    let mnemonic = match rest.next() {
        None => None,
        Some((Token::Word, span)) => Some(word(*span)),
        Some((token, span)) => return Err(unexpected(*token, *span, "an instruction")),
    };

    let instruction = match mnemonic {
        None => None,
        Some(mnemonic) => {
            let mut args = Vec::new();
            let mut after_word = false;
            for (token, span) in rest {
                match token {
                    Token::Whitespace => {}
                    Token::Comma => after_word = false,
                    Token::Word if after_word => {
                        return Err(CompileError::new(
                            ErrorCode::ExpectedComma,
                            format!(
                                "Expected ',' before '{}'",
                                &source[span.start..span.end]
                            ),
                            *span,
                        )
                        .with_hint("separate arguments with commas"));
                    }
                    Token::Word => {
                        args.push(word(*span));
                        after_word = true;
                    }
                    other => return Err(unexpected(*other, *span, "an argument")),
                }
            }
            Some(Instruction { mnemonic, args })
        }
    };

    if label.is_none() && instruction.is_none() {
        return Ok(None);
    }

    Ok(Some(SourceLine {
        line: line_number,
        label,
        instruction,
    }))
}

fn unexpected(token: Token, span: Span, expected: &str) -> CompileError {
    CompileError::new(
        ErrorCode::UnexpectedToken,
        format!("Unexpected {}, expected {}", token.describe(), expected),
        span,
    )
}
