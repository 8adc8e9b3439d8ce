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

//! Symbol table entries.

use crate::error::Span;

/// Where a symbol came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// Populated from the default dictionary before assembly starts.
    Builtin,
    /// Bound by a label to the logical address it precedes.
    Label,
}

/// A named 32-bit value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The symbol name.
    pub name: String,
    /// The bound value.
    pub value: u32,
    /// Where the symbol came from.
    pub kind: SymbolKind,
    /// The label's span, or an empty span for builtins.
    pub span: Span,
}

impl Symbol {
    /// Create a builtin constant.
    pub fn builtin(name: impl Into<String>, value: u32) -> Self {
        Self {
            name: name.into(),
            value,
            kind: SymbolKind::Builtin,
            span: Span::default(),
        }
    }

    /// Create a label bound to a logical address.
    pub fn label(name: impl Into<String>, address: u32, span: Span) -> Self {
        Self {
            name: name.into(),
            value: address,
            kind: SymbolKind::Label,
            span,
        }
    }

    /// Whether this symbol was defined by a label.
    pub fn is_label(&self) -> bool {
        self.kind == SymbolKind::Label
    }
}
