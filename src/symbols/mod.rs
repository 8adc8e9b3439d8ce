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

//! Symbol table and literal evaluation.
//!
//! Every assembly run owns one table. It starts out filled with the default
//! dictionary for the target driver; labels are added during the first pass.
//! Argument tokens are resolved through [`SymbolTable::resolve`], which also
//! keeps track of the most recent name that could not be found.

pub mod defaults;
mod literal;
mod symbol;

use std::collections::HashMap;

pub use defaults::populate_defaults;
pub use literal::{is_literal, parse_literal};
pub use symbol::{Symbol, SymbolKind};

use crate::driver::DriverVersion;
use crate::error::{CompileError, ErrorCode, Result, Span};

/// Result of resolving an argument token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The token is a literal or a known symbol.
    Value(u32),
    /// The token names a symbol that is not (yet) defined.
    Undefined(String),
}

impl Resolution {
    /// The resolved value, if any.
    pub fn value(&self) -> Option<u32> {
        match self {
            Resolution::Value(v) => Some(*v),
            Resolution::Undefined(_) => None,
        }
    }

    /// Whether resolution failed.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Resolution::Undefined(_))
    }
}

/// Name to value mapping for one assembly run.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
    undefined: Option<String>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table pre-populated with the default dictionary for `target`.
    pub fn with_defaults(target: DriverVersion) -> Result<Self> {
        let mut table = Self::new();
        populate_defaults(&mut table, target)?;
        Ok(table)
    }

    /// Add a symbol. Redefining an existing name is an error, even with the same value.
    pub fn define(&mut self, symbol: Symbol) -> Result<()> {
        if let Some(&existing) = self.index.get(&symbol.name) {
            let previous = &self.symbols[existing];
            let mut error = CompileError::new(
                ErrorCode::DuplicateSymbol,
                format!("Symbol '{}' is defined more than once", symbol.name),
                symbol.span,
            );
            if previous.is_label() {
                error = error.with_hint("labels must be unique within a song");
            } else {
                error = error.with_hint(format!(
                    "'{}' is a predefined constant (value ${:X})",
                    previous.name, previous.value
                ));
            }
            return Err(error);
        }

        self.index.insert(symbol.name.clone(), self.symbols.len());
        self.symbols.push(symbol);
        Ok(())
    }

    /// Shorthand for defining a builtin constant.
    pub fn define_builtin(&mut self, name: &str, value: u32) -> Result<()> {
        self.define(Symbol::builtin(name, value))
    }

    /// Look up a symbol by exact name.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    /// Value bound to `name`, if defined.
    pub fn value_of(&self, name: &str) -> Option<u32> {
        self.lookup(name).map(|s| s.value)
    }

    /// Resolve an argument token to a value.
    ///
    /// Literals always resolve. Unknown names are recorded as the current
    /// undefined symbol, replacing any earlier one.
    pub fn resolve(&mut self, token: &str) -> Resolution {
        if let Some(value) = parse_literal(token) {
            return Resolution::Value(value);
        }

        match self.value_of(token) {
            Some(value) => Resolution::Value(value),
            None => {
                self.undefined = Some(token.to_string());
                Resolution::Undefined(token.to_string())
            }
        }
    }

    /// The last name that failed to resolve since the marker was cleared.
    pub fn undefined(&self) -> Option<&str> {
        self.undefined.as_deref()
    }

    /// Reset the undefined-symbol marker.
    pub fn clear_undefined(&mut self) {
        self.undefined = None;
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate symbols in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

/// Build an `UndefinedSymbol` error for `name`.
pub fn undefined_symbol_error(name: &str, span: Span) -> CompileError {
    CompileError::new(
        ErrorCode::UndefinedSymbol,
        format!("Symbol '{}' is undefined", name),
        span,
    )
}
