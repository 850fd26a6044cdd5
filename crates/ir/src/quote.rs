// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Identifier quote characters

use serde::{Deserialize, Serialize};

/// Delimiters a dialect uses to quote identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteCharacter {
    /// `` `name` `` (MySQL family)
    BackQuote,
    /// `"name"` (ANSI, PostgreSQL family, Oracle)
    Quote,
    /// `[name]` (SQL Server)
    Brackets,
    /// Identifiers are not quoted
    None,
}

impl QuoteCharacter {
    pub fn start_delimiter(self) -> &'static str {
        match self {
            QuoteCharacter::BackQuote => "`",
            QuoteCharacter::Quote => "\"",
            QuoteCharacter::Brackets => "[",
            QuoteCharacter::None => "",
        }
    }

    pub fn end_delimiter(self) -> &'static str {
        match self {
            QuoteCharacter::BackQuote => "`",
            QuoteCharacter::Quote => "\"",
            QuoteCharacter::Brackets => "]",
            QuoteCharacter::None => "",
        }
    }

    /// Find the quote character an identifier is wrapped in
    pub fn of(identifier: &str) -> Self {
        [
            QuoteCharacter::BackQuote,
            QuoteCharacter::Quote,
            QuoteCharacter::Brackets,
        ]
        .into_iter()
        .find(|quote| {
            identifier.len() >= 2
                && identifier.starts_with(quote.start_delimiter())
                && identifier.ends_with(quote.end_delimiter())
        })
        .unwrap_or(QuoteCharacter::None)
    }

    /// Wrap an identifier in this quote character
    pub fn wrap(self, identifier: &str) -> String {
        format!(
            "{}{}{}",
            self.start_delimiter(),
            identifier,
            self.end_delimiter()
        )
    }
}
