use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 20;

/// Normalized market symbol/ticker.
///
/// Search results include exchange-suffixed and numeric listings (`TSCO.LON`,
/// `600104.SHH`) as well as index and currency codes (`^GSPC`, `EURUSD=X`), so any ASCII
/// alphanumeric plus `.`, `-`, `^` and `=` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '^' | '=');
            if !valid {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_symbol() {
        let parsed = Symbol::parse(" ibm ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "IBM");
    }

    #[test]
    fn accepts_exchange_suffixed_and_numeric_listings() {
        assert_eq!(Symbol::parse("tsco.lon").expect("suffix").as_str(), "TSCO.LON");
        assert_eq!(Symbol::parse("600104.SHH").expect("numeric").as_str(), "600104.SHH");
        assert_eq!(Symbol::parse("^gspc").expect("index").as_str(), "^GSPC");
    }

    #[test]
    fn rejects_invalid_chars() {
        let err = Symbol::parse("IBM$").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { ch: '$', index: 3 }));
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(Symbol::parse("   "), Err(ValidationError::EmptySymbol));
    }
}
