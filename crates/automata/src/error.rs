use thiserror::Error;

use crate::Symbol;

/// Errors raised by the deterministic rulebooks, the state is stored in its debug representation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulebookError {
    #[error("No applicable rule for state {state} and symbol {symbol}")]
    NoApplicableRule { state: String, symbol: Symbol },

    #[error("Deterministic rulebook has multiple rules for state {state} and symbol {symbol}")]
    AmbiguousRule { state: String, symbol: Symbol },
}
