use std::fmt;

/// A symbol on a transition, either a single input character or the epsilon
/// symbol that is taken without consuming input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Epsilon,
    Character(char),
}

impl Symbol {
    /// Returns true iff this is the epsilon symbol.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    /// Returns the character of this symbol, or None for epsilon.
    pub fn character(&self) -> Option<char> {
        match self {
            Symbol::Epsilon => None,
            Symbol::Character(character) => Some(*character),
        }
    }
}

impl From<char> for Symbol {
    fn from(character: char) -> Self {
        Symbol::Character(character)
    }
}

impl From<Option<char>> for Symbol {
    fn from(character: Option<char>) -> Self {
        match character {
            Some(character) => Symbol::Character(character),
            None => Symbol::Epsilon,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::Character(character) => write!(f, "{character}"),
        }
    }
}
