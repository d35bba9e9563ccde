use std::fmt;

/// The abstract syntax tree of a regular expression.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Matches only the empty string.
    Empty,
    /// Matches exactly the given character.
    Literal(char),
    /// Matches the first pattern followed by the second pattern.
    Concatenate(Box<Pattern>, Box<Pattern>),
    /// Matches either of the patterns.
    Choose(Box<Pattern>, Box<Pattern>),
    /// Matches zero or more repetitions of the pattern.
    Repeat(Box<Pattern>),
}

impl Pattern {
    pub fn literal(character: char) -> Pattern {
        Pattern::Literal(character)
    }

    pub fn concatenate(first: Pattern, second: Pattern) -> Pattern {
        Pattern::Concatenate(Box::new(first), Box::new(second))
    }

    pub fn choose(first: Pattern, second: Pattern) -> Pattern {
        Pattern::Choose(Box::new(first), Box::new(second))
    }

    pub fn repeat(pattern: Pattern) -> Pattern {
        Pattern::Repeat(Box::new(pattern))
    }

    /// Returns how tightly the top-level operator binds, higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            Pattern::Choose(_, _) => 0,
            Pattern::Concatenate(_, _) => 1,
            Pattern::Repeat(_) => 2,
            Pattern::Empty | Pattern::Literal(_) => 3,
        }
    }

    /// Writes the pattern, between parentheses when it binds weaker than the
    /// enclosing operator.
    fn bracket(&self, f: &mut fmt::Formatter<'_>, outer_precedence: u8) -> fmt::Result {
        if self.precedence() < outer_precedence {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl From<char> for Pattern {
    fn from(character: char) -> Self {
        Pattern::Literal(character)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Empty => Ok(()),
            Pattern::Literal(character) => write!(f, "{character}"),
            Pattern::Concatenate(first, second) => {
                first.bracket(f, self.precedence())?;
                second.bracket(f, self.precedence())
            }
            Pattern::Choose(first, second) => {
                first.bracket(f, self.precedence())?;
                write!(f, "|")?;
                second.bracket(f, self.precedence())
            }
            Pattern::Repeat(pattern) => {
                pattern.bracket(f, self.precedence())?;
                write!(f, "*")
            }
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{self}/")
    }
}
