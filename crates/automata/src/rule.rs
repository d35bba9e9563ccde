use std::fmt;

use itertools::Itertools;

use crate::Configuration;
use crate::Stack;
use crate::State;
use crate::Symbol;

/// A transition `from --symbol--> to` of a finite automaton.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaRule<S> {
    pub from: S,
    pub symbol: Symbol,
    pub to: S,
}

impl<S: State> FaRule<S> {
    /// Constructs a new rule.
    pub fn new(from: S, symbol: impl Into<Symbol>, to: S) -> Self {
        Self {
            from,
            symbol: symbol.into(),
            to,
        }
    }

    /// Constructs a new epsilon rule.
    pub fn epsilon(from: S, to: S) -> Self {
        Self::new(from, Symbol::Epsilon, to)
    }

    /// Returns true iff this rule can be taken from the given state when reading the given symbol.
    pub fn applies_to(&self, state: &S, symbol: Symbol) -> bool {
        self.from == *state && self.symbol == symbol
    }

    /// Returns the state reached by this rule.
    pub fn follow(&self) -> &S {
        &self.to
    }
}

impl<S: fmt::Debug> fmt::Debug for FaRule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} --[{}]-> {:?}", self.from, self.symbol, self.to)
    }
}

/// A transition of a pushdown automaton. It can be taken when the automaton is
/// in state `from`, reads `symbol` and `pop` is on top of the stack. The top is
/// then replaced by `push`, where the first character ends up on top.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PdaRule<S> {
    pub from: S,
    pub symbol: Symbol,
    pub to: S,
    pub pop: char,
    pub push: Vec<char>,
}

impl<S: State> PdaRule<S> {
    /// Constructs a new rule, the characters of `push` are given top first.
    pub fn new(from: S, symbol: impl Into<Symbol>, to: S, pop: char, push: &str) -> Self {
        Self {
            from,
            symbol: symbol.into(),
            to,
            pop,
            push: push.chars().collect(),
        }
    }

    /// Returns true iff this rule applies to the given configuration and symbol.
    pub fn applies_to(&self, configuration: &Configuration<S>, symbol: Symbol) -> bool {
        configuration.state() == Some(&self.from)
            && configuration.stack().top() == Some(self.pop)
            && self.symbol == symbol
    }

    /// Returns the configuration that results from taking this rule.
    pub fn follow(&self, configuration: &Configuration<S>) -> Configuration<S> {
        Configuration::new(self.to.clone(), self.next_stack(configuration.stack()))
    }

    /// Pops the top of the stack and pushes the push characters.
    fn next_stack(&self, stack: &Stack) -> Stack {
        self.push
            .iter()
            .rev()
            .fold(stack.pop(), |stack, &symbol| stack.push(symbol))
    }
}

impl<S: fmt::Debug> fmt::Debug for PdaRule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} --[{};{}/{}]-> {:?}",
            self.from,
            self.symbol,
            self.pop,
            self.push.iter().format(""),
            self.to
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_fa_rule_applies_to() {
        let rule = FaRule::new(1, 'a', 2);

        assert!(rule.applies_to(&1, Symbol::from('a')));
        assert!(!rule.applies_to(&1, Symbol::from('b')));
        assert!(!rule.applies_to(&2, Symbol::from('a')));
        assert!(!rule.applies_to(&1, Symbol::Epsilon));
        assert_eq!(*rule.follow(), 2);
    }

    #[test]
    fn test_pda_rule_follow() {
        let rule = PdaRule::new(1, '(', 2, '$', "b$");
        let configuration = Configuration::new(1, Stack::new(['$']));

        assert!(rule.applies_to(&configuration, Symbol::from('(')));
        assert!(!rule.applies_to(&configuration.stuck(), Symbol::from('(')));

        let next = rule.follow(&configuration);
        assert_eq!(next.state(), Some(&2));
        assert_eq!(next.stack().iter().collect::<String>(), "b$");
    }
}
