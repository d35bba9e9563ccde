use std::fmt;

use log::trace;
use rustc_hash::FxHashMap;

use kleene_collections::IndexedSet;
use kleene_collections::VecSet;

use crate::FaRule;
use crate::RulebookError;
use crate::State;
use crate::StateIndex;
use crate::Symbol;

/// The rules of a deterministic finite automaton, at most one rule for every
/// state and symbol.
#[derive(Clone)]
pub struct DfaRulebook<S> {
    rules: Vec<FaRule<S>>,

    /// For every state the index of the rule for each symbol.
    index: FxHashMap<S, FxHashMap<Symbol, usize>>,
}

impl<S: State> DfaRulebook<S> {
    /// Creates a rulebook from the given rules.
    ///
    /// Returns [RulebookError::AmbiguousRule] if two rules share the same state
    /// and symbol.
    pub fn new(rules: Vec<FaRule<S>>) -> Result<Self, RulebookError> {
        let mut index: FxHashMap<S, FxHashMap<Symbol, usize>> = FxHashMap::default();

        for (i, rule) in rules.iter().enumerate() {
            if index.entry(rule.from.clone()).or_default().insert(rule.symbol, i).is_some() {
                return Err(RulebookError::AmbiguousRule {
                    state: format!("{:?}", rule.from),
                    symbol: rule.symbol,
                });
            }
        }

        Ok(Self { rules, index })
    }

    /// Returns the rule that applies to the given state and symbol, if any.
    pub fn rule_for(&self, state: &S, symbol: Symbol) -> Option<&FaRule<S>> {
        let rule = &self.rules[*self.index.get(state)?.get(&symbol)?];
        debug_assert!(rule.applies_to(state, symbol), "The index must point to an applicable rule");
        Some(rule)
    }

    /// Returns the state reached from `state` by reading `symbol`.
    pub fn next_state(&self, state: &S, symbol: Symbol) -> Result<&S, RulebookError> {
        self.rule_for(state, symbol)
            .map(|rule| rule.follow())
            .ok_or_else(|| RulebookError::NoApplicableRule {
                state: format!("{state:?}"),
                symbol,
            })
    }

    /// Returns all the rules.
    pub fn rules(&self) -> &[FaRule<S>] {
        &self.rules
    }

    /// Returns all characters that occur on the rules.
    pub fn alphabet(&self) -> VecSet<char> {
        self.rules.iter().filter_map(|rule| rule.symbol.character()).collect()
    }
}

impl<S: fmt::Debug> fmt::Debug for DfaRulebook<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule:?}")?;
        }

        Ok(())
    }
}

/// A run of a deterministic finite automaton.
///
/// Reading a character for which the rulebook has no rule is an error, which
/// is returned to the caller and leaves the current state unchanged.
pub struct Dfa<'a, S> {
    current_state: S,
    accept_states: &'a VecSet<S>,
    rulebook: &'a DfaRulebook<S>,
}

impl<'a, S: State> Dfa<'a, S> {
    /// Creates a new automaton in the given state.
    pub fn new(current_state: S, accept_states: &'a VecSet<S>, rulebook: &'a DfaRulebook<S>) -> Self {
        Self {
            current_state,
            accept_states,
            rulebook,
        }
    }

    /// Returns the current state.
    pub fn current_state(&self) -> &S {
        &self.current_state
    }

    /// Returns true iff the current state is an accept state.
    pub fn is_accepting(&self) -> bool {
        self.accept_states.contains(&self.current_state)
    }

    /// Reads a single character.
    pub fn read_symbol(&mut self, character: char) -> Result<(), RulebookError> {
        let next = self.rulebook.next_state(&self.current_state, Symbol::from(character))?;
        trace!("{:?} --[{character}]-> {next:?}", self.current_state);

        self.current_state = next.clone();
        Ok(())
    }

    /// Reads all the characters of the given input.
    pub fn read_string(&mut self, input: &str) -> Result<(), RulebookError> {
        for character in input.chars() {
            self.read_symbol(character)?;
        }

        Ok(())
    }
}

/// The definition of a deterministic finite automaton, from which fresh runs
/// can be started.
#[derive(Clone)]
pub struct DfaDesign<S> {
    start_state: S,
    accept_states: VecSet<S>,
    rulebook: DfaRulebook<S>,
}

impl<S: State> DfaDesign<S> {
    /// Creates a new design.
    pub fn new(start_state: S, accept_states: impl IntoIterator<Item = S>, rulebook: DfaRulebook<S>) -> Self {
        Self {
            start_state,
            accept_states: accept_states.into_iter().collect(),
            rulebook,
        }
    }

    /// Returns a fresh automaton in the start state.
    pub fn to_dfa(&self) -> Dfa<'_, S> {
        Dfa::new(self.start_state.clone(), &self.accept_states, &self.rulebook)
    }

    /// Returns true iff the automaton accepts the given input.
    ///
    /// Fails when the input contains a character for which no rule applies.
    pub fn accepts(&self, input: &str) -> Result<bool, RulebookError> {
        let mut dfa = self.to_dfa();
        dfa.read_string(input)?;
        Ok(dfa.is_accepting())
    }

    pub fn start_state(&self) -> &S {
        &self.start_state
    }

    pub fn accept_states(&self) -> &VecSet<S> {
        &self.accept_states
    }

    pub fn rulebook(&self) -> &DfaRulebook<S> {
        &self.rulebook
    }

    /// Returns the set of all states that occur in this design.
    pub fn states(&self) -> VecSet<S> {
        let mut states: VecSet<S> = self
            .rulebook
            .rules()
            .iter()
            .flat_map(|rule| [rule.from.clone(), rule.to.clone()])
            .collect();
        states.insert(self.start_state.clone());
        states.union(&self.accept_states)
    }

    /// Returns an equivalent design where the states are numbered in the order
    /// in which they are first encountered, the start state becomes zero.
    pub fn relabel(&self) -> DfaDesign<StateIndex> {
        let mut numbering: IndexedSet<S> = IndexedSet::new();
        let mut number = |state: &S| StateIndex::new(*numbering.insert(state.clone()).0);

        let start_state = number(&self.start_state);
        let rules: Vec<FaRule<StateIndex>> = self
            .rulebook
            .rules()
            .iter()
            .map(|rule| FaRule::new(number(&rule.from), rule.symbol, number(&rule.to)))
            .collect();
        let accept_states: Vec<StateIndex> = self.accept_states.iter().map(&mut number).collect();

        DfaDesign::new(
            start_state,
            accept_states,
            DfaRulebook::new(rules).expect("Numbering the states preserves determinism"),
        )
    }
}

impl<S: fmt::Debug> fmt::Debug for DfaDesign<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Start state: {:?}", self.start_state)?;
        writeln!(f, "Accept states: {:?}", self.accept_states)?;
        write!(f, "{:?}", self.rulebook)
    }
}
