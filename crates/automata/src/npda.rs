use std::fmt;

use log::trace;
use log::warn;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use kleene_collections::VecSet;

use crate::Configuration;
use crate::PdaRule;
use crate::Stack;
use crate::State;
use crate::Symbol;

/// The rules of a nondeterministic pushdown automaton.
#[derive(Clone)]
pub struct NpdaRulebook<S> {
    rules: Vec<PdaRule<S>>,

    /// For every state the indices of its outgoing rules.
    outgoing: FxHashMap<S, Vec<usize>>,

    /// The amount by which epsilon rules can grow the stack in a finite epsilon-closure.
    max_free_growth: usize,
}

impl<S: State> NpdaRulebook<S> {
    /// Creates a rulebook from the given rules, the order of the rules is irrelevant.
    pub fn new(rules: Vec<PdaRule<S>>) -> Self {
        let mut outgoing: FxHashMap<S, Vec<usize>> = FxHashMap::default();
        for (i, rule) in rules.iter().enumerate() {
            outgoing.entry(rule.from.clone()).or_default().push(i);
        }

        // Every chain of epsilon rules that grows the stack further than this
        // applies the rule for some state and top twice, without touching the
        // stack below in between. That part can then be repeated forever.
        let epsilon_rules = rules.iter().filter(|rule| rule.symbol.is_epsilon());
        let keys: FxHashSet<(&S, char)> = epsilon_rules.clone().map(|rule| (&rule.from, rule.pop)).collect();
        let growth = epsilon_rules
            .map(|rule| rule.push.len().saturating_sub(1))
            .max()
            .unwrap_or(0);
        let max_free_growth = keys.len() * growth;

        Self {
            rules,
            outgoing,
            max_free_growth,
        }
    }

    /// Returns the rules that apply to the given configuration and symbol.
    pub fn rules_for<'a>(
        &'a self,
        configuration: &'a Configuration<S>,
        symbol: Symbol,
    ) -> impl Iterator<Item = &'a PdaRule<S>> {
        configuration
            .state()
            .and_then(|state| self.outgoing.get(state))
            .into_iter()
            .flatten()
            .map(|&i| &self.rules[i])
            .filter(move |rule| rule.applies_to(configuration, symbol))
    }

    /// Returns the configurations reached from `configuration` by one rule labelled with `symbol`.
    pub fn follow_rules_for(&self, configuration: &Configuration<S>, symbol: Symbol) -> Vec<Configuration<S>> {
        self.rules_for(configuration, symbol)
            .map(|rule| rule.follow(configuration))
            .collect()
    }

    /// Returns the union of the configurations reached from any of the given
    /// configurations by one rule labelled with `symbol`.
    pub fn next_configurations(
        &self,
        configurations: &VecSet<Configuration<S>>,
        symbol: Symbol,
    ) -> VecSet<Configuration<S>> {
        configurations
            .iter()
            .flat_map(|configuration| self.follow_rules_for(configuration, symbol))
            .collect()
    }

    /// Returns the epsilon-closure of the given configurations.
    ///
    /// Epsilon rules that grow the stack without bound have an infinite
    /// closure. Configurations whose stack is more than `max_free_growth`
    /// longer than the longest given stack only occur in such a closure, these
    /// are left out and a warning is logged.
    pub fn follow_free_moves(&self, configurations: &VecSet<Configuration<S>>) -> VecSet<Configuration<S>> {
        let max_height = configurations
            .iter()
            .map(|configuration| configuration.stack().len())
            .max()
            .unwrap_or(0)
            + self.max_free_growth;

        let mut discovered: FxHashSet<Configuration<S>> = configurations.iter().cloned().collect();
        let mut queue: Vec<Configuration<S>> = configurations.iter().cloned().collect();
        let mut truncated = false;

        while let Some(configuration) = queue.pop() {
            for next in self.follow_rules_for(&configuration, Symbol::Epsilon) {
                if next.stack().len() > max_height {
                    truncated = true;
                    continue;
                }

                if discovered.insert(next.clone()) {
                    queue.push(next);
                }
            }
        }

        if truncated {
            warn!("Epsilon rules grow the stack beyond {max_height} symbols, the epsilon-closure is infinite and has been truncated");
        }

        discovered.into_iter().collect()
    }

    /// Returns all the rules.
    pub fn rules(&self) -> &[PdaRule<S>] {
        &self.rules
    }
}

impl<S: fmt::Debug> fmt::Debug for NpdaRulebook<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule:?}")?;
        }

        Ok(())
    }
}

/// A run of a nondeterministic pushdown automaton.
///
/// The set of current configurations is always closed under epsilon rules.
/// Configurations for which no rule applies disappear from the set.
pub struct Npda<'a, S> {
    current_configurations: VecSet<Configuration<S>>,
    accept_states: &'a VecSet<S>,
    rulebook: &'a NpdaRulebook<S>,
}

impl<'a, S: State> Npda<'a, S> {
    /// Creates a new automaton in the epsilon-closure of the given configurations.
    pub fn new(
        current_configurations: VecSet<Configuration<S>>,
        accept_states: &'a VecSet<S>,
        rulebook: &'a NpdaRulebook<S>,
    ) -> Self {
        Self {
            current_configurations: rulebook.follow_free_moves(&current_configurations),
            accept_states,
            rulebook,
        }
    }

    /// Returns the current configurations.
    pub fn current_configurations(&self) -> &VecSet<Configuration<S>> {
        &self.current_configurations
    }

    /// Returns true iff the state of one of the current configurations is an accept state.
    pub fn is_accepting(&self) -> bool {
        self.current_configurations.iter().any(|configuration| {
            configuration
                .state()
                .is_some_and(|state| self.accept_states.contains(state))
        })
    }

    /// Reads a single character.
    pub fn read_symbol(&mut self, character: char) {
        let next = self
            .rulebook
            .next_configurations(&self.current_configurations, Symbol::from(character));
        self.current_configurations = self.rulebook.follow_free_moves(&next);

        trace!("--[{character}]-> {:?}", self.current_configurations);
    }

    /// Reads all the characters of the given input.
    pub fn read_string(&mut self, input: &str) {
        for character in input.chars() {
            self.read_symbol(character);
        }
    }
}

/// The definition of a nondeterministic pushdown automaton. Runs start in the
/// start state with only the bottom character on the stack.
#[derive(Clone)]
pub struct NpdaDesign<S> {
    start_state: S,
    bottom_character: char,
    accept_states: VecSet<S>,
    rulebook: NpdaRulebook<S>,
}

impl<S: State> NpdaDesign<S> {
    /// Creates a new design.
    pub fn new(
        start_state: S,
        bottom_character: char,
        accept_states: impl IntoIterator<Item = S>,
        rulebook: NpdaRulebook<S>,
    ) -> Self {
        Self {
            start_state,
            bottom_character,
            accept_states: accept_states.into_iter().collect(),
            rulebook,
        }
    }

    /// Returns the configuration in which every run starts.
    pub fn start_configuration(&self) -> Configuration<S> {
        Configuration::new(self.start_state.clone(), Stack::new([self.bottom_character]))
    }

    /// Returns a fresh automaton in the start configuration.
    pub fn to_npda(&self) -> Npda<'_, S> {
        Npda::new(
            VecSet::singleton(self.start_configuration()),
            &self.accept_states,
            &self.rulebook,
        )
    }

    /// Returns true iff the automaton accepts the given input.
    pub fn accepts(&self, input: &str) -> bool {
        let mut npda = self.to_npda();
        npda.read_string(input);
        npda.is_accepting()
    }

    pub fn accept_states(&self) -> &VecSet<S> {
        &self.accept_states
    }

    pub fn rulebook(&self) -> &NpdaRulebook<S> {
        &self.rulebook
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use kleene_collections::vecset;
    use test_log::test;

    /// Accepts the palindromes of even length over `a` and `b`.
    fn even_palindromes() -> NpdaRulebook<u32> {
        NpdaRulebook::new(vec![
            PdaRule::new(1, 'a', 1, '$', "a$"),
            PdaRule::new(1, 'a', 1, 'a', "aa"),
            PdaRule::new(1, 'a', 1, 'b', "ab"),
            PdaRule::new(1, 'b', 1, '$', "b$"),
            PdaRule::new(1, 'b', 1, 'a', "ba"),
            PdaRule::new(1, 'b', 1, 'b', "bb"),
            PdaRule::new(1, Symbol::Epsilon, 2, '$', "$"),
            PdaRule::new(1, Symbol::Epsilon, 2, 'a', "a"),
            PdaRule::new(1, Symbol::Epsilon, 2, 'b', "b"),
            PdaRule::new(2, 'a', 2, 'a', ""),
            PdaRule::new(2, 'b', 2, 'b', ""),
            PdaRule::new(2, Symbol::Epsilon, 3, '$', "$"),
        ])
    }

    #[test]
    fn test_npda_read_string() {
        let rulebook = even_palindromes();
        let accept_states = vecset![3];
        let mut npda = Npda::new(
            vecset![Configuration::new(1, Stack::new(['$']))],
            &accept_states,
            &rulebook,
        );

        // The empty word is an even palindrome.
        assert!(npda.is_accepting());
        assert_eq!(npda.current_configurations().len(), 3);

        npda.read_string("abb");
        assert!(!npda.is_accepting());
        assert_eq!(
            npda.current_configurations(),
            &vecset![
                Configuration::new(1, Stack::new("bba$".chars())),
                Configuration::new(2, Stack::new("bba$".chars())),
                Configuration::new(2, Stack::new("a$".chars())),
            ]
        );

        npda.read_symbol('a');
        assert!(npda.is_accepting());
    }

    #[test]
    fn test_npda_design_accepts() {
        let design = NpdaDesign::new(1, '$', [3], even_palindromes());

        assert!(design.accepts(""));
        assert!(design.accepts("abba"));
        assert!(design.accepts("babbaabbab"));
        assert!(!design.accepts("abb"));
        assert!(!design.accepts("baabaa"));
        assert!(!design.accepts("abc"));
    }

    #[test]
    fn test_npda_dead_configurations_vanish() {
        let rulebook = even_palindromes();
        let design = NpdaDesign::new(1, '$', [3], rulebook);

        let mut npda = design.to_npda();
        npda.read_symbol('c');
        assert!(npda.current_configurations().is_empty());
        assert!(!npda.is_accepting());
    }

    #[test]
    fn test_npda_growing_epsilon_rules_terminate() {
        let rulebook = NpdaRulebook::new(vec![
            PdaRule::new(1, Symbol::Epsilon, 1, '$', "x$"),
            PdaRule::new(1, Symbol::Epsilon, 1, 'x', "xx"),
        ]);
        let design = NpdaDesign::new(1, '$', [2], rulebook);

        assert!(!design.accepts(""));
    }

    #[test]
    fn test_npda_finite_growing_epsilon_closure() {
        let rulebook = NpdaRulebook::new(vec![
            PdaRule::new(1, Symbol::Epsilon, 2, '$', "xyz$"),
            PdaRule::new(2, Symbol::Epsilon, 3, 'x', "xx"),
            PdaRule::new(3, Symbol::Epsilon, 4, 'x', "xxx"),
        ]);
        let design = NpdaDesign::new(1, '$', [4], rulebook);

        let npda = design.to_npda();
        assert!(npda.is_accepting());
        assert!(
            npda.current_configurations()
                .contains(&Configuration::new(4, Stack::new("xxxxyz$".chars())))
        );
    }

    #[test]
    fn test_npda_wide_frontier_closure() {
        // Pushes either x or y for every a, so reading a^n leads to 2^n stacks.
        let rulebook = NpdaRulebook::new(vec![
            PdaRule::new(1, 'a', 1, '$', "x$"),
            PdaRule::new(1, 'a', 1, '$', "y$"),
            PdaRule::new(1, 'a', 1, 'x', "xx"),
            PdaRule::new(1, 'a', 1, 'x', "yx"),
            PdaRule::new(1, 'a', 1, 'y', "xy"),
            PdaRule::new(1, 'a', 1, 'y', "yy"),
            PdaRule::new(1, Symbol::Epsilon, 2, '$', "$"),
            PdaRule::new(1, Symbol::Epsilon, 2, 'x', "x"),
            PdaRule::new(1, Symbol::Epsilon, 2, 'y', "y"),
        ]);
        let design = NpdaDesign::new(1, '$', [2], rulebook);

        let mut npda = design.to_npda();
        npda.read_string(&"a".repeat(14));
        assert!(npda.is_accepting());
        assert_eq!(npda.current_configurations().len(), 2 * (1 << 14));

        for n in [0, 1, 13, 15] {
            assert!(design.accepts(&"a".repeat(n)));
        }
        assert!(!design.accepts("ab"));
    }
}
