use std::fmt;

use log::trace;
use log::warn;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use kleene_collections::VecSet;

use crate::Configuration;
use crate::PdaRule;
use crate::RulebookError;
use crate::State;
use crate::Symbol;

/// The rules of a deterministic pushdown automaton, at most one rule for every
/// state, symbol and top of the stack.
#[derive(Clone)]
pub struct DpdaRulebook<S> {
    rules: Vec<PdaRule<S>>,

    /// For every state the index of the rule for each (symbol, top of stack).
    index: FxHashMap<S, FxHashMap<(Symbol, char), usize>>,
}

impl<S: State> DpdaRulebook<S> {
    /// Creates a rulebook from the given rules.
    ///
    /// Returns [RulebookError::AmbiguousRule] if two rules share the same state,
    /// symbol and popped character.
    pub fn new(rules: Vec<PdaRule<S>>) -> Result<Self, RulebookError> {
        let mut index: FxHashMap<S, FxHashMap<(Symbol, char), usize>> = FxHashMap::default();

        for (i, rule) in rules.iter().enumerate() {
            if index
                .entry(rule.from.clone())
                .or_default()
                .insert((rule.symbol, rule.pop), i)
                .is_some()
            {
                return Err(RulebookError::AmbiguousRule {
                    state: format!("{:?} with {} on top", rule.from, rule.pop),
                    symbol: rule.symbol,
                });
            }
        }

        Ok(Self { rules, index })
    }

    /// Returns the rule that applies to the given configuration and symbol, if any.
    pub fn rule_for(&self, configuration: &Configuration<S>, symbol: Symbol) -> Option<&PdaRule<S>> {
        let top = configuration.stack().top()?;
        let rule = &self.rules[*self.index.get(configuration.state()?)?.get(&(symbol, top))?];
        debug_assert!(
            rule.applies_to(configuration, symbol),
            "The index must point to an applicable rule"
        );
        Some(rule)
    }

    /// Returns true iff a rule applies to the given configuration and symbol.
    pub fn applies_to(&self, configuration: &Configuration<S>, symbol: Symbol) -> bool {
        self.rule_for(configuration, symbol).is_some()
    }

    /// Returns the configuration reached by reading `symbol`.
    pub fn next_configuration(
        &self,
        configuration: &Configuration<S>,
        symbol: Symbol,
    ) -> Result<Configuration<S>, RulebookError> {
        self.rule_for(configuration, symbol)
            .map(|rule| rule.follow(configuration))
            .ok_or_else(|| RulebookError::NoApplicableRule {
                state: format!("{configuration:?}"),
                symbol,
            })
    }

    /// Follows epsilon rules for as long as one applies.
    ///
    /// A run of epsilon rules that never ends returns the stuck configuration.
    /// Such a run is detected when a rule for the same state and top of the
    /// stack is applied twice, and the stack never became shorter than it was
    /// the first time. From there on the same rules repeat forever.
    pub fn follow_free_move(&self, configuration: Configuration<S>) -> Configuration<S> {
        let mut configuration = configuration;

        // The (state, top) pairs seen since the stack was last shorter than
        // their height, ordered by height.
        let mut marks: Vec<(usize, (S, char))> = Vec::new();
        let mut seen: FxHashSet<(S, char)> = FxHashSet::default();

        while let Some(rule) = self.rule_for(&configuration, Symbol::Epsilon) {
            let height = configuration.stack().len();
            while marks.last().is_some_and(|(mark, _)| *mark > height) {
                if let Some((_, key)) = marks.pop() {
                    seen.remove(&key);
                }
            }

            let key = (rule.from.clone(), rule.pop);
            if !seen.insert(key.clone()) {
                warn!(
                    "The epsilon rule {rule:?} repeats without shrinking the stack, the rulebook contains an epsilon cycle"
                );
                return configuration.stuck();
            }
            marks.push((height, key));

            configuration = rule.follow(&configuration);
            trace!("--[ε]-> {configuration:?}");
        }

        configuration
    }

    /// Returns all the rules.
    pub fn rules(&self) -> &[PdaRule<S>] {
        &self.rules
    }
}

impl<S: fmt::Debug> fmt::Debug for DpdaRulebook<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule:?}")?;
        }

        Ok(())
    }
}

/// A run of a deterministic pushdown automaton.
///
/// Reading a character for which no rule applies moves the automaton into the
/// stuck configuration, after which the remaining input is ignored and the
/// automaton never accepts.
pub struct Dpda<'a, S> {
    current_configuration: Configuration<S>,
    accept_states: &'a VecSet<S>,
    rulebook: &'a DpdaRulebook<S>,
}

impl<'a, S: State> Dpda<'a, S> {
    /// Creates a new automaton, epsilon rules are followed from the given configuration.
    pub fn new(
        current_configuration: Configuration<S>,
        accept_states: &'a VecSet<S>,
        rulebook: &'a DpdaRulebook<S>,
    ) -> Self {
        Self {
            current_configuration: rulebook.follow_free_move(current_configuration),
            accept_states,
            rulebook,
        }
    }

    /// Returns the current configuration.
    pub fn current_configuration(&self) -> &Configuration<S> {
        &self.current_configuration
    }

    /// Returns true iff the state of the current configuration is an accept state.
    pub fn is_accepting(&self) -> bool {
        self.current_configuration
            .state()
            .is_some_and(|state| self.accept_states.contains(state))
    }

    /// Returns true iff the automaton is stuck.
    pub fn is_stuck(&self) -> bool {
        self.current_configuration.is_stuck()
    }

    /// Reads a single character, has no effect when the automaton is stuck.
    pub fn read_symbol(&mut self, character: char) {
        if self.is_stuck() {
            return;
        }

        let next = match self
            .rulebook
            .next_configuration(&self.current_configuration, Symbol::from(character))
        {
            Ok(next) => next,
            Err(error) => {
                trace!("{error}");
                self.current_configuration.stuck()
            }
        };

        trace!("--[{character}]-> {next:?}");
        self.current_configuration = self.rulebook.follow_free_move(next);
    }

    /// Reads the characters of the given input until the automaton is stuck.
    pub fn read_string(&mut self, input: &str) {
        for character in input.chars() {
            if self.is_stuck() {
                break;
            }

            self.read_symbol(character);
        }
    }
}

/// The definition of a deterministic pushdown automaton, from which fresh runs
/// can be started.
#[derive(Clone)]
pub struct DpdaDesign<S> {
    start_configuration: Configuration<S>,
    accept_states: VecSet<S>,
    rulebook: DpdaRulebook<S>,
}

impl<S: State> DpdaDesign<S> {
    /// Creates a new design.
    pub fn new(
        start_configuration: Configuration<S>,
        accept_states: impl IntoIterator<Item = S>,
        rulebook: DpdaRulebook<S>,
    ) -> Self {
        Self {
            start_configuration,
            accept_states: accept_states.into_iter().collect(),
            rulebook,
        }
    }

    /// Returns a fresh automaton in the start configuration.
    pub fn to_dpda(&self) -> Dpda<'_, S> {
        Dpda::new(self.start_configuration.clone(), &self.accept_states, &self.rulebook)
    }

    /// Returns true iff the automaton accepts the given input.
    pub fn accepts(&self, input: &str) -> bool {
        let mut dpda = self.to_dpda();
        dpda.read_string(input);
        dpda.is_accepting()
    }

    pub fn start_configuration(&self) -> &Configuration<S> {
        &self.start_configuration
    }

    pub fn accept_states(&self) -> &VecSet<S> {
        &self.accept_states
    }

    pub fn rulebook(&self) -> &DpdaRulebook<S> {
        &self.rulebook
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::Stack;

    fn balanced_parentheses() -> DpdaRulebook<u32> {
        DpdaRulebook::new(vec![
            PdaRule::new(1, '(', 2, '$', "b$"),
            PdaRule::new(2, '(', 2, 'b', "bb"),
            PdaRule::new(2, ')', 2, 'b', ""),
            PdaRule::new(2, Symbol::Epsilon, 1, '$', "$"),
        ])
        .unwrap()
    }

    fn balanced_parentheses_design() -> DpdaDesign<u32> {
        DpdaDesign::new(Configuration::new(1, Stack::new(['$'])), [1], balanced_parentheses())
    }

    #[test]
    fn test_dpda_next_configuration() {
        let rulebook = balanced_parentheses();
        let configuration = Configuration::new(2, Stack::new("bb$".chars()));

        let next = rulebook.next_configuration(&configuration, Symbol::from('(')).unwrap();
        assert_eq!(next.state(), Some(&2));
        assert_eq!(next.stack().iter().collect::<String>(), "bbb$");

        let next = rulebook.next_configuration(&configuration, Symbol::from(')')).unwrap();
        assert_eq!(next.stack().iter().collect::<String>(), "b$");

        assert!(matches!(
            rulebook.next_configuration(&configuration, Symbol::from('x')),
            Err(RulebookError::NoApplicableRule { .. })
        ));
    }

    #[test]
    fn test_dpda_read_string() {
        let rulebook = balanced_parentheses();
        let accept_states = VecSet::singleton(1);
        let mut dpda = Dpda::new(Configuration::new(1, Stack::new(['$'])), &accept_states, &rulebook);

        assert!(dpda.is_accepting());
        dpda.read_string("(()");
        assert!(!dpda.is_accepting());
        assert_eq!(dpda.current_configuration().state(), Some(&2));
        dpda.read_symbol(')');
        assert!(dpda.is_accepting());
        assert_eq!(dpda.current_configuration().stack().iter().collect::<String>(), "$");
    }

    #[test]
    fn test_dpda_gets_stuck() {
        let rulebook = balanced_parentheses();
        let accept_states = VecSet::singleton(1);
        let mut dpda = Dpda::new(Configuration::new(1, Stack::new(['$'])), &accept_states, &rulebook);

        dpda.read_string("())");
        assert!(dpda.is_stuck());
        assert!(!dpda.is_accepting());

        // Further input is ignored.
        dpda.read_string("()");
        assert!(dpda.is_stuck());
        assert!(!dpda.is_accepting());
    }

    #[test]
    fn test_dpda_design_accepts() {
        let design = balanced_parentheses_design();

        assert!(design.accepts(""));
        assert!(design.accepts("()"));
        assert!(design.accepts("(())"));
        assert!(design.accepts("(()(()()))"));
        assert!(!design.accepts("("));
        assert!(!design.accepts("(()"));
        assert!(!design.accepts("(()))"));
        assert!(!design.accepts(")"));

        let mut dpda = design.to_dpda();
        dpda.read_symbol(')');
        assert!(dpda.is_stuck());
    }

    #[test]
    fn test_dpda_ambiguous_rulebook() {
        let result = DpdaRulebook::new(vec![
            PdaRule::new(1, 'a', 2, '$', "$"),
            PdaRule::new(1, 'a', 1, '$', ""),
        ]);

        assert!(matches!(result, Err(RulebookError::AmbiguousRule { .. })));
    }

    #[test]
    fn test_dpda_epsilon_cycle_gets_stuck() {
        let rulebook = DpdaRulebook::new(vec![PdaRule::new(1, Symbol::Epsilon, 1, '$', "$")]).unwrap();
        let design = DpdaDesign::new(Configuration::new(1, Stack::new(['$'])), [1], rulebook);

        assert!(design.to_dpda().is_stuck());
        assert!(!design.accepts(""));
    }

    #[test]
    fn test_dpda_growing_epsilon_cycle_gets_stuck() {
        let rulebook = DpdaRulebook::new(vec![
            PdaRule::new(1, Symbol::Epsilon, 2, '$', "x$"),
            PdaRule::new(2, Symbol::Epsilon, 2, 'x', "xx"),
        ])
        .unwrap();
        let design = DpdaDesign::new(Configuration::new(1, Stack::new(['$'])), [2], rulebook);

        assert!(design.to_dpda().is_stuck());
    }

    #[test]
    fn test_dpda_long_epsilon_pop_chain() {
        // Accepts a^n b, the epsilon rules pop every a after reading the b.
        let rulebook = DpdaRulebook::new(vec![
            PdaRule::new(1, 'a', 1, '$', "a$"),
            PdaRule::new(1, 'a', 1, 'a', "aa"),
            PdaRule::new(1, 'b', 2, 'a', "a"),
            PdaRule::new(2, Symbol::Epsilon, 2, 'a', ""),
            PdaRule::new(2, Symbol::Epsilon, 3, '$', "$"),
        ])
        .unwrap();
        let design = DpdaDesign::new(Configuration::new(1, Stack::new(['$'])), [3], rulebook);

        let input = "a".repeat(150_000) + "b";
        let mut dpda = design.to_dpda();
        dpda.read_string(&input);
        assert!(!dpda.is_stuck());
        assert!(dpda.is_accepting());
        assert_eq!(dpda.current_configuration().stack().len(), 1);

        assert!(!design.accepts("b"));
        assert!(!design.accepts("aaba"));
    }
}
