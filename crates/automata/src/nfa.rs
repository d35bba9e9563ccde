use std::fmt;

use log::trace;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use kleene_collections::VecSet;

use crate::FaRule;
use crate::State;
use crate::Symbol;

/// The rules of a nondeterministic finite automaton, possibly with epsilon rules.
#[derive(Clone)]
pub struct NfaRulebook<S> {
    rules: Vec<FaRule<S>>,

    /// For every state the indices of its outgoing rules.
    outgoing: FxHashMap<S, Vec<usize>>,
}

impl<S: State> NfaRulebook<S> {
    /// Creates a rulebook from the given rules, the order of the rules is irrelevant.
    pub fn new(rules: Vec<FaRule<S>>) -> Self {
        let mut outgoing: FxHashMap<S, Vec<usize>> = FxHashMap::default();
        for (i, rule) in rules.iter().enumerate() {
            outgoing.entry(rule.from.clone()).or_default().push(i);
        }

        Self { rules, outgoing }
    }

    /// Returns the rules that apply to the given state and symbol.
    pub fn rules_for(&self, state: &S, symbol: Symbol) -> impl Iterator<Item = &FaRule<S>> {
        self.outgoing
            .get(state)
            .into_iter()
            .flatten()
            .map(|&i| &self.rules[i])
            .filter(move |rule| rule.symbol == symbol)
    }

    /// Returns the states reached from `state` by one rule labelled with `symbol`.
    pub fn follow_rules_for(&self, state: &S, symbol: Symbol) -> impl Iterator<Item = &S> {
        self.rules_for(state, symbol).map(|rule| rule.follow())
    }

    /// Returns the union of the states reached from any of the given states by
    /// one rule labelled with `symbol`.
    pub fn next_states(&self, states: &VecSet<S>, symbol: Symbol) -> VecSet<S> {
        states
            .iter()
            .flat_map(|state| self.follow_rules_for(state, symbol))
            .cloned()
            .collect()
    }

    /// Returns the epsilon-closure of the given states: all states reachable
    /// using only epsilon rules, including the given states themselves.
    pub fn follow_free_moves(&self, states: &VecSet<S>) -> VecSet<S> {
        let mut discovered: FxHashSet<&S> = states.iter().collect();
        let mut queue: Vec<&S> = states.iter().collect();

        while let Some(state) = queue.pop() {
            for next in self.follow_rules_for(state, Symbol::Epsilon) {
                if discovered.insert(next) {
                    queue.push(next);
                }
            }
        }

        discovered.into_iter().cloned().collect()
    }

    /// Returns all characters that occur on the rules, epsilon excluded.
    pub fn alphabet(&self) -> VecSet<char> {
        self.rules.iter().filter_map(|rule| rule.symbol.character()).collect()
    }

    /// Returns all the rules.
    pub fn rules(&self) -> &[FaRule<S>] {
        &self.rules
    }

    /// Returns the rules, consuming the rulebook.
    pub fn into_rules(self) -> Vec<FaRule<S>> {
        self.rules
    }
}

impl<S: fmt::Debug> fmt::Debug for NfaRulebook<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule:?}")?;
        }

        Ok(())
    }
}

/// A run of a nondeterministic finite automaton.
///
/// The set of current states is always closed under epsilon rules.
pub struct Nfa<'a, S> {
    current_states: VecSet<S>,
    accept_states: &'a VecSet<S>,
    rulebook: &'a NfaRulebook<S>,
}

impl<'a, S: State> Nfa<'a, S> {
    /// Creates a new automaton in the epsilon-closure of the given states.
    pub fn new(current_states: VecSet<S>, accept_states: &'a VecSet<S>, rulebook: &'a NfaRulebook<S>) -> Self {
        Self {
            current_states: rulebook.follow_free_moves(&current_states),
            accept_states,
            rulebook,
        }
    }

    /// Returns the current states.
    pub fn current_states(&self) -> &VecSet<S> {
        &self.current_states
    }

    /// Returns true iff one of the current states is an accept state.
    pub fn is_accepting(&self) -> bool {
        self.current_states.intersects(self.accept_states)
    }

    /// Reads a single character. States without a rule for the character are dropped.
    pub fn read_symbol(&mut self, character: char) {
        let next = self.rulebook.next_states(&self.current_states, Symbol::from(character));
        self.current_states = self.rulebook.follow_free_moves(&next);

        trace!("--[{character}]-> {:?}", self.current_states);
    }

    /// Reads all the characters of the given input.
    pub fn read_string(&mut self, input: &str) {
        for character in input.chars() {
            self.read_symbol(character);
        }
    }
}

/// The definition of a nondeterministic finite automaton, from which fresh
/// runs can be started.
#[derive(Clone)]
pub struct NfaDesign<S> {
    start_state: S,
    accept_states: VecSet<S>,
    rulebook: NfaRulebook<S>,
}

impl<S: State> NfaDesign<S> {
    /// Creates a new design.
    pub fn new(start_state: S, accept_states: impl IntoIterator<Item = S>, rulebook: NfaRulebook<S>) -> Self {
        Self {
            start_state,
            accept_states: accept_states.into_iter().collect(),
            rulebook,
        }
    }

    /// Returns a fresh automaton in (the closure of) the start state.
    pub fn to_nfa(&self) -> Nfa<'_, S> {
        self.to_nfa_from(VecSet::singleton(self.start_state.clone()))
    }

    /// Returns a fresh automaton in (the closure of) the given states.
    pub fn to_nfa_from(&self, current_states: VecSet<S>) -> Nfa<'_, S> {
        Nfa::new(current_states, &self.accept_states, &self.rulebook)
    }

    /// Returns true iff the automaton accepts the given input.
    pub fn accepts(&self, input: &str) -> bool {
        let mut nfa = self.to_nfa();
        nfa.read_string(input);
        nfa.is_accepting()
    }

    pub fn start_state(&self) -> &S {
        &self.start_state
    }

    pub fn accept_states(&self) -> &VecSet<S> {
        &self.accept_states
    }

    pub fn rulebook(&self) -> &NfaRulebook<S> {
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
}

impl<S: fmt::Debug> fmt::Debug for NfaDesign<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Start state: {:?}", self.start_state)?;
        writeln!(f, "Accept states: {:?}", self.accept_states)?;
        write!(f, "{:?}", self.rulebook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use kleene_collections::vecset;
    use kleene_utilities::random_test;
    use test_log::test;

    use crate::random_nfa;

    fn third_from_last_b() -> NfaRulebook<u32> {
        NfaRulebook::new(vec![
            FaRule::new(1, 'a', 1),
            FaRule::new(1, 'b', 1),
            FaRule::new(1, 'b', 2),
            FaRule::new(2, 'a', 3),
            FaRule::new(2, 'b', 3),
            FaRule::new(3, 'a', 4),
            FaRule::new(3, 'b', 4),
        ])
    }

    fn multiple_of_two_or_three() -> NfaRulebook<u32> {
        NfaRulebook::new(vec![
            FaRule::epsilon(1, 2),
            FaRule::epsilon(1, 4),
            FaRule::new(2, 'a', 3),
            FaRule::new(3, 'a', 2),
            FaRule::new(4, 'a', 5),
            FaRule::new(5, 'a', 6),
            FaRule::new(6, 'a', 4),
        ])
    }

    #[test]
    fn test_nfa_next_states() {
        let rulebook = third_from_last_b();

        assert_eq!(rulebook.next_states(&vecset![1], Symbol::from('b')), vecset![1, 2]);
        assert_eq!(rulebook.next_states(&vecset![1, 2], Symbol::from('a')), vecset![1, 3]);
        assert_eq!(rulebook.next_states(&vecset![1, 3], Symbol::from('b')), vecset![1, 2, 4]);
    }

    #[test]
    fn test_nfa_read_string() {
        let rulebook = third_from_last_b();
        let accept_states = vecset![4];
        let mut nfa = Nfa::new(vecset![1], &accept_states, &rulebook);

        assert!(!nfa.is_accepting());
        nfa.read_symbol('b');
        assert!(!nfa.is_accepting());
        nfa.read_string("ab");
        assert!(nfa.is_accepting());
    }

    #[test]
    fn test_nfa_design_accepts() {
        let design = NfaDesign::new(1, [4], third_from_last_b());

        assert!(design.accepts("bab"));
        assert!(design.accepts("bbbbb"));
        assert!(!design.accepts("bbabb"));
    }

    #[test]
    fn test_nfa_free_moves() {
        let rulebook = multiple_of_two_or_three();

        assert_eq!(rulebook.next_states(&vecset![1], Symbol::Epsilon), vecset![2, 4]);
        assert_eq!(rulebook.follow_free_moves(&vecset![1]), vecset![1, 2, 4]);

        let design = NfaDesign::new(1, [2, 4], rulebook);
        assert!(design.accepts(""));
        assert!(design.accepts("aa"));
        assert!(design.accepts("aaa"));
        assert!(!design.accepts("aaaaa"));
        assert!(design.accepts("aaaaaa"));
    }

    #[test]
    fn test_nfa_alphabet() {
        assert_eq!(multiple_of_two_or_three().alphabet(), vecset!['a']);
        assert_eq!(third_from_last_b().alphabet(), vecset!['a', 'b']);
    }

    #[test]
    fn test_nfa_rule_order_is_irrelevant() {
        let mut rules = third_from_last_b().into_rules();
        rules.reverse();
        let reversed = NfaRulebook::new(rules);

        assert_eq!(
            reversed.next_states(&vecset![1, 3], Symbol::from('b')),
            third_from_last_b().next_states(&vecset![1, 3], Symbol::from('b'))
        );
    }

    #[test]
    fn test_random_free_moves_idempotent() {
        random_test(100, |rng| {
            let design = random_nfa(rng, 10, 3, 3);
            let states = design.states();

            let closure = design.rulebook().follow_free_moves(&states);
            assert_eq!(design.rulebook().follow_free_moves(&closure), closure);

            let start = VecSet::singleton(*design.start_state());
            let closure = design.rulebook().follow_free_moves(&start);
            assert!(start.is_subset(&closure));
            assert_eq!(design.rulebook().follow_free_moves(&closure), closure);
        });
    }
}
