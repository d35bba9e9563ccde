use std::time::Instant;

use log::debug;
use log::trace;

use kleene_collections::IndexedSet;
use kleene_collections::VecSet;

use crate::DfaDesign;
use crate::DfaRulebook;
use crate::FaRule;
use crate::NfaDesign;
use crate::State;

/// Simulates a nondeterministic finite automaton by tracking sets of its
/// states, which is used to construct an equivalent deterministic automaton.
pub struct NfaSimulation<'a, S> {
    nfa_design: &'a NfaDesign<S>,
    alphabet: VecSet<char>,
}

impl<'a, S: State> NfaSimulation<'a, S> {
    pub fn new(nfa_design: &'a NfaDesign<S>) -> Self {
        Self {
            nfa_design,
            alphabet: nfa_design.rulebook().alphabet(),
        }
    }

    /// Returns the (closed) set of states reached from the given set of states
    /// after reading the character.
    pub fn next_state(&self, state: &VecSet<S>, character: char) -> VecSet<S> {
        let mut nfa = self.nfa_design.to_nfa_from(state.clone());
        nfa.read_symbol(character);
        nfa.current_states().clone()
    }

    /// Returns the deterministic rules from the given set of states, one for
    /// every character of the alphabet.
    pub fn rules_for(&self, state: &VecSet<S>) -> Vec<FaRule<VecSet<S>>> {
        self.alphabet
            .iter()
            .map(|&character| FaRule::new(state.clone(), character, self.next_state(state, character)))
            .collect()
    }

    /// Explores all sets of states reachable from the given sets, and returns
    /// them together with the deterministic rules between them.
    ///
    /// The states are returned in the order in which they were discovered.
    pub fn discover_states_and_rules(
        &self,
        states: impl IntoIterator<Item = VecSet<S>>,
    ) -> (Vec<VecSet<S>>, Vec<FaRule<VecSet<S>>>) {
        let mut discovered: IndexedSet<VecSet<S>> = IndexedSet::new();
        let mut queue: Vec<VecSet<S>> = Vec::new();
        for state in states {
            if discovered.insert(state.clone()).1 {
                queue.push(state);
            }
        }

        let mut rules = Vec::new();
        while let Some(state) = queue.pop() {
            for rule in self.rules_for(&state) {
                if discovered.insert(rule.to.clone()).1 {
                    trace!("Discovered {:?}", rule.to);
                    queue.push(rule.to.clone());
                }

                rules.push(rule);
            }
        }

        (discovered.to_vec(), rules)
    }

    /// Returns a deterministic design that accepts the same language, its
    /// states are the reachable sets of states of the nondeterministic design.
    ///
    /// The empty set is kept as a (rejecting) state, so every state has a rule
    /// for every character of the alphabet.
    pub fn to_dfa_design(&self) -> DfaDesign<VecSet<S>> {
        let start = Instant::now();

        let start_state = self.nfa_design.to_nfa().current_states().clone();
        let (states, rules) = self.discover_states_and_rules([start_state.clone()]);

        let accept_states: Vec<VecSet<S>> = states
            .into_iter()
            .filter(|state| self.nfa_design.to_nfa_from(state.clone()).is_accepting())
            .collect();

        let rulebook =
            DfaRulebook::new(rules).expect("Every set of states is explored once, so it has one rule per character");

        debug!(
            "Time subset construction: {:.3}s, {} rules",
            start.elapsed().as_secs_f64(),
            rulebook.rules().len()
        );
        DfaDesign::new(start_state, accept_states, rulebook)
    }
}

/// Converts the given nondeterministic design into an equivalent
/// deterministic design.
pub fn subset_construction<S: State>(nfa_design: &NfaDesign<S>) -> DfaDesign<VecSet<S>> {
    NfaSimulation::new(nfa_design).to_dfa_design()
}
