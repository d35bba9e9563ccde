use log::debug;

use kleene_automata::DfaDesign;
use kleene_automata::FaRule;
use kleene_automata::NfaDesign;
use kleene_automata::NfaRulebook;
use kleene_automata::StateIndex;
use kleene_automata::subset_construction;

use crate::Pattern;

/// Hands out fresh states, no state is returned twice by the same allocator.
#[derive(Default, Debug)]
pub struct StateAllocator {
    next: usize,
}

impl StateAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a state that has not been allocated before.
    pub fn allocate(&mut self) -> StateIndex {
        let state = StateIndex::new(self.next);
        self.next += 1;
        state
    }

    /// Returns the number of states allocated so far.
    pub fn num_of_states(&self) -> usize {
        self.next
    }
}

/// An automaton under construction, its states are unique within the allocator.
struct Fragment {
    start_state: StateIndex,
    accept_states: Vec<StateIndex>,
    rules: Vec<FaRule<StateIndex>>,
}

impl Pattern {
    /// Returns a nondeterministic design that accepts exactly the strings matched by this pattern.
    pub fn to_nfa_design(&self) -> NfaDesign<StateIndex> {
        let mut allocator = StateAllocator::new();
        let fragment = compile(self, &mut allocator);

        debug!(
            "Compiled {self:?} into {} states and {} rules",
            allocator.num_of_states(),
            fragment.rules.len()
        );
        NfaDesign::new(fragment.start_state, fragment.accept_states, NfaRulebook::new(fragment.rules))
    }

    /// Returns a deterministic design that accepts exactly the strings matched by this pattern.
    pub fn to_dfa_design(&self) -> DfaDesign<StateIndex> {
        subset_construction(&self.to_nfa_design()).relabel()
    }

    /// Returns true iff this pattern matches the whole input.
    pub fn matches(&self, input: &str) -> bool {
        self.to_nfa_design().accepts(input)
    }
}

/// The Thompson construction, every sub pattern gets its own fresh states.
fn compile(pattern: &Pattern, allocator: &mut StateAllocator) -> Fragment {
    match pattern {
        Pattern::Empty => {
            let start_state = allocator.allocate();

            Fragment {
                start_state,
                accept_states: vec![start_state],
                rules: Vec::new(),
            }
        }
        Pattern::Literal(character) => {
            let start_state = allocator.allocate();
            let accept_state = allocator.allocate();

            Fragment {
                start_state,
                accept_states: vec![accept_state],
                rules: vec![FaRule::new(start_state, *character, accept_state)],
            }
        }
        Pattern::Concatenate(first, second) => {
            let first = compile(first, allocator);
            let second = compile(second, allocator);

            let mut rules = first.rules;
            rules.extend(second.rules);
            rules.extend(
                first
                    .accept_states
                    .iter()
                    .map(|&state| FaRule::epsilon(state, second.start_state)),
            );

            Fragment {
                start_state: first.start_state,
                accept_states: second.accept_states,
                rules,
            }
        }
        Pattern::Choose(first, second) => {
            let first = compile(first, allocator);
            let second = compile(second, allocator);
            let start_state = allocator.allocate();

            let mut rules = first.rules;
            rules.extend(second.rules);
            rules.push(FaRule::epsilon(start_state, first.start_state));
            rules.push(FaRule::epsilon(start_state, second.start_state));

            let mut accept_states = first.accept_states;
            accept_states.extend(second.accept_states);

            Fragment {
                start_state,
                accept_states,
                rules,
            }
        }
        Pattern::Repeat(pattern) => {
            let inner = compile(pattern, allocator);
            let start_state = allocator.allocate();

            let mut rules = inner.rules;
            rules.extend(
                inner
                    .accept_states
                    .iter()
                    .map(|&state| FaRule::epsilon(state, inner.start_state)),
            );
            rules.push(FaRule::epsilon(start_state, inner.start_state));

            let mut accept_states = inner.accept_states;
            accept_states.push(start_state);

            Fragment {
                start_state,
                accept_states,
                rules,
            }
        }
    }
}
