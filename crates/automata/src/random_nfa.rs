use rand::Rng;

use crate::FaRule;
use crate::NfaDesign;
use crate::NfaRulebook;
use crate::StateIndex;
use crate::Symbol;

/// Generates a random nondeterministic design with the given number of states
/// and characters, where every state has at most `outdegree` outgoing rules.
///
/// Roughly one in four rules is an epsilon rule, the characters are taken from
/// the start of the alphabet. State zero is the start state.
pub fn random_nfa(
    rng: &mut impl Rng,
    num_of_states: usize,
    num_of_characters: u32,
    outdegree: usize,
) -> NfaDesign<StateIndex> {
    assert!(
        num_of_characters <= 26,
        "Too many characters requested, we only support lower case letters."
    );
    assert!(num_of_states > 0, "A design needs at least the start state");

    let mut rules = Vec::new();
    for state_index in 0..num_of_states {
        for _ in 0..rng.random_range(0..=outdegree) {
            let symbol = if num_of_characters == 0 || rng.random_bool(0.25) {
                Symbol::Epsilon
            } else {
                let offset = rng.random_range(0..num_of_characters);
                Symbol::from(char::from_u32('a' as u32 + offset).expect("Offset stays within the lower case letters"))
            };

            let to = rng.random_range(0..num_of_states);
            rules.push(FaRule::new(StateIndex::new(state_index), symbol, StateIndex::new(to)));
        }
    }

    let accept_states: Vec<StateIndex> = (0..num_of_states)
        .filter(|_| rng.random_bool(0.3))
        .map(StateIndex::new)
        .collect();

    NfaDesign::new(StateIndex::new(0), accept_states, NfaRulebook::new(rules))
}

#[cfg(test)]
mod tests {
    use super::*;

    use kleene_utilities::random_test;
    use test_log::test;

    #[test]
    fn test_random_nfa() {
        random_test(100, |rng| {
            let design = random_nfa(rng, 10, 3, 3);

            assert!(design.states().iter().all(|state| state.value() < 10));
            assert!(design.rulebook().alphabet().iter().all(|c| ('a'..='c').contains(c)));
        });
    }
}
