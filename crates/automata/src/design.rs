use crate::DfaDesign;
use crate::DpdaDesign;
use crate::NfaDesign;
use crate::NpdaDesign;
use crate::RulebookError;
use crate::State;

/// A design of any of the supported automata.
#[derive(Clone)]
pub enum Design<S> {
    Dfa(DfaDesign<S>),
    Nfa(NfaDesign<S>),
    Dpda(DpdaDesign<S>),
    Npda(NpdaDesign<S>),
}

impl<S: State> Design<S> {
    /// Returns true iff the underlying automaton accepts the given input.
    ///
    /// Only deterministic finite automata can fail, when a character has no rule.
    pub fn accepts(&self, input: &str) -> Result<bool, RulebookError> {
        match self {
            Design::Dfa(design) => design.accepts(input),
            Design::Nfa(design) => Ok(design.accepts(input)),
            Design::Dpda(design) => Ok(design.accepts(input)),
            Design::Npda(design) => Ok(design.accepts(input)),
        }
    }

    /// Returns true iff the design is deterministic.
    pub fn is_deterministic(&self) -> bool {
        matches!(self, Design::Dfa(_) | Design::Dpda(_))
    }
}

impl<S> From<DfaDesign<S>> for Design<S> {
    fn from(design: DfaDesign<S>) -> Self {
        Design::Dfa(design)
    }
}

impl<S> From<NfaDesign<S>> for Design<S> {
    fn from(design: NfaDesign<S>) -> Self {
        Design::Nfa(design)
    }
}

impl<S> From<DpdaDesign<S>> for Design<S> {
    fn from(design: DpdaDesign<S>) -> Self {
        Design::Dpda(design)
    }
}

impl<S> From<NpdaDesign<S>> for Design<S> {
    fn from(design: NpdaDesign<S>) -> Self {
        Design::Npda(design)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::Configuration;
    use crate::DfaRulebook;
    use crate::DpdaRulebook;
    use crate::FaRule;
    use crate::NfaRulebook;
    use crate::NpdaRulebook;
    use crate::PdaRule;
    use crate::Stack;
    use crate::Symbol;

    #[test]
    fn test_design_accepts() {
        // All four designs accept the words over `a` and `b` that end in `b`.
        let dfa = DfaDesign::new(
            1,
            [2],
            DfaRulebook::new(vec![
                FaRule::new(1, 'a', 1),
                FaRule::new(1, 'b', 2),
                FaRule::new(2, 'a', 1),
                FaRule::new(2, 'b', 2),
            ])
            .unwrap(),
        );
        let nfa = NfaDesign::new(
            1,
            [2],
            NfaRulebook::new(vec![
                FaRule::new(1, 'a', 1),
                FaRule::new(1, 'b', 1),
                FaRule::new(1, 'b', 2),
            ]),
        );
        let dpda = DpdaDesign::new(
            Configuration::new(1, Stack::new(['$'])),
            [2],
            DpdaRulebook::new(vec![
                PdaRule::new(1, 'a', 1, '$', "$"),
                PdaRule::new(1, 'b', 2, '$', "$"),
                PdaRule::new(2, 'a', 1, '$', "$"),
                PdaRule::new(2, 'b', 2, '$', "$"),
            ])
            .unwrap(),
        );
        let npda = NpdaDesign::new(
            1,
            '$',
            [3],
            NpdaRulebook::new(vec![
                PdaRule::new(1, 'a', 1, '$', "$"),
                PdaRule::new(1, 'b', 1, '$', "$"),
                PdaRule::new(1, 'b', 2, '$', "$"),
                PdaRule::new(2, Symbol::Epsilon, 3, '$', "$"),
            ]),
        );

        let designs: Vec<Design<u32>> = vec![dfa.into(), nfa.into(), dpda.into(), npda.into()];
        for design in &designs {
            assert_eq!(design.accepts("ab"), Ok(true));
            assert_eq!(design.accepts("abba"), Ok(false));
            assert_eq!(design.accepts(""), Ok(false));
        }

        assert!(designs[0].is_deterministic());
        assert!(!designs[1].is_deterministic());
    }

    #[test]
    fn test_design_dfa_missing_rule() {
        let design: Design<u32> =
            DfaDesign::new(1, [1], DfaRulebook::new(vec![FaRule::new(1, 'a', 1)]).unwrap()).into();

        assert_eq!(design.accepts("aa"), Ok(true));
        assert_eq!(
            design.accepts("ab"),
            Err(RulebookError::NoApplicableRule {
                state: "1".to_string(),
                symbol: Symbol::from('b'),
            })
        );
    }
}
