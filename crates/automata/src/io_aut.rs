use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;

use log::info;
use log::trace;
use log::warn;
use regex::Regex;
use thiserror::Error;

use kleene_utilities::KleeneError;

use crate::DfaDesign;
use crate::FaRule;
use crate::NfaDesign;
use crate::NfaRulebook;
use crate::StateIndex;
use crate::Symbol;

#[derive(Error, Debug)]
pub enum IOError {
    #[error("Invalid .aut header {0}")]
    InvalidHeader(&'static str),

    #[error("Invalid transition {0}")]
    InvalidTransition(String),

    #[error("Invalid label {0:?}, labels must be a single character or an epsilon label")]
    InvalidLabel(String),
}

/// A nondeterministic automaton read from a file in the Aldebaran format.
///
/// The format has no notion of accept states, these are supplied when the
/// automaton is turned into a design.
#[derive(Debug)]
pub struct AutAutomaton {
    initial_state: StateIndex,
    num_of_states: usize,
    rulebook: NfaRulebook<StateIndex>,
}

impl AutAutomaton {
    pub fn initial_state(&self) -> StateIndex {
        self.initial_state
    }

    pub fn num_of_states(&self) -> usize {
        self.num_of_states
    }

    pub fn num_of_transitions(&self) -> usize {
        self.rulebook.rules().len()
    }

    pub fn rulebook(&self) -> &NfaRulebook<StateIndex> {
        &self.rulebook
    }

    /// Returns the design that starts in the initial state and accepts in the given states.
    pub fn into_nfa_design(self, accept_states: impl IntoIterator<Item = StateIndex>) -> NfaDesign<StateIndex> {
        NfaDesign::new(self.initial_state, accept_states, self.rulebook)
    }
}

/// Loads an automaton in the Aldebaran format from the given reader.
///
/// The Aldebaran format consists of a header: `des (<initial>: Nat,
///     <num_of_transitions>: Nat, <num_of_states>: Nat)`
///
/// And one line for every transition either one of these cases:
///  `(<from>: Nat, "<label>": Str, <to>: Nat)`
///  `(<from>: Nat, <label>: Str, <to>: Nat)`
///
/// The label `tau` and the labels in `epsilon_labels` become epsilon rules,
/// all other labels must consist of exactly one character.
pub fn read_aut(reader: impl Read, epsilon_labels: Vec<String>) -> Result<AutAutomaton, KleeneError> {
    info!("Reading automaton in .aut format...");

    let mut lines = BufReader::new(reader).lines();
    let header = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(IOError::InvalidHeader("The first line should be the header").into()),
        }
    };

    // Regex for des (<initial>: Nat, <num_of_transitions>: Nat, <num_of_states>: Nat)
    let header_regex = Regex::new(r#"des\s*\(\s*([0-9]*)\s*,\s*([0-9]*)\s*,\s*([0-9]*)\s*\)\s*"#)
        .expect("Regex compilation should not fail");

    let (_, [initial_txt, num_of_transitions_txt, num_of_states_txt]) = header_regex
        .captures(&header)
        .ok_or(IOError::InvalidHeader(
            "does not match des (<init>, <num_of_transitions>, <num_of_states>)",
        ))?
        .extract();

    let initial_state = StateIndex::new(initial_txt.parse()?);
    let num_of_transitions: usize = num_of_transitions_txt.parse()?;
    let num_of_states: usize = num_of_states_txt.parse()?;

    if initial_state.value() >= num_of_states {
        return Err(IOError::InvalidHeader("the initial state is not one of the states").into());
    }

    let mut rules = Vec::with_capacity(num_of_transitions);
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (from_txt, label_txt, to_txt) =
            read_transition(&line).ok_or_else(|| IOError::InvalidTransition(line.clone()))?;

        let from = StateIndex::new(from_txt.parse()?);
        let to = StateIndex::new(to_txt.parse()?);
        if from.value() >= num_of_states || to.value() >= num_of_states {
            return Err(IOError::InvalidTransition(line.clone()).into());
        }

        let symbol = read_label(label_txt, &epsilon_labels)?;
        trace!("Read transition {from} --[{symbol}]-> {to}");

        rules.push(FaRule::new(from, symbol, to));
    }

    if rules.len() != num_of_transitions {
        warn!(
            "The header announces {num_of_transitions} transitions, but {} were read",
            rules.len()
        );
    }

    info!("Finished reading automaton");

    Ok(AutAutomaton {
        initial_state,
        num_of_states,
        rulebook: NfaRulebook::new(rules),
    })
}

/// Writes a deterministic automaton in the Aldebaran format to the given
/// writer, the accept states are not part of the format. The states must be
/// numbered consecutively, as [DfaDesign::relabel] does.
pub fn write_aut(writer: &mut impl Write, design: &DfaDesign<StateIndex>) -> Result<(), KleeneError> {
    let mut writer = BufWriter::new(writer);
    let rules = design.rulebook().rules();

    writeln!(
        writer,
        "des ({}, {}, {})",
        design.start_state(),
        rules.len(),
        design.states().len()
    )?;

    for rule in rules {
        match rule.symbol {
            Symbol::Epsilon => writeln!(writer, "({}, \"tau\", {})", rule.from, rule.to)?,
            Symbol::Character(character) => writeln!(writer, "({}, \"{}\", {})", rule.from, character, rule.to)?,
        }
    }

    writer.flush()?;
    info!("Wrote {} transitions, accept states {:?}", rules.len(), design.accept_states());
    Ok(())
}

/// Converts a label into a symbol.
fn read_label(label: &str, epsilon_labels: &[String]) -> Result<Symbol, IOError> {
    if label == "tau" || epsilon_labels.iter().any(|epsilon| epsilon == label) {
        return Ok(Symbol::Epsilon);
    }

    let mut characters = label.chars();
    match (characters.next(), characters.next()) {
        (Some(character), None) => Ok(Symbol::from(character)),
        _ => Err(IOError::InvalidLabel(label.to_string())),
    }
}

/// Dedicated function to parse the following transition formats:
///     `(<from>: Nat, "<label>": Str, <to>: Nat)`
///     `(<from>: Nat, <label>: Str, <to>: Nat)`
fn read_transition(input: &str) -> Option<(&str, &str, &str)> {
    let start_paren = input.find('(')?;
    let start_comma = input.find(',')?;

    // The label itself can contain a comma.
    let start_second_comma = input.rfind(',')?;
    let end_paren = input.rfind(')')?;

    let from = input.get(start_paren + 1..start_comma)?.trim();
    let label = input.get(start_comma + 1..start_second_comma)?.trim();
    let to = input.get(start_second_comma + 1..end_paren)?.trim();
    if label.len() >= 2 && label.starts_with('"') && label.ends_with('"') {
        return Some((from, &label[1..label.len() - 1], to));
    }

    Some((from, label, to))
}
