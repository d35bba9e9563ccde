use std::fmt;
use std::hash::Hash;

use kleene_utilities::TagIndex;

/// The requirements on the states of an automaton. States are only compared
/// for equality, but they are also stored in sorted sets and used as keys.
pub trait State: Clone + Eq + Ord + Hash + fmt::Debug {}

impl<T: Clone + Eq + Ord + Hash + fmt::Debug> State for T {}

/// A unique type for the states.
pub struct StateTag;

/// The index for a state, used for generated states and states read from files.
pub type StateIndex = TagIndex<usize, StateTag>;
