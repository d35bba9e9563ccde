use std::fmt;

use crate::Stack;
use crate::State;

/// The configuration of a pushdown automaton: a control state together with
/// the contents of the stack.
///
/// A configuration can be stuck, in which case it keeps its stack but has no
/// control state anymore, so no rule applies to it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Configuration<S> {
    /// None iff the configuration is stuck.
    state: Option<S>,
    stack: Stack,
}

impl<S: State> Configuration<S> {
    /// Creates a new configuration.
    pub fn new(state: S, stack: Stack) -> Self {
        Self {
            state: Some(state),
            stack,
        }
    }

    /// Returns the stuck configuration with the same stack.
    pub fn stuck(&self) -> Self {
        Self {
            state: None,
            stack: self.stack.clone(),
        }
    }

    /// Returns true iff this configuration is stuck.
    pub fn is_stuck(&self) -> bool {
        self.state.is_none()
    }

    /// Returns the control state, or None when the configuration is stuck.
    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    /// Returns the stack of this configuration.
    pub fn stack(&self) -> &Stack {
        &self.stack
    }
}

impl<S: fmt::Debug> fmt::Debug for Configuration<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Some(state) => write!(f, "{state:?}/{}", self.stack),
            None => write!(f, "stuck/{}", self.stack),
        }
    }
}
