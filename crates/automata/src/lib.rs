//!
//! A crate containing finite and pushdown automata, their rulebooks and the
//! subset construction to determinize nondeterministic finite automata.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod configuration;
mod design;
mod dfa;
mod dpda;
mod error;
mod io_aut;
mod nfa;
mod nfa_simulation;
mod npda;
mod random_nfa;
mod rule;
mod stack;
mod state;
mod symbol;

pub use configuration::*;
pub use design::*;
pub use dfa::*;
pub use dpda::*;
pub use error::*;
pub use io_aut::*;
pub use nfa::*;
pub use nfa_simulation::*;
pub use npda::*;
pub use random_nfa::*;
pub use rule::*;
pub use stack::*;
pub use state::*;
pub use symbol::*;
