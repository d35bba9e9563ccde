//!
//! A crate containing regular expression patterns, which are built as an
//! abstract syntax tree and compiled into nondeterministic finite automata
//! using the Thompson construction.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod compiler;
mod pattern;
mod random_pattern;

pub use compiler::*;
pub use pattern::*;
pub use random_pattern::*;
