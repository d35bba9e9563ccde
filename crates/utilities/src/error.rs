use std::error::Error;

/// The error type used by the fallible (mostly I/O related) functions of the
/// toolset. Specific error enumerations are converted into this type with `?`.
pub type KleeneError = Box<dyn Error + Send + Sync>;
