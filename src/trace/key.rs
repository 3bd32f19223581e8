//! Trace keys

use std::fmt;

/// Identifier of one decision inside a trace
///
/// Integer keys come from the tracer's auto-numbering; string keys come from
/// the generator itself or from a naming strategy.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TraceKey {
    /// Auto-assigned or explicit integer key
    Index(usize),
    /// Explicit or hierarchical string key
    Name(String),
}

impl fmt::Display for TraceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(s) => write!(f, "{s}"),
        }
    }
}

impl From<usize> for TraceKey {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl From<&str> for TraceKey {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

impl From<String> for TraceKey {
    fn from(s: String) -> Self {
        Self::Name(s)
    }
}

impl From<&TraceKey> for TraceKey {
    fn from(key: &TraceKey) -> Self {
        key.clone()
    }
}
