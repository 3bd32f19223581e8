//! Naming strategies
//!
//! A [`KeyStrategy`] decides the trace key of every decision a generator
//! makes. The tracer does not care where a key comes from, so the choice of
//! strategy only changes which decisions line up between two runs.

use crate::distribution::Kind;
use crate::trace::TraceKey;

/// Computes the trace key of one decision
pub trait KeyStrategy: Send + Sync {
    /// Key for the `ordinal`-th decision of `kind` made inside the scope `path`.
    ///
    /// `explicit` is the key the generator passed, if any. Returning `None`
    /// leaves the key to the tracer's auto-numbering.
    fn key(&self, path: &[TraceKey], explicit: Option<TraceKey>, kind: Kind, ordinal: usize) -> Option<TraceKey>;
}

/// Sequential integer keys, the tracer's default numbering
///
/// Explicit keys are passed through unchanged and scopes are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearKeys;

impl KeyStrategy for LinearKeys {
    fn key(&self, _path: &[TraceKey], explicit: Option<TraceKey>, _kind: Kind, _ordinal: usize) -> Option<TraceKey> {
        explicit
    }
}

/// Hierarchical string keys built from [`Rnd::scope`](super::Rnd::scope) labels
///
/// A decision's key is its scope path followed by either the explicit key or
/// `kind:ordinal`, joined by the separator: `"row:3/col:1/uniform:0"`.
/// Decisions inside the same scope keep their key when the generator adds or
/// removes decisions in other scopes.
#[derive(Clone, Debug)]
pub struct ScopedKeys {
    separator: String,
}

impl ScopedKeys {
    /// Create with the default `/` separator
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different separator between path segments
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl Default for ScopedKeys {
    fn default() -> Self {
        Self {
            separator: "/".to_string(),
        }
    }
}

impl KeyStrategy for ScopedKeys {
    fn key(&self, path: &[TraceKey], explicit: Option<TraceKey>, kind: Kind, ordinal: usize) -> Option<TraceKey> {
        let leaf = match explicit {
            Some(key) => key.to_string(),
            None => format!("{kind}:{ordinal}"),
        };
        let mut segments: Vec<String> = path.iter().map(TraceKey::to_string).collect();
        segments.push(leaf);
        Some(TraceKey::Name(segments.join(&self.separator)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_keys_pass_through() {
        let keys = LinearKeys;
        assert_eq!(keys.key(&[], None, Kind::Uniform, 3), None);
        assert_eq!(
            keys.key(&["outer".into()], Some("x".into()), Kind::Choice, 0),
            Some(TraceKey::from("x"))
        );
    }

    #[test]
    fn test_scoped_keys_join_path() {
        let keys = ScopedKeys::new();
        let path = vec![TraceKey::from("row:3"), TraceKey::from("col:1")];
        assert_eq!(
            keys.key(&path, None, Kind::Uniform, 0),
            Some(TraceKey::from("row:3/col:1/uniform:0"))
        );
        assert_eq!(
            keys.key(&path, Some(TraceKey::Index(7)), Kind::RandInt, 2),
            Some(TraceKey::from("row:3/col:1/7"))
        );
        assert_eq!(keys.key(&[], None, Kind::Sample, 4), Some(TraceKey::from("sample:4")));
    }

    #[test]
    fn test_scoped_keys_custom_separator() {
        let keys = ScopedKeys::new().with_separator(".");
        let path = vec![TraceKey::from("a")];
        assert_eq!(keys.key(&path, None, Kind::Choice, 1), Some(TraceKey::from("a.choice:1")));
    }
}
