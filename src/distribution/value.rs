//! Decision values
//!
//! Categorical and sequence decisions carry their elements as [`Value`]s so
//! that one genotype can hold decisions over unrelated element types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single element of a categorical or sequence decision
///
/// Equality identifies elements, so two `Real(NaN)` elements are equal; this
/// is what lets a drawn NaN be mapped back to its position in `seq`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
    /// Boolean element
    Bool(bool),
    /// Integer element
    Int(i64),
    /// Real element
    Real(f64),
    /// Text element
    Text(String),
    /// Nested list element
    List(Vec<Value>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Real(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Real(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// The sampled value of a distribution, tagged by kind
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Value of a `uniform` decision
    Real(f64),
    /// Value of a `randint` decision
    Int(i64),
    /// Value of a `choice` decision
    Cat(Value),
    /// Value of a `sample` decision
    Seq(Vec<Value>),
}

/// Cardinality of a decision's domain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    /// Finite domain (saturates at `u128::MAX`)
    Finite(u128),
    /// Continuous domain
    Infinite,
}

impl Cardinality {
    /// Returns true for a finite domain
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Finite(_))
    }
}
