//! Traces and the record/replay controller
//!
//! - **Trace**: the genotype, an ordered map from [`TraceKey`] to [`Distribution`]
//! - **Tracer**: runs a generator against an input trace and records a new one
//! - **Solution**: a phenotype paired with the trace that produced it
//!
//! [`Distribution`]: crate::distribution::Distribution

pub mod genotype;
pub mod key;
pub mod tracer;

pub use genotype::Trace;
pub use key::TraceKey;
pub use tracer::{Solution, Tracer};

pub mod prelude {
    pub use super::{Solution, Trace, TraceKey, Tracer};
}
