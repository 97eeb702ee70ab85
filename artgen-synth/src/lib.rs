//! Procedural expression-synthesis engine
//!
//! Randomly assembles a tree of value-transformation operators bounded by a
//! declared depth range, then evaluates it against one of two
//! interchangeable backends.
//!
//! Architecture:
//! 1. `registry` - operator catalog tagged with arity and domain contracts
//! 2. `domain` - rescaling and numeric-safety utilities
//! 3. `expression` - recursive random tree builder over the catalog
//! 4. `evaluator` - dense 2D field evaluation over a coordinate grid
//! 5. `emitter` - GLSL fragment-program emission from the same tree shape
//!
//! The engine performs no I/O and holds no shared mutable state: every
//! synthesis request supplies its own config, rng, and (for fields) grid,
//! so concurrent requests need no coordination. All randomness comes from a
//! caller-provided `rand::Rng`, making any artifact reproducible from its
//! seed.

mod domain;
mod emitter;
mod error;
mod evaluator;
mod expression;
mod grid;
mod registry;

pub use domain::{
    rescale, rescale_robust, rescale_with, Interval, RescalePolicy, SPREAD_EPSILON,
};
pub use emitter::{emit, emit_program, synthesize_program, GlslBackend, ShaderProgram, VERTEX_SHADER};
pub use error::{Result, SynthError};
pub use evaluator::{evaluate, synthesize_field, FieldBackend};
pub use expression::{build, BuildConfig, ExecBackend, ExprNode};
pub use grid::{Field, Grid};
pub use registry::{OpKind, OperatorSpec, Registry};
