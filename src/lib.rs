//! Procedural shader-art generator
//!
//! Application glue around the `artgen-synth` engine: color-maps evaluated
//! fields into pixel data and wraps emitted GLSL programs for display. The
//! binaries live under `src/bin/`.

pub mod palette;
