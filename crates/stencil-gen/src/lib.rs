//! Overload synthesis and rendering.
//!
//! Given a [`stencil_model::MethodDescriptor`] whose trailing parameters carry
//! default values, [`synthesize`] computes the family of reduced-arity
//! forwarding overloads (which optional parameters each one keeps) and
//! [`render`] turns each of them into a forwarding stub inside the enclosing
//! type. Synthesis is pure and per-method: no state survives between calls.

mod emit;
mod synth;

pub use emit::render;
pub use synth::{synthesize, SynthesisError, MAX_OPTIONAL_PARAMS};
