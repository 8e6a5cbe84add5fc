//! Sample document synthesis for jsonsample.
//!
//! This crate resolves the declarations read by `jsonsample-core` into a
//! value tree filled with fake data and renders it as JSON-like text.

pub mod engine;
pub mod errors;
pub mod generators;
pub mod model;
pub mod render;
pub mod resolver;
pub mod value;

pub use engine::{SynthesisEngine, SynthesisResult, synthesize};
pub use errors::SynthesisError;
pub use model::{RenderedDeclaration, SynthesisIssue, SynthesisOptions, SynthesisReport};
pub use render::{Renderer, render, render_document};
pub use value::{LiteralValue, ValueNode};
