//! Roteiro — content rendering pipeline.
//!
//! Turns a step's raw text, its optional formatting segments and the
//! runtime placeholder values into a flat sequence of typed nodes the UI
//! can display. Rendering is pure, synchronous and infallible: any lookup
//! miss degrades to unstyled text, never to an error.

mod node;
mod placeholder;
mod render;

pub use node::{NodeStyle, RenderNode};
pub use placeholder::{CPF_MASK, Placeholders};
pub use render::{DEFAULT_BASE_PX, render};
