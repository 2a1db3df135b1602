//! The compositing engine.
//!
//! `engine` drives one run; `accum`, `strategy` and `finalize` hold the per-pixel state and the
//! rules that update and resolve it.

pub(crate) mod accum;
pub(crate) mod bounds;
pub(crate) mod engine;
pub(crate) mod falloff;
pub(crate) mod finalize;
pub(crate) mod mode;
pub(crate) mod output;
pub(crate) mod strategy;
