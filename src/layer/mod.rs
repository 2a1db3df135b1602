//! Host-supplied layer data.

pub(crate) mod model;
pub(crate) mod pixels;
pub(crate) mod weight;
