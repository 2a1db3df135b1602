//! JSON layer stack manifests.

pub(crate) mod manifest;
