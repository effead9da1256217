//! Readers that materialize morphologies from text formats.

pub mod swc;
