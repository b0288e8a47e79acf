//! Chat backend adapters

pub mod console;
pub mod gitter;
