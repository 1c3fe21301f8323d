//! Seams between the pipeline and the outside world.
//!
//! Applications implement these to plug in a remote model and a place to
//! persist records.

pub mod completer;
pub mod sink;
