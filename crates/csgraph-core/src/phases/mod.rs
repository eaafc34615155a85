//! Analysis phases, run in order by [`crate::pipeline`].

pub mod dependencies;
pub mod discovery;
pub mod parsing;
