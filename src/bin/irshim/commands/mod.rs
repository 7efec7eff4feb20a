//! Command implementations

pub mod backend;
pub mod compile;
pub mod completions;
pub mod run;
