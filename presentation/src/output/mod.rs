//! Console output: formatting and notices

pub mod console;
pub mod notifier;
