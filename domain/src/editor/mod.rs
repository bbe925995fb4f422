//! Editor command vocabulary shared by key bindings and command dispatch.

pub mod command;
