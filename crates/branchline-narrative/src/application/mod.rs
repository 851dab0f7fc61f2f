//! Application layer: handlers, progress writing and the session facade.

pub mod command_handlers;
pub mod progress_writer;
pub mod query_handlers;
pub mod session;
