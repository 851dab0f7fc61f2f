//! Domain layer: the playthrough state machine, its commands and events.

pub mod aggregates;
pub mod commands;
pub mod events;
