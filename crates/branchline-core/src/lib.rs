//! Branchline Core — the scene-graph model and shared abstractions.
//!
//! This crate defines the story model, the error taxonomy, and the
//! content-loader and progress-store seams every other crate depends on.
//! It contains no infrastructure code.

pub mod command;
pub mod content;
pub mod error;
pub mod progress;
pub mod story;
