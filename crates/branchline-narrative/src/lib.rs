//! Branchline — Narrative Session orchestration.
//!
//! Responsible for starting a playthrough from the loaded story and the saved
//! position, resolving player choices into scene transitions, and keeping the
//! persisted position in step with every transition.

pub mod application;
pub mod domain;
