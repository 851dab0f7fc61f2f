//! Branchline Content — retrieval of the story document.
//!
//! Each loader performs one retrieval per call with no retry and no caching,
//! and hands back a graph that still has to be validated.

pub mod file_loader;
pub mod http_loader;
