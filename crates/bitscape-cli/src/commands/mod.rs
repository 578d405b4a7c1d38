//! CLI command implementations.

pub mod algorithms;
pub mod common;
pub mod info;
pub mod library;
pub mod replay;
pub mod session;
pub mod sync;
