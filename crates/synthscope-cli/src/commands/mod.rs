//! CLI command implementations.

pub mod chorus;
pub mod common;
pub mod compare;
pub mod filter;
pub mod fit;
