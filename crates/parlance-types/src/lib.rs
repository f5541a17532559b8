//! Foundation types for Parlance.
//!
//! This crate contains the types shared by the command engine and the
//! applications embedding it: the invoking player handle, privilege levels,
//! configuration, and error types.

pub mod config;
pub mod error;
pub mod player;
