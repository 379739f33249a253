//! Form model and payload shaping. Pure functions, no I/O.

pub mod error;
pub mod filter;
pub mod form;
pub mod payload;
pub mod provider;
