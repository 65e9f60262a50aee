//! Escape-time renderer for Julia sets.
//!
//! The escape-time field is computed in [`fractals::escape_time`], colored and
//! written to disk by [`fractals::julia`], and driven from the command line
//! through [`cli`].

pub mod cli;
pub mod core;
pub mod fractals;
