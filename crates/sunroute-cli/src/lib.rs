//! Sunroute CLI library.
//!
//! Formatting helpers shared by the `sunroute-cli` binary.

pub mod output;
