//! Shared foundational types used across the Takt WCET analyzer.
//!
//! This crate provides the saturated tropical time scalar that every
//! execution-time diagram leaf carries, and the ordered id-newtype
//! macro the analysis crates build their arena ids from.

#![warn(missing_docs)]

pub mod ids;
pub mod time;

pub use time::Time;
