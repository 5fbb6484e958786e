//! Execution-time decision diagrams (XDDs) for the Takt WCET analyzer.
//!
//! An XDD is an ordered, reduced, hash-consed multi-terminal binary
//! decision diagram over boolean pipeline event variables, with
//! saturated tropical [`Time`](takt_common::Time) leaves. This crate
//! provides:
//!
//! - [`node`] — immutable diagram nodes and their id/variable newtypes
//! - [`manager`] — the hash-consing [`NodeManager`] enforcing canonicity
//! - [`ops`] — the memoized pointwise algebra behind the [`Xdd`] handle
//! - [`matrix`] — dense matrices and state vectors of diagrams over the
//!   `(max, +)` semiring
//!
//! One [`XddManager`] is shared by every worker of an analysis run; all
//! construction funnels through it, so structurally equal diagrams are
//! the same arena node and equality is O(1).

#![warn(missing_docs)]

pub mod manager;
pub mod matrix;
pub mod node;
pub mod ops;

pub use manager::NodeManager;
pub use matrix::{XddMatrix, XddVector};
pub use node::{EventVar, Node, NodeId};
pub use ops::{OpTag, Xdd, XddManager};
