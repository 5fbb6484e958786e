//! The control-flow-graph collection consumed by the timing engine.
//!
//! A [`Cfg`] is an ordered list of blocks plus directed edges between
//! them, built by the front-end that lowered the analyzed binary. Block
//! order is program order and fixes the deterministic job order of the
//! scheduler. Only [`BlockKind::Basic`] blocks carry instructions;
//! synthetic entry/exit blocks exist solely as edge anchors.

use crate::ids::{BlockId, EdgeId};
use serde::{Deserialize, Serialize};

/// An ordered collection of blocks and directed edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cfg {
    /// All blocks, in program order.
    pub blocks: Vec<Block>,
    /// All directed edges, in insertion order.
    pub edges: Vec<Edge>,
}

impl Cfg {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block and returns its ID.
    pub fn add_block(&mut self, name: impl Into<String>, kind: BlockKind) -> BlockId {
        let id = BlockId::from_raw(self.blocks.len() as u32);
        self.blocks.push(Block {
            id,
            name: name.into(),
            kind,
        });
        id
    }

    /// Appends a directed edge and returns its ID.
    pub fn add_edge(&mut self, from: BlockId, to: BlockId) -> EdgeId {
        let id = EdgeId::from_raw(self.edges.len() as u32);
        self.edges.push(Edge { id, from, to });
        id
    }

    /// Returns the block with the given ID.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.as_raw() as usize]
    }

    /// Returns the edge with the given ID.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.as_raw() as usize]
    }

    /// All edges arriving at the given block, in insertion order.
    pub fn in_edges(&self, block: BlockId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.to == block).collect()
    }

    /// All edges leaving the given block, in insertion order.
    pub fn out_edges(&self, block: BlockId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.from == block).collect()
    }

    /// Total number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// One block of the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// The unique ID of this block.
    pub id: BlockId,
    /// Human-readable label (e.g., "main+0x24").
    pub name: String,
    /// Whether this block carries instructions.
    pub kind: BlockKind,
}

impl Block {
    /// Returns `true` for instruction-carrying blocks.
    pub fn is_basic(&self) -> bool {
        self.kind == BlockKind::Basic
    }
}

/// The kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Synthetic function entry; never timed.
    Entry,
    /// A basic block carrying instructions.
    Basic,
    /// Synthetic function exit; never timed.
    Exit,
}

/// One directed edge between two blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// The unique ID of this edge.
    pub id: EdgeId,
    /// The source block.
    pub from: BlockId,
    /// The destination block.
    pub to: BlockId,
}
