//! Data structures for the prefix trie

use crate::constants::{FAN_OUT, NIL};

/// Arena index type: always 32 bits, portable across 32/64-bit platforms.
/// Negative values are never valid indices; [`NIL`] marks absence.
pub type NodeIdx = i32;
pub type ValueIdx = i32;

/// One trie vertex: a dense byte-indexed transition table plus an
/// optional output binding into the value arena.
#[repr(C)]
pub struct Node {
    pub(crate) children: [NodeIdx; FAN_OUT],
    pub(crate) output: ValueIdx,
}

impl Node {
    pub(crate) fn empty() -> Self {
        Node {
            children: [NIL; FAN_OUT],
            output: NIL,
        }
    }
}

/// PrefixTrie struct (core handle).
///
/// Owns both arenas exclusively. `built` records the lifecycle phase:
/// mutation is legal only while it is `false`, scanning only once it is
/// `true`, and the transition is one-way.
pub struct PrefixTrie<V> {
    pub(crate) nodes: Vec<Node>,
    pub(crate) values: Vec<V>,
    pub(crate) built: bool,
}
