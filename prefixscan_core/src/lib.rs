pub mod constants;
pub mod errors;
pub mod handle_registry;
pub mod telemetry;
pub mod types;

pub use crate::errors::Error;
pub use crate::types::PrefixTrie;

use constants::*;
use log::{debug, info, trace};
use metrics::{counter, gauge};
use once_cell::sync::OnceCell;
use types::{Node, NodeIdx, ValueIdx};

// ===== Compile-time assertions for node layout =====
const _: () = assert!(FAN_OUT == 256);
const _: () =
    assert!(std::mem::size_of::<Node>() == (FAN_OUT + 1) * std::mem::size_of::<NodeIdx>());

// ---- logging/metrics bootstrapper --------------------------------------- //
// Process-wide, shared by every payload type.
fn ensure_instrumentation() {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_init(|| {
        // Fallback: simple env_logger with RFC-3339 ts off.
        let _ = env_logger::builder()
            .format_timestamp(None)
            .is_test(std::env::var("RUST_TEST_THREADS").is_ok())
            .try_init();
        telemetry::init();
    });
}

impl<V> PrefixTrie<V> {
    /// Create an empty trie: the root node only, no values, build phase.
    pub fn new() -> Self {
        ensure_instrumentation();
        let mut nodes = Vec::with_capacity(INITIAL_NODE_CAPACITY);
        nodes.push(Node::empty()); // root, index 0
        PrefixTrie {
            nodes,
            values: Vec::with_capacity(INITIAL_VALUE_CAPACITY),
            built: false,
        }
    }

    /// Register `value` under `key`: every later scan of a text that starts
    /// with `key` reports it. The empty key is legal and binds the root
    /// itself, firing before any text byte is consumed.
    ///
    /// Re-inserting a key rebinds its output to the new value; the previous
    /// slot stays owned by the trie until drop but no scan can reach it.
    pub fn add_prefix(&mut self, key: &[u8], value: V) -> Result<(), Error> {
        if self.built {
            return Err(Error::MutateAfterFreeze);
        }
        counter!("prefixscan_inserts_total").increment(1);
        debug!("[ADD] key_len={}", key.len());

        let mut cur: NodeIdx = 0; // root
        for &byte in key {
            let next = self.nodes[cur as usize].children[byte as usize];
            cur = if next == NIL {
                let id = self.new_node()?;
                self.nodes[cur as usize].children[byte as usize] = id;
                id
            } else {
                next
            };
        }

        // Bind the value at the terminal node, overwriting any prior output.
        let vid = self.new_value(value)?;
        let prior = self.nodes[cur as usize].output;
        if prior != NIL {
            trace!("[ADD] rebinding output {} -> {}", prior, vid);
        }
        self.nodes[cur as usize].output = vid;
        Ok(())
    }

    /// Freeze the trie. Purely a phase transition: no compaction, no
    /// re-indexing. Afterwards mutation is rejected and any number of
    /// threads may scan concurrently. The transition is one-way.
    pub fn build(&mut self) -> Result<(), Error> {
        if self.built {
            return Err(Error::DoubleFreeze);
        }
        self.built = true;
        info!(
            "[BUILD] frozen: {} nodes, {} values",
            self.nodes.len(),
            self.values.len()
        );
        Ok(())
    }

    /// Walk `text` from the root and collect the value of every registered
    /// prefix of it, shortest first. The walk stops at the first byte with
    /// no transition; the remaining suffix is ignored.
    pub fn scan(&self, text: &[u8]) -> Result<Vec<&V>, Error> {
        if !self.built {
            return Err(Error::ScanBeforeFreeze);
        }
        let mut matches = Vec::new();
        let mut state: NodeIdx = 0;
        // The empty prefix, if registered, fires before any byte is read.
        if self.nodes[state as usize].output != NIL {
            matches.push(&self.values[self.nodes[state as usize].output as usize]);
        }
        for &byte in text {
            let next = self.nodes[state as usize].children[byte as usize];
            if next == NIL {
                break;
            }
            state = next;
            let out = self.nodes[state as usize].output;
            if out != NIL {
                matches.push(&self.values[out as usize]);
            }
        }
        trace!("[SCAN] text_len={}, matches={}", text.len(), matches.len());
        Ok(matches)
    }

    /// Number of trie vertices, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of value slots, orphaned re-insertions included.
    pub fn prefix_count(&self) -> usize {
        self.values.len()
    }

    /// `true` once [`build`](Self::build) has completed.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Emit arena-occupancy gauges (caller decides cadence).
    pub fn report_size_metrics(&self) {
        gauge!("prefixscan_nodes").set(self.nodes.len() as f64);
        gauge!("prefixscan_values").set(self.values.len() as f64);
    }

    // Allocate one vertex; the arena doubles when full.
    fn new_node(&mut self) -> Result<NodeIdx, Error> {
        if self.nodes.len() >= NodeIdx::MAX as usize {
            return Err(Error::AllocationFailed);
        }
        if self.nodes.len() == self.nodes.capacity() {
            let grow = self.nodes.capacity();
            self.nodes
                .try_reserve_exact(grow)
                .map_err(|_| Error::AllocationFailed)?;
        }
        let id = self.nodes.len() as NodeIdx;
        self.nodes.push(Node::empty());
        Ok(id)
    }

    // Take ownership of `value`; released only when the trie drops.
    fn new_value(&mut self, value: V) -> Result<ValueIdx, Error> {
        if self.values.len() >= ValueIdx::MAX as usize {
            return Err(Error::AllocationFailed);
        }
        if self.values.len() == self.values.capacity() {
            let grow = self.values.capacity();
            self.values
                .try_reserve_exact(grow)
                .map_err(|_| Error::AllocationFailed)?;
        }
        let id = self.values.len() as ValueIdx;
        self.values.push(value);
        Ok(id)
    }
}

impl<V> Default for PrefixTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

// Public module for C API functions
pub mod public_api;

// Re-export all public API functions at the crate root
pub use public_api::*;
