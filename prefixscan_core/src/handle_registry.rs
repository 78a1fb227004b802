//! Per-process registry mapping opaque handle ids to live tries.
//!
//! The C ABI never hands out raw pointers; hosts hold a `u64` id instead,
//! so a stale or forged handle fails with `InvalidHandle` rather than
//! dereferencing freed memory.

use crate::errors::ErrorCode;
use crate::types::PrefixTrie;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

/// Payload type carried across the C ABI: an opaque caller-supplied token,
/// returned verbatim by scans.
pub type FfiToken = u64;
pub type FfiTrie = PrefixTrie<FfiToken>;

/// Handle ID type - safer than raw pointers
pub type HandleId = u64;

static REGISTRY: Lazy<DashMap<HandleId, FfiTrie>> = Lazy::new(DashMap::new);
// Start from 1, reserve 0 for null/invalid
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Register a new trie and return its handle ID.
pub fn register_handle(trie: FfiTrie) -> HandleId {
    let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
    REGISTRY.insert(id, trie);
    id
}

/// Execute `f` with a shared reference to the trie behind `id`.
///
/// Shared map guards do not exclude each other, so concurrent scans from
/// independent host threads proceed without coordination.
pub fn with_handle<T, F>(id: HandleId, f: F) -> Result<T, ErrorCode>
where
    F: FnOnce(&FfiTrie) -> T,
{
    match REGISTRY.get(&id) {
        Some(entry) => Ok(f(entry.value())),
        None => Err(ErrorCode::InvalidHandle),
    }
}

/// Execute `f` with an exclusive reference to the trie behind `id`.
pub fn with_handle_mut<T, F>(id: HandleId, f: F) -> Result<T, ErrorCode>
where
    F: FnOnce(&mut FfiTrie) -> T,
{
    match REGISTRY.get_mut(&id) {
        Some(mut entry) => Ok(f(entry.value_mut())),
        None => Err(ErrorCode::InvalidHandle),
    }
}

/// Unregister and drop a trie, releasing every value it owns.
pub fn unregister_handle(id: HandleId) -> Result<(), ErrorCode> {
    match REGISTRY.remove(&id) {
        Some(_) => Ok(()),
        None => Err(ErrorCode::InvalidHandle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_are_rejected() {
        assert_eq!(with_handle(0, |_| ()), Err(ErrorCode::InvalidHandle));
        assert_eq!(unregister_handle(u64::MAX), Err(ErrorCode::InvalidHandle));
    }

    #[test]
    fn register_then_unregister() {
        let id = register_handle(PrefixTrie::new());
        assert!(with_handle(id, |t| t.node_count()).is_ok());
        assert!(unregister_handle(id).is_ok());
        assert_eq!(unregister_handle(id), Err(ErrorCode::InvalidHandle));
    }
}
