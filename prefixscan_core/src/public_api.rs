//! Language-agnostic C ABI over the handle registry.
//!
//! Every call stores its result code in the thread-local last-error slot
//! before returning, so hosts without rich error channels can poll
//! `prefix_trie_last_error` after the fact.

use crate::{
    errors::{map_error, set_last_error, ErrorCode},
    handle_registry::{self, FfiToken, HandleId},
    types::PrefixTrie,
};
use std::slice;

#[inline]
fn finish(code: ErrorCode) -> ErrorCode {
    set_last_error(code);
    code
}

// ─── small helper to turn Result<T,ErrorCode> into early-return ──────────
macro_rules! try_c {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => return finish(e),
        }
    };
}

/// Reconstruct a byte slice from an FFI (pointer, length) pair.
/// A zero length is always legal and yields the empty slice, so hosts may
/// pass NULL for empty keys and texts.
#[inline]
fn byte_arg<'a>(ptr: *const u8, len: usize) -> Result<&'a [u8], ErrorCode> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(ErrorCode::NullPointer);
    }
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

// ───────────────────────── lifecycle ─────────────────────────────────── //

/// Create an empty trie and store its handle in `*out`.
#[no_mangle]
pub extern "C" fn prefix_trie_create(out: *mut HandleId) -> ErrorCode {
    if out.is_null() {
        return finish(ErrorCode::NullPointer);
    }
    let id = handle_registry::register_handle(PrefixTrie::new());
    unsafe { *out = id };
    finish(ErrorCode::Success)
}

/// Register `value` under the byte sequence `key`.
/// Rejected with `MutateAfterFreeze` once `prefix_trie_build` has run.
#[no_mangle]
pub extern "C" fn prefix_trie_add(
    h: HandleId,
    key_ptr: *const u8,
    key_len: usize,
    value: FfiToken,
) -> ErrorCode {
    let key = try_c!(byte_arg(key_ptr, key_len));
    let res = try_c!(handle_registry::with_handle_mut(h, |t| {
        t.add_prefix(key, value)
    }));
    match res {
        Ok(()) => finish(ErrorCode::Success),
        Err(e) => finish(map_error(&e)),
    }
}

/// Freeze the trie; scanning becomes legal, mutation stops being legal.
#[no_mangle]
pub extern "C" fn prefix_trie_build(h: HandleId) -> ErrorCode {
    let res = try_c!(handle_registry::with_handle_mut(h, |t| t.build()));
    match res {
        Ok(()) => finish(ErrorCode::Success),
        Err(e) => finish(map_error(&e)),
    }
}

/// Scan `text` and write the tokens of every matching prefix, shortest
/// first, into `out_values` (up to `out_capacity` of them).
///
/// `*out_len` always receives the full match count. When it exceeds
/// `out_capacity` the output is truncated and `BufferTooSmall` is returned;
/// the caller may retry with a larger buffer.
#[no_mangle]
pub extern "C" fn prefix_trie_scan(
    h: HandleId,
    text_ptr: *const u8,
    text_len: usize,
    out_values: *mut FfiToken,
    out_capacity: usize,
    out_len: *mut usize,
) -> ErrorCode {
    if out_len.is_null() || (out_values.is_null() && out_capacity > 0) {
        return finish(ErrorCode::NullPointer);
    }
    let text = try_c!(byte_arg(text_ptr, text_len));
    let res = try_c!(handle_registry::with_handle(h, |t| {
        // Copy the tokens out while the registry guard is live.
        t.scan(text).map(|hits| hits.into_iter().copied().collect::<Vec<FfiToken>>())
    }));
    let hits = match res {
        Ok(hits) => hits,
        Err(e) => return finish(map_error(&e)),
    };
    let written = hits.len().min(out_capacity);
    unsafe {
        if written > 0 {
            std::ptr::copy_nonoverlapping(hits.as_ptr(), out_values, written);
        }
        *out_len = hits.len();
    }
    if hits.len() > out_capacity {
        finish(ErrorCode::BufferTooSmall)
    } else {
        finish(ErrorCode::Success)
    }
}

/// Unregister and drop the trie; its handle becomes invalid and every
/// owned value is released.
#[no_mangle]
pub extern "C" fn prefix_trie_destroy(h: HandleId) -> ErrorCode {
    match handle_registry::unregister_handle(h) {
        Ok(()) => finish(ErrorCode::Success),
        Err(e) => finish(e),
    }
}
