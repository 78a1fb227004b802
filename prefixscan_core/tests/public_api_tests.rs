use std::ffi::CStr;

use prefixscan_core::errors::{prefix_trie_last_error, prefix_trie_strerror, ErrorCode};
use prefixscan_core::handle_registry::HandleId;
use prefixscan_core::{
    prefix_trie_add, prefix_trie_build, prefix_trie_create, prefix_trie_destroy, prefix_trie_scan,
};

fn open_trie() -> HandleId {
    let mut h: HandleId = 0;
    assert_eq!(prefix_trie_create(&mut h), ErrorCode::Success);
    assert_ne!(h, 0);
    h
}

fn add(h: HandleId, key: &[u8], token: u64) -> ErrorCode {
    prefix_trie_add(h, key.as_ptr(), key.len(), token)
}

fn scan(h: HandleId, text: &[u8], out: &mut [u64]) -> (ErrorCode, usize) {
    let mut n: usize = 0;
    let code = prefix_trie_scan(
        h,
        text.as_ptr(),
        text.len(),
        out.as_mut_ptr(),
        out.len(),
        &mut n,
    );
    (code, n)
}

#[test]
fn lifecycle_roundtrip() {
    let h = open_trie();
    assert_eq!(add(h, b"he", 11), ErrorCode::Success);
    assert_eq!(add(h, b"hers", 22), ErrorCode::Success);
    assert_eq!(add(h, b"his", 33), ErrorCode::Success);
    assert_eq!(prefix_trie_build(h), ErrorCode::Success);

    let mut out = [0u64; 8];
    let (code, n) = scan(h, b"hers", &mut out);
    assert_eq!(code, ErrorCode::Success);
    assert_eq!(n, 2);
    assert_eq!(&out[..2], &[11, 22]);

    let (code, n) = scan(h, b"xyz", &mut out);
    assert_eq!(code, ErrorCode::Success);
    assert_eq!(n, 0);

    assert_eq!(prefix_trie_destroy(h), ErrorCode::Success);
    assert_eq!(add(h, b"late", 44), ErrorCode::InvalidHandle);
    assert_eq!(prefix_trie_destroy(h), ErrorCode::InvalidHandle);
}

#[test]
fn lifecycle_violations_map_to_codes() {
    let h = open_trie();
    assert_eq!(add(h, b"a", 1), ErrorCode::Success);

    let mut out = [0u64; 4];
    let (code, _) = scan(h, b"a", &mut out);
    assert_eq!(code, ErrorCode::ScanBeforeFreeze);

    assert_eq!(prefix_trie_build(h), ErrorCode::Success);
    assert_eq!(add(h, b"b", 2), ErrorCode::MutateAfterFreeze);
    assert_eq!(prefix_trie_build(h), ErrorCode::DoubleFreeze);

    prefix_trie_destroy(h);
}

#[test]
fn empty_key_may_be_null() {
    let h = open_trie();
    // Zero length means the empty key; NULL is fine then.
    assert_eq!(prefix_trie_add(h, std::ptr::null(), 0, 7), ErrorCode::Success);
    assert_eq!(prefix_trie_build(h), ErrorCode::Success);

    let mut out = [0u64; 4];
    let (code, n) = scan(h, b"anything", &mut out);
    assert_eq!(code, ErrorCode::Success);
    assert_eq!(n, 1);
    assert_eq!(out[0], 7);

    prefix_trie_destroy(h);
}

#[test]
fn null_pointers_are_rejected() {
    assert_eq!(
        prefix_trie_create(std::ptr::null_mut()),
        ErrorCode::NullPointer
    );

    let h = open_trie();
    assert_eq!(
        prefix_trie_add(h, std::ptr::null(), 3, 1),
        ErrorCode::NullPointer
    );
    assert_eq!(prefix_trie_build(h), ErrorCode::Success);
    let mut n: usize = 0;
    assert_eq!(
        prefix_trie_scan(h, b"x".as_ptr(), 1, std::ptr::null_mut(), 4, &mut n),
        ErrorCode::NullPointer
    );
    let mut out = [0u64; 4];
    assert_eq!(
        prefix_trie_scan(
            h,
            b"x".as_ptr(),
            1,
            out.as_mut_ptr(),
            out.len(),
            std::ptr::null_mut()
        ),
        ErrorCode::NullPointer
    );
    prefix_trie_destroy(h);
}

#[test]
fn truncated_scan_reports_full_count() {
    let h = open_trie();
    assert_eq!(add(h, b"a", 1), ErrorCode::Success);
    assert_eq!(add(h, b"ab", 2), ErrorCode::Success);
    assert_eq!(add(h, b"abc", 3), ErrorCode::Success);
    assert_eq!(prefix_trie_build(h), ErrorCode::Success);

    let mut out = [0u64; 2];
    let (code, n) = scan(h, b"abcd", &mut out);
    assert_eq!(code, ErrorCode::BufferTooSmall);
    assert_eq!(n, 3);
    // The shortest matches fit, in order.
    assert_eq!(&out[..], &[1, 2]);

    // Probe with an empty buffer to size the real one.
    let mut n2: usize = 0;
    let code = prefix_trie_scan(h, b"abcd".as_ptr(), 4, std::ptr::null_mut(), 0, &mut n2);
    assert_eq!(code, ErrorCode::BufferTooSmall);
    assert_eq!(n2, 3);

    prefix_trie_destroy(h);
}

#[test]
fn last_error_tracks_this_thread() {
    let h = open_trie();
    assert_eq!(prefix_trie_build(h), ErrorCode::Success);
    assert_eq!(prefix_trie_last_error(), ErrorCode::Success);

    assert_eq!(add(h, b"x", 1), ErrorCode::MutateAfterFreeze);
    assert_eq!(prefix_trie_last_error(), ErrorCode::MutateAfterFreeze);

    let mut out = [0u64; 1];
    let (code, _) = scan(h, b"x", &mut out);
    assert_eq!(code, ErrorCode::Success);
    assert_eq!(prefix_trie_last_error(), ErrorCode::Success);

    prefix_trie_destroy(h);
}

#[test]
fn strerror_messages_are_nul_terminated() {
    for (code, want) in [
        (ErrorCode::Success, "Success"),
        (ErrorCode::MutateAfterFreeze, "Mutation after freeze"),
        (ErrorCode::ScanBeforeFreeze, "Scan before freeze"),
        (ErrorCode::InvalidHandle, "Invalid handle"),
        (ErrorCode::BufferTooSmall, "Output buffer too small"),
    ] {
        let msg = unsafe { CStr::from_ptr(prefix_trie_strerror(code)) };
        assert_eq!(msg.to_str().unwrap(), want);
    }
}
