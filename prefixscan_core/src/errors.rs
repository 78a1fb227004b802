//! Error handling and C-ABI error codes for prefixscan

use std::cell::RefCell;
use std::fmt;
use std::os::raw::c_char;

/// Error type for trie operations.
///
/// The lifecycle variants are caller-logic defects and are never retried
/// internally; `AllocationFailed` leaves the trie in an unspecified state
/// that must not be used further.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    MutateAfterFreeze,
    DoubleFreeze,
    ScanBeforeFreeze,
    AllocationFailed,
}

impl Error {
    pub fn as_str(self) -> &'static str {
        match self {
            Error::MutateAfterFreeze => "cannot add_prefix after build()",
            Error::DoubleFreeze => "trie already built",
            Error::ScanBeforeFreeze => "call build() before scan()",
            Error::AllocationFailed => "arena allocation failed",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for Error {}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,
    MutateAfterFreeze = 1,
    DoubleFreeze = 2,
    ScanBeforeFreeze = 3,
    AllocationFailed = 4,
    InvalidHandle = 5,
    NullPointer = 6,
    BufferTooSmall = 7,
    Unknown = 255,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::MutateAfterFreeze => "Mutation after freeze",
            ErrorCode::DoubleFreeze => "Double freeze",
            ErrorCode::ScanBeforeFreeze => "Scan before freeze",
            ErrorCode::AllocationFailed => "Allocation failed",
            ErrorCode::InvalidHandle => "Invalid handle",
            ErrorCode::NullPointer => "Null pointer",
            ErrorCode::BufferTooSmall => "Output buffer too small",
            ErrorCode::Unknown => "Unknown error",
        }
    }
}

// Thread-local last error for C-ABI
thread_local! {
    static LAST_ERROR: RefCell<ErrorCode> = const { RefCell::new(ErrorCode::Success) };
}

pub fn set_last_error(code: ErrorCode) {
    LAST_ERROR.with(|cell| *cell.borrow_mut() = code);
}

pub fn get_last_error() -> ErrorCode {
    LAST_ERROR.with(|cell| *cell.borrow())
}

/// Result code of the most recent ABI call made on this thread.
#[no_mangle]
pub extern "C" fn prefix_trie_last_error() -> ErrorCode {
    get_last_error()
}

#[no_mangle]
pub extern "C" fn prefix_trie_strerror(code: ErrorCode) -> *const c_char {
    match code {
        ErrorCode::Success => b"Success\0".as_ptr() as *const c_char,
        ErrorCode::MutateAfterFreeze => b"Mutation after freeze\0".as_ptr() as *const c_char,
        ErrorCode::DoubleFreeze => b"Double freeze\0".as_ptr() as *const c_char,
        ErrorCode::ScanBeforeFreeze => b"Scan before freeze\0".as_ptr() as *const c_char,
        ErrorCode::AllocationFailed => b"Allocation failed\0".as_ptr() as *const c_char,
        ErrorCode::InvalidHandle => b"Invalid handle\0".as_ptr() as *const c_char,
        ErrorCode::NullPointer => b"Null pointer\0".as_ptr() as *const c_char,
        ErrorCode::BufferTooSmall => b"Output buffer too small\0".as_ptr() as *const c_char,
        ErrorCode::Unknown => b"Unknown error\0".as_ptr() as *const c_char,
    }
}

// Map internal Error to ErrorCode
pub fn map_error(e: &Error) -> ErrorCode {
    match e {
        Error::MutateAfterFreeze => ErrorCode::MutateAfterFreeze,
        Error::DoubleFreeze => ErrorCode::DoubleFreeze,
        Error::ScanBeforeFreeze => ErrorCode::ScanBeforeFreeze,
        Error::AllocationFailed => ErrorCode::AllocationFailed,
    }
}
