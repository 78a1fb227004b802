//! Constants and configuration for the prefix trie

/// One transition slot per possible byte value.
pub const FAN_OUT: usize = 256;

/// Sentinel marking an absent transition or an unbound output.
pub const NIL: i32 = -1;

/// Seed capacity of the node arena; grows by doubling, never shrinks.
pub const INITIAL_NODE_CAPACITY: usize = 256;

/// Seed capacity of the value arena; grows by doubling, never shrinks.
pub const INITIAL_VALUE_CAPACITY: usize = 64;
