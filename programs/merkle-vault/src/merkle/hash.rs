//! Hash functions for the redemption commitment tree
//!
//! Leaves and internal nodes are hashed with Keccak256 (a Solana syscall)
//! under distinct one-byte domain prefixes:
//! ```text
//! leaf = Keccak256(0x00 || encoding_tag || leaf_bytes)
//! node = Keccak256(0x01 || left || right)
//! ```
//! A leaf hash can therefore never be replayed as an internal node, and a
//! leaf encoded for one schedule type never matches another encoding.

use solana_program::keccak;

/// Domain prefix for leaf hashes.
pub const LEAF_PREFIX: u8 = 0x00;

/// Domain prefix for internal node hashes.
pub const NODE_PREFIX: u8 = 0x01;

/// Hash an encoded allocation leaf.
pub fn hash_leaf(encoding_tag: u8, leaf_bytes: &[u8]) -> [u8; 32] {
    keccak::hashv(&[&[LEAF_PREFIX, encoding_tag], leaf_bytes]).to_bytes()
}

/// Hash two 32-byte values for Merkle tree internal nodes.
///
/// Order matters: `hash_two_to_one(a, b) != hash_two_to_one(b, a)`.
pub fn hash_two_to_one(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    keccak::hashv(&[&[NODE_PREFIX], left.as_ref(), right.as_ref()]).to_bytes()
}

/// Compare two hashes without short-circuiting on the first differing byte.
#[inline]
pub fn hashes_equal(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
