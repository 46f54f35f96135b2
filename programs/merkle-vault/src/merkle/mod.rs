//! Merkle commitment scheme shared by the program and distributors.

pub mod builder;
pub mod hash;
pub mod leaf;
pub mod proof;

pub use builder::MerkleTree;
pub use hash::{hash_leaf, hash_two_to_one};
pub use leaf::{Allocation, Beneficiary, LeafEncoding};
pub use proof::{compute_root, verify_proof, ProofNode, Side};
