//! Merkle inclusion proofs
//!
//! A proof is the ordered list of siblings from the leaf up to the root.
//! Each node carries the side it sits on, so verification never sorts
//! hashes and a proof cannot be replayed for a mirrored position.

use anchor_lang::prelude::*;

use crate::constants::MAX_PROOF_LEN;
use crate::error::VaultError;
use crate::merkle::hash::{hash_two_to_one, hashes_equal};

/// Side of the sibling relative to the running hash.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One sibling on the path to the root.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofNode {
    pub hash: [u8; 32],
    pub side: Side,
}

impl ProofNode {
    pub fn left(hash: [u8; 32]) -> Self {
        Self { hash, side: Side::Left }
    }

    pub fn right(hash: [u8; 32]) -> Self {
        Self { hash, side: Side::Right }
    }
}

/// Fold a leaf hash through its proof.
pub fn compute_root(leaf: [u8; 32], proof: &[ProofNode]) -> [u8; 32] {
    proof.iter().fold(leaf, |current, node| match node.side {
        Side::Left => hash_two_to_one(&node.hash, &current),
        Side::Right => hash_two_to_one(&current, &node.hash),
    })
}

/// Verify that `leaf` is committed under `root`.
///
/// # Errors
/// * `InvalidProofLength` if the proof is deeper than any accepted tree
/// * `InvalidProof` if the recomputed root differs
pub fn verify_proof(root: &[u8; 32], leaf: [u8; 32], proof: &[ProofNode]) -> Result<()> {
    require!(proof.len() <= MAX_PROOF_LEN, VaultError::InvalidProofLength);

    let computed = compute_root(leaf, proof);
    require!(hashes_equal(&computed, root), VaultError::InvalidProof);
    Ok(())
}
