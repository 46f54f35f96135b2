//! Off-chain tree builder
//!
//! Distributors build the tree once from the allocation list, publish the
//! root in `create_schedule`, and hand each claimant `proof(index)`.
//!
//! Leaves sit at their allocation index. A level with an odd number of
//! nodes promotes its last node unchanged; that node contributes no proof
//! entry at that level.

use anchor_lang::prelude::*;

use crate::error::VaultError;
use crate::merkle::hash::hash_two_to_one;
use crate::merkle::leaf::{Allocation, LeafEncoding};
use crate::merkle::proof::ProofNode;

/// Fully materialized commitment tree. `levels[0]` holds the leaves.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    levels: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    /// Build the tree for `allocations` under `encoding`.
    ///
    /// # Errors
    /// * `EmptyAllocation` if there is nothing to commit
    /// * `DuplicateLeafIndex` if two allocations share an index
    /// * `NonContiguousLeafIndex` if indices are not exactly `0..n`
    /// * `LeafMismatch` if an allocation does not fit `encoding`
    pub fn build(encoding: LeafEncoding, allocations: &[Allocation]) -> Result<Self> {
        require!(!allocations.is_empty(), VaultError::EmptyAllocation);

        let mut leaves: Vec<Option<[u8; 32]>> = vec![None; allocations.len()];
        for allocation in allocations {
            let slot = leaves
                .get_mut(usize::from(allocation.index))
                .ok_or(VaultError::NonContiguousLeafIndex)?;
            require!(slot.is_none(), VaultError::DuplicateLeafIndex);
            *slot = Some(allocation.leaf_hash(encoding)?);
        }

        // n distinct indices all below n fill every slot.
        let leaves: Vec<[u8; 32]> = leaves.into_iter().flatten().collect();
        Ok(Self::from_leaves(leaves))
    }

    /// Build directly from precomputed leaf hashes.
    pub fn from_leaves(leaves: Vec<[u8; 32]>) -> Self {
        let mut levels = vec![leaves];
        while levels.last().map_or(false, |level| level.len() > 1) {
            let below = &levels[levels.len() - 1];
            let next = below
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_two_to_one(left, right),
                    promoted => promoted[0],
                })
                .collect();
            levels.push(next);
        }
        Self { levels }
    }

    /// Number of committed leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Leaf hash at `index`.
    pub fn leaf(&self, index: usize) -> Option<[u8; 32]> {
        self.levels.first().and_then(|leaves| leaves.get(index).copied())
    }

    /// Root to publish in the schedule.
    pub fn root(&self) -> [u8; 32] {
        self.levels
            .last()
            .and_then(|top| top.first().copied())
            .unwrap_or([0u8; 32])
    }

    /// Proof for the leaf at `index`, or `None` when out of range.
    pub fn proof(&self, index: usize) -> Option<Vec<ProofNode>> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut proof = Vec::with_capacity(self.levels.len());
        let mut position = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = position ^ 1;
            if let Some(hash) = level.get(sibling) {
                proof.push(if position % 2 == 0 {
                    ProofNode::right(*hash)
                } else {
                    ProofNode::left(*hash)
                });
            }
            position /= 2;
        }
        Some(proof)
    }
}
