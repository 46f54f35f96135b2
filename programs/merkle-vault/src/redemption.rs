//! Claim processing
//!
//! Every redeem instruction funnels through [`process_claim`], which decides
//! whether a claim is valid, consumes its slot in the tracker and returns
//! the payout. Moving assets is left to the caller; if that fails the
//! transaction aborts and the tracker update is rolled back with it.
//!
//! # Check order
//! 1. Schedule active, schedule type matches the instruction
//! 2. Index within `user_count`, proof not overlong
//! 3. Unlock time reached
//! 4. Leaf encoded under the schedule's encoding, proof folds to the root
//! 5. Slot not yet redeemed

use anchor_lang::prelude::*;

use crate::constants::{MAX_PROOF_LEN, NATIVE_MINT};
use crate::error::VaultError;
use crate::merkle::{verify_proof, Allocation, ProofNode};
use crate::state::{
    RedeemIndex, RedemptionTracker, Schedule, ScheduleType, Tracker, TrackingMode,
};

/// Asset moved by one payout leg.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Asset {
    /// Lamports
    Native,
    /// SPL token of this mint
    Token(Pubkey),
}

impl Asset {
    pub fn from_mint(mint: Pubkey) -> Self {
        if mint == NATIVE_MINT {
            Asset::Native
        } else {
            Asset::Token(mint)
        }
    }

    pub fn mint(&self) -> Pubkey {
        match self {
            Asset::Native => NATIVE_MINT,
            Asset::Token(mint) => *mint,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Leg {
    pub asset: Asset,
    pub amount: u64,
}

/// Transfers owed for an accepted claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    /// Vault custody → claimant
    pub receiving: Leg,
    /// Claimant → schedule's sending account, when the leaf asks for one
    pub sending: Option<Leg>,
}

/// Validate a claim against `schedule` and mark it redeemed.
///
/// `marker` is the claim slot's `RedeemIndex` for marker-tracked schedules
/// and is ignored otherwise.
pub fn process_claim(
    schedule: &mut Schedule,
    marker: Option<&mut RedeemIndex>,
    expected_type: ScheduleType,
    allocation: &Allocation,
    proof: &[ProofNode],
    now: i64,
) -> Result<Payout> {
    schedule.require_active()?;
    schedule.require_type(expected_type)?;
    schedule.require_index(allocation.index)?;
    require!(proof.len() <= MAX_PROOF_LEN, VaultError::InvalidProofLength);
    schedule.require_unlocked(allocation.timestamp, now)?;

    let leaf = allocation.leaf_hash(schedule.leaf_encoding())?;
    verify_proof(&schedule.merkle_root, leaf, proof)?;

    let receiving_mint = allocation
        .receiving_token_mint
        .unwrap_or(schedule.receiving_token_mint);
    let payout = Payout {
        receiving: Leg {
            asset: Asset::from_mint(receiving_mint),
            amount: allocation.receiving_amount,
        },
        sending: (allocation.sending_amount > 0).then(|| Leg {
            asset: Asset::from_mint(schedule.sending_token_mint),
            amount: allocation.sending_amount,
        }),
    };

    let mut tracker = match schedule.schedule_type.tracking_mode() {
        TrackingMode::Bitmap => Tracker::Bitmap(&mut schedule.redemptions),
        TrackingMode::MarkerAccount => {
            Tracker::Marker(marker.ok_or(VaultError::IndexNotInitialized)?)
        }
    };
    tracker.mark_redeemed(allocation.index)?;

    Ok(payout)
}
