//! At-most-once redemption tracking
//!
//! Two stores implement the same contract: a bitmap embedded in the
//! schedule account, and one `RedeemIndex` account per claim slot for
//! collection schedules. The claim path only sees `RedemptionTracker`.

use anchor_lang::prelude::*;

use crate::error::VaultError;
use crate::state::redeem_index::RedeemIndex;

/// Idempotency store for leaf indices.
pub trait RedemptionTracker {
    fn is_redeemed(&self, index: u16) -> Result<bool>;

    /// Flip `index` from unredeemed to redeemed.
    ///
    /// # Errors
    /// * `AlreadyRedeemed` if it was already set
    fn mark_redeemed(&mut self, index: u16) -> Result<()>;
}

/// One bit per leaf, little-endian within each byte.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RedemptionBitmap {
    bits: Vec<u8>,
}

impl RedemptionBitmap {
    /// Bytes needed for `leaf_count` bits.
    pub fn byte_len(leaf_count: u16) -> usize {
        (usize::from(leaf_count) + 7) / 8
    }

    pub fn new(leaf_count: u16) -> Self {
        Self {
            bits: vec![0u8; Self::byte_len(leaf_count)],
        }
    }

    pub fn len_bytes(&self) -> usize {
        self.bits.len()
    }

    /// Number of redeemed leaves.
    pub fn count_redeemed(&self) -> u32 {
        self.bits.iter().map(|byte| byte.count_ones()).sum()
    }

    fn locate(&self, index: u16) -> Result<(usize, u8)> {
        let byte = usize::from(index / 8);
        require!(byte < self.bits.len(), VaultError::IndexOutOfRange);
        Ok((byte, 1u8 << (index % 8)))
    }
}

impl RedemptionTracker for RedemptionBitmap {
    fn is_redeemed(&self, index: u16) -> Result<bool> {
        let (byte, mask) = self.locate(index)?;
        Ok(self.bits[byte] & mask != 0)
    }

    fn mark_redeemed(&mut self, index: u16) -> Result<()> {
        let (byte, mask) = self.locate(index)?;
        require!(self.bits[byte] & mask == 0, VaultError::AlreadyRedeemed);
        self.bits[byte] |= mask;
        Ok(())
    }
}

/// Tracker chosen from the schedule's tracking mode.
pub enum Tracker<'a> {
    Bitmap(&'a mut RedemptionBitmap),
    Marker(&'a mut RedeemIndex),
}

impl RedemptionTracker for Tracker<'_> {
    fn is_redeemed(&self, index: u16) -> Result<bool> {
        match self {
            Tracker::Bitmap(bitmap) => bitmap.is_redeemed(index),
            Tracker::Marker(marker) => marker.is_redeemed(index),
        }
    }

    fn mark_redeemed(&mut self, index: u16) -> Result<()> {
        match self {
            Tracker::Bitmap(bitmap) => bitmap.mark_redeemed(index),
            Tracker::Marker(marker) => marker.mark_redeemed(index),
        }
    }
}
