//! Redeem index marker for collection schedules
//!
//! Each claim slot gets its own account, created ahead of the claim by
//! `init_redeem_index`. Existence at the derived address blocks a second
//! initialization; `is_redeemed` blocks a second claim.
//!
//! PDA Seeds: `[REDEEM_INDEX_SEED, event_id.to_le_bytes(), index.to_le_bytes(), marker_key]`

use anchor_lang::prelude::*;

use crate::error::VaultError;
use crate::state::tracker::RedemptionTracker;

#[account]
pub struct RedeemIndex {
    /// PDA bump seed
    pub bump: u8,

    /// Schedule this marker belongs to
    pub schedule: Pubkey,

    /// Leaf index guarded by this marker
    pub index: u16,

    /// Marker key (NFT mint, or `NATIVE_MINT` for per-index scope)
    pub nft_mint: Pubkey,

    pub is_redeemed: bool,
}

impl RedeemIndex {
    pub const LEN: usize = 8 // discriminator
        + 1                  // bump
        + 32                 // schedule
        + 2                  // index
        + 32                 // nft_mint
        + 1;                 // is_redeemed

    pub fn new(bump: u8, schedule: Pubkey, index: u16, nft_mint: Pubkey) -> Self {
        Self {
            bump,
            schedule,
            index,
            nft_mint,
            is_redeemed: false,
        }
    }

    /// Bind the marker to the claim it is used for.
    pub fn require_slot(&self, schedule: &Pubkey, index: u16, marker_key: &Pubkey) -> Result<()> {
        require_keys_eq!(self.schedule, *schedule, VaultError::InvalidAccount);
        require_keys_eq!(self.nft_mint, *marker_key, VaultError::InvalidAccount);
        require!(self.index == index, VaultError::InvalidAccount);
        Ok(())
    }
}

/// Account-level access. The marker lives in a PDA created by hand, so
/// these stand in for Anchor's `Account` loading.
impl RedeemIndex {
    /// Marker stored at `info`, or `None` while the slot is vacant.
    pub fn load(info: &AccountInfo, program_id: &Pubkey) -> Result<Option<Self>> {
        if info.owner != program_id || info.data_is_empty() {
            return Ok(None);
        }
        let data = info.try_borrow_data()?;
        RedeemIndex::try_deserialize(&mut &data[..]).map(Some)
    }

    /// Write the marker back into its account.
    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        let mut data = info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        self.try_serialize(&mut writer)
    }

    /// No marker has been created at `info` yet.
    pub fn require_vacant(info: &AccountInfo, program_id: &Pubkey) -> Result<()> {
        require!(
            info.owner != program_id && info.data_is_empty(),
            VaultError::AccountAlreadyExists
        );
        Ok(())
    }
}

impl RedemptionTracker for RedeemIndex {
    fn is_redeemed(&self, index: u16) -> Result<bool> {
        require!(self.index == index, VaultError::InvalidAccount);
        Ok(self.is_redeemed)
    }

    fn mark_redeemed(&mut self, index: u16) -> Result<()> {
        require!(self.index == index, VaultError::InvalidAccount);
        require!(!self.is_redeemed, VaultError::AlreadyRedeemed);
        self.is_redeemed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::assert_vault_err;

    #[test]
    fn test_len_matches_serialized_size() {
        let marker = RedeemIndex::new(1, Pubkey::new_unique(), 4, Pubkey::new_unique());
        let mut data = Vec::new();
        marker.try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), RedeemIndex::LEN);
    }

    #[test]
    fn test_marker_redeems_once() {
        let mut marker = RedeemIndex::new(1, Pubkey::new_unique(), 4, Pubkey::new_unique());
        assert!(!marker.is_redeemed(4).unwrap());
        marker.mark_redeemed(4).unwrap();
        assert!(marker.is_redeemed(4).unwrap());
        assert_vault_err(marker.mark_redeemed(4), VaultError::AlreadyRedeemed);
    }

    #[test]
    fn test_store_then_load() {
        let key = Pubkey::new_unique();
        let schedule = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let mut lamports = 1_000_000u64;
        let mut data = vec![0u8; RedeemIndex::LEN];
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &crate::ID, false, 0);

        let mut marker = RedeemIndex::new(254, schedule, 3, mint);
        marker.mark_redeemed(3).unwrap();
        marker.store(&info).unwrap();

        let loaded = RedeemIndex::load(&info, &crate::ID).unwrap().unwrap();
        assert_eq!(loaded.bump, 254);
        assert_eq!(loaded.schedule, schedule);
        assert_eq!(loaded.index, 3);
        assert_eq!(loaded.nft_mint, mint);
        assert!(loaded.is_redeemed);
        assert_vault_err(
            RedeemIndex::require_vacant(&info, &crate::ID),
            VaultError::AccountAlreadyExists,
        );
    }

    #[test]
    fn test_vacant_slot_loads_as_none() {
        let key = Pubkey::new_unique();
        let system = anchor_lang::system_program::ID;
        let mut lamports = 0u64;
        let mut data: Vec<u8> = Vec::new();
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &system, false, 0);

        assert!(RedeemIndex::load(&info, &crate::ID).unwrap().is_none());
        assert!(RedeemIndex::require_vacant(&info, &crate::ID).is_ok());
    }

    #[test]
    fn test_prefunded_slot_is_still_vacant() {
        let key = Pubkey::new_unique();
        let system = anchor_lang::system_program::ID;
        let mut lamports = 5_000u64;
        let mut data: Vec<u8> = Vec::new();
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &system, false, 0);
        assert!(RedeemIndex::require_vacant(&info, &crate::ID).is_ok());
    }

    #[test]
    fn test_program_account_with_foreign_data_rejected() {
        let key = Pubkey::new_unique();
        let mut lamports = 1u64;
        let mut data = vec![0u8; RedeemIndex::LEN];
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &crate::ID, false, 0);

        assert!(RedeemIndex::load(&info, &crate::ID).is_err());
        assert_vault_err(
            RedeemIndex::require_vacant(&info, &crate::ID),
            VaultError::AccountAlreadyExists,
        );
    }

    #[test]
    fn test_marker_bound_to_its_slot() {
        let schedule = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let mut marker = RedeemIndex::new(1, schedule, 4, mint);

        assert!(marker.require_slot(&schedule, 4, &mint).is_ok());
        assert_vault_err(marker.require_slot(&schedule, 5, &mint), VaultError::InvalidAccount);
        assert_vault_err(
            marker.require_slot(&Pubkey::new_unique(), 4, &mint),
            VaultError::InvalidAccount,
        );
        assert_vault_err(marker.mark_redeemed(5), VaultError::InvalidAccount);
        assert!(!marker.is_redeemed);
    }
}
