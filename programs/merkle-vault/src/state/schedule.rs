//! Distribution schedule account
//!
//! A schedule binds one Merkle root to a vault together with the assets
//! it pays out and the rule that keeps each leaf redeemable at most once.

use anchor_lang::prelude::*;

use crate::constants::NATIVE_MINT;
use crate::error::VaultError;
use crate::merkle::LeafEncoding;
use crate::state::tracker::RedemptionBitmap;

/// Kind of distribution. Wire value is the `u8` discriminant.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleType {
    Distribution,
    DistributionMulti,
    NftDistribution,
    NftCollectionDistribution,
}

impl TryFrom<u8> for ScheduleType {
    type Error = anchor_lang::error::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ScheduleType::Distribution),
            1 => Ok(ScheduleType::DistributionMulti),
            2 => Ok(ScheduleType::NftDistribution),
            3 => Ok(ScheduleType::NftCollectionDistribution),
            _ => err!(VaultError::InvalidScheduleType),
        }
    }
}

/// Where redemption state lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingMode {
    /// Bit per leaf inside the schedule account
    Bitmap,
    /// One `RedeemIndex` account per claim slot
    MarkerAccount,
}

impl ScheduleType {
    pub fn tracking_mode(self) -> TrackingMode {
        match self {
            ScheduleType::NftCollectionDistribution => TrackingMode::MarkerAccount,
            _ => TrackingMode::Bitmap,
        }
    }

    /// Leaf encoding for a schedule of this type.
    ///
    /// Fungible schedules created with a schedule-wide unlock time commit
    /// the older timestamp-less leaves.
    pub fn leaf_encoding(self, unlock_timestamp: i64) -> LeafEncoding {
        let legacy = unlock_timestamp > 0;
        match self {
            ScheduleType::Distribution if legacy => LeafEncoding::Legacy,
            ScheduleType::Distribution => LeafEncoding::Timestamped,
            ScheduleType::DistributionMulti if legacy => LeafEncoding::MultiLegacy,
            ScheduleType::DistributionMulti => LeafEncoding::MultiTimestamped,
            ScheduleType::NftDistribution => LeafEncoding::NftSpecific,
            ScheduleType::NftCollectionDistribution => LeafEncoding::NftCollection,
        }
    }

    pub fn is_nft(self) -> bool {
        matches!(
            self,
            ScheduleType::NftDistribution | ScheduleType::NftCollectionDistribution
        )
    }
}

/// Scope of a collection schedule's redeem index marker.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarkerScope {
    /// One marker per `(index, nft_mint)`: every NFT of the collection may
    /// claim each leaf once.
    #[default]
    PerMint,
    /// One marker per index: the first collection holder consumes the leaf.
    PerIndex,
}

impl MarkerScope {
    /// Last seed of the marker address.
    pub fn marker_key(self, nft_mint: &Pubkey) -> Pubkey {
        match self {
            MarkerScope::PerMint => *nft_mint,
            MarkerScope::PerIndex => NATIVE_MINT,
        }
    }
}

/// Distribution schedule.
///
/// PDA Seeds: `[SCHEDULE_SEED, event_id.to_le_bytes()]`
#[account]
pub struct Schedule {
    /// PDA bump seed
    pub bump: u8,

    /// Owning vault
    pub vault_id: Pubkey,

    /// Deployment-unique identifier; seeds the address
    pub event_id: u64,

    /// Unix timestamp of creation
    pub created_at: i64,

    /// Schedule-wide unlock time (0 = per-leaf timestamps)
    pub unlock_timestamp: i64,

    /// Root of the allocation tree (immutable)
    pub merkle_root: [u8; 32],

    pub schedule_type: ScheduleType,

    /// Marker scope for collection schedules
    pub marker_scope: MarkerScope,

    /// Asset paid to claimants (`NATIVE_MINT` for lamports)
    pub receiving_token_mint: Pubkey,

    /// Vault-signer token account the receiving leg is paid from
    pub receiving_token_account: Pubkey,

    /// Asset claimants pay back (`NATIVE_MINT` for lamports)
    pub sending_token_mint: Pubkey,

    /// Account the sending leg is paid into
    pub sending_token_account: Pubkey,

    pub is_active: bool,

    /// Number of committed leaves
    pub user_count: u16,

    /// Redemption bits (empty for marker-tracked schedules)
    pub redemptions: RedemptionBitmap,
}

/// Everything `create_schedule` takes besides accounts.
#[derive(Clone, Debug)]
pub struct ScheduleParams {
    pub event_id: u64,
    pub user_count: u16,
    pub unlock_timestamp: i64,
    pub merkle_root: [u8; 32],
    pub schedule_type: ScheduleType,
    pub marker_scope: MarkerScope,
    pub receiving_token_mint: Pubkey,
    pub receiving_token_account: Pubkey,
    pub sending_token_mint: Pubkey,
    pub sending_token_account: Pubkey,
}

impl Schedule {
    const FIXED_LEN: usize = 8 // discriminator
        + 1                     // bump
        + 32                    // vault_id
        + 8                     // event_id
        + 8                     // created_at
        + 8                     // unlock_timestamp
        + 32                    // merkle_root
        + 1                     // schedule_type
        + 1                     // marker_scope
        + 32 * 4                // mints and accounts
        + 1                     // is_active
        + 2                     // user_count
        + 4;                    // redemptions length prefix

    /// Account space with room for `tracked_leaves` redemption bits.
    pub fn space(tracked_leaves: u16) -> usize {
        Self::FIXED_LEN + RedemptionBitmap::byte_len(tracked_leaves)
    }

    /// Leaves that need a bit in the schedule account. Unknown type bytes
    /// reserve nothing; the handler rejects them.
    pub fn tracked_leaves(schedule_type: u8, user_count: u16) -> u16 {
        match ScheduleType::try_from(schedule_type).map(ScheduleType::tracking_mode) {
            Ok(TrackingMode::Bitmap) => user_count,
            _ => 0,
        }
    }

    pub fn initialize(
        &mut self,
        vault_id: Pubkey,
        bump: u8,
        now: i64,
        params: ScheduleParams,
    ) -> Result<()> {
        require!(params.user_count > 0, VaultError::InvalidUserCount);

        let tracked = match params.schedule_type.tracking_mode() {
            TrackingMode::Bitmap => params.user_count,
            TrackingMode::MarkerAccount => 0,
        };

        self.bump = bump;
        self.vault_id = vault_id;
        self.event_id = params.event_id;
        self.created_at = now;
        self.unlock_timestamp = params.unlock_timestamp;
        self.merkle_root = params.merkle_root;
        self.schedule_type = params.schedule_type;
        self.marker_scope = params.marker_scope;
        self.receiving_token_mint = params.receiving_token_mint;
        self.receiving_token_account = params.receiving_token_account;
        self.sending_token_mint = params.sending_token_mint;
        self.sending_token_account = params.sending_token_account;
        self.is_active = true;
        self.user_count = params.user_count;
        self.redemptions = RedemptionBitmap::new(tracked);
        Ok(())
    }

    #[inline]
    pub fn leaf_encoding(&self) -> LeafEncoding {
        self.schedule_type.leaf_encoding(self.unlock_timestamp)
    }

    #[inline]
    pub fn require_active(&self) -> Result<()> {
        require!(self.is_active, VaultError::ScheduleInactive);
        Ok(())
    }

    #[inline]
    pub fn require_type(&self, expected: ScheduleType) -> Result<()> {
        require!(self.schedule_type == expected, VaultError::WrongScheduleType);
        Ok(())
    }

    pub fn require_index(&self, index: u16) -> Result<()> {
        require!(index < self.user_count, VaultError::IndexOutOfRange);
        Ok(())
    }

    /// Unlock check for a leaf carrying `leaf_timestamp`.
    ///
    /// Legacy leaves only know the schedule time, timestamped fungible leaves
    /// only their own, and NFT leaves must pass both.
    pub fn require_unlocked(&self, leaf_timestamp: i64, now: i64) -> Result<()> {
        let unlock = match self.leaf_encoding() {
            LeafEncoding::Legacy | LeafEncoding::MultiLegacy => self.unlock_timestamp,
            LeafEncoding::Timestamped | LeafEncoding::MultiTimestamped => leaf_timestamp,
            LeafEncoding::NftSpecific | LeafEncoding::NftCollection => {
                self.unlock_timestamp.max(leaf_timestamp)
            }
        };
        require!(now >= unlock, VaultError::ScheduleLocked);
        Ok(())
    }

    /// Marker key for a collection claim made with `nft_mint`.
    #[inline]
    pub fn marker_key(&self, nft_mint: &Pubkey) -> Pubkey {
        self.marker_scope.marker_key(nft_mint)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::testkit::{assert_vault_err, blank_schedule as blank};

    pub(crate) fn params(schedule_type: ScheduleType, user_count: u16) -> ScheduleParams {
        ScheduleParams {
            event_id: 7,
            user_count,
            unlock_timestamp: 0,
            merkle_root: [0xAB; 32],
            schedule_type,
            marker_scope: MarkerScope::PerMint,
            receiving_token_mint: Pubkey::new_unique(),
            receiving_token_account: Pubkey::new_unique(),
            sending_token_mint: NATIVE_MINT,
            sending_token_account: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_schedule_type_from_wire() {
        assert_eq!(ScheduleType::try_from(0).unwrap(), ScheduleType::Distribution);
        assert_eq!(
            ScheduleType::try_from(3).unwrap(),
            ScheduleType::NftCollectionDistribution
        );
        assert_vault_err(ScheduleType::try_from(4), VaultError::InvalidScheduleType);
    }

    #[test]
    fn test_encoding_selection() {
        assert_eq!(ScheduleType::Distribution.leaf_encoding(0), LeafEncoding::Timestamped);
        assert_eq!(ScheduleType::Distribution.leaf_encoding(5), LeafEncoding::Legacy);
        assert_eq!(
            ScheduleType::DistributionMulti.leaf_encoding(5),
            LeafEncoding::MultiLegacy
        );
        assert_eq!(
            ScheduleType::NftCollectionDistribution.leaf_encoding(5),
            LeafEncoding::NftCollection
        );
    }

    #[test]
    fn test_space_matches_serialized_size() {
        for (schedule_type, count) in [
            (ScheduleType::Distribution, 1u16),
            (ScheduleType::NftDistribution, 17),
            (ScheduleType::NftCollectionDistribution, 500),
        ] {
            let mut schedule = blank();
            schedule
                .initialize(Pubkey::new_unique(), 255, 100, params(schedule_type, count))
                .unwrap();

            let mut data = Vec::new();
            schedule.try_serialize(&mut data).unwrap();
            let tracked = Schedule::tracked_leaves(schedule_type as u8, count);
            assert_eq!(data.len(), Schedule::space(tracked));
        }
    }

    #[test]
    fn test_collection_schedule_has_no_bitmap() {
        let mut schedule = blank();
        schedule
            .initialize(
                Pubkey::new_unique(),
                255,
                0,
                params(ScheduleType::NftCollectionDistribution, 1000),
            )
            .unwrap();
        assert_eq!(schedule.redemptions.len_bytes(), 0);
        assert_eq!(Schedule::tracked_leaves(3, 1000), 0);
        assert_eq!(Schedule::tracked_leaves(9, 1000), 0);
    }

    #[test]
    fn test_zero_user_count_rejected() {
        let mut schedule = blank();
        assert_vault_err(
            schedule.initialize(Pubkey::new_unique(), 255, 0, params(ScheduleType::Distribution, 0)),
            VaultError::InvalidUserCount,
        );
    }

    #[test]
    fn test_unlock_rules() {
        let mut schedule = blank();
        schedule.schedule_type = ScheduleType::Distribution;

        // Per-leaf timestamp.
        assert!(schedule.require_unlocked(100, 100).is_ok());
        assert_vault_err(schedule.require_unlocked(101, 100), VaultError::ScheduleLocked);

        // Schedule-wide timestamp wins for legacy leaves.
        schedule.unlock_timestamp = 50;
        assert!(schedule.require_unlocked(1_000, 60).is_ok());
        assert_vault_err(schedule.require_unlocked(0, 40), VaultError::ScheduleLocked);

        // NFT leaves need both.
        schedule.schedule_type = ScheduleType::NftDistribution;
        assert_vault_err(schedule.require_unlocked(70, 60), VaultError::ScheduleLocked);
        assert!(schedule.require_unlocked(70, 70).is_ok());
    }

    #[test]
    fn test_marker_scope_keys() {
        let mint = Pubkey::new_unique();
        assert_eq!(MarkerScope::PerMint.marker_key(&mint), mint);
        assert_eq!(MarkerScope::PerIndex.marker_key(&mint), NATIVE_MINT);
        assert_eq!(MarkerScope::default(), MarkerScope::PerMint);
    }
}
