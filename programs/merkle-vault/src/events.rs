//! Events for the Merkle Vault

use anchor_lang::prelude::*;

#[event]
pub struct VaultCreated {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub vault_signer: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct VaultAdminsUpdated {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub admin_count: u8,
    pub timestamp: i64,
}

#[event]
pub struct OwnershipTransferInitiated {
    pub vault: Pubkey,
    pub current_owner: Pubkey,
    pub pending_owner: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OwnershipTransferCompleted {
    pub vault: Pubkey,
    pub old_owner: Pubkey,
    pub new_owner: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OwnershipTransferCancelled {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub cancelled_pending: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct ScheduleCreated {
    pub vault: Pubkey,
    pub schedule: Pubkey,
    pub schedule_signer: Pubkey,
    pub event_id: u64,
    pub schedule_type: u8,
    pub user_count: u16,
    pub merkle_root: [u8; 32],
    pub timestamp: i64,
}

#[event]
pub struct ScheduleStatusChanged {
    pub schedule: Pubkey,
    pub admin: Pubkey,
    pub is_active: bool,
    pub timestamp: i64,
}

#[event]
pub struct RedeemIndexInitialized {
    pub schedule: Pubkey,
    pub redeem_index: Pubkey,
    pub index: u16,
    /// NFT the slot was opened for
    pub nft_mint: Pubkey,
    /// Key the slot is derived from (`NATIVE_MINT` for per-index scope)
    pub marker_key: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct Redeemed {
    pub schedule: Pubkey,
    pub index: u16,
    pub recipient: Pubkey,
    pub receiving_token_mint: Pubkey,
    pub receiving_amount: u64,
    pub sending_amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct SolWithdrawn {
    pub vault: Pubkey,
    pub admin: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct TokenWithdrawn {
    pub vault: Pubkey,
    pub admin: Pubkey,
    pub source: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}
