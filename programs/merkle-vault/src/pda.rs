//! Program-derived addresses
//!
//! Pure and reproducible off-chain. On-chain callers compare the supplied
//! account against these, never substituting the derived address.

use anchor_lang::prelude::*;
use solana_program::hash::hash;

use crate::constants::{REDEEM_INDEX_SEED, SCHEDULE_SEED, SIGNER_SEED, VAULT_SEED};
use crate::error::VaultError;

/// Vault path seed for a human-readable vault name.
pub fn vault_derivation_path(name: &str) -> [u8; 32] {
    hash(name.as_bytes()).to_bytes()
}

/// Event id as it appears in seeds.
#[inline]
pub fn event_id_seed(event_id: u64) -> [u8; 8] {
    event_id.to_le_bytes()
}

pub fn find_vault_address(program_id: &Pubkey, vault_path: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, vault_path.as_ref()], program_id)
}

/// Custody signer of a vault. Holds lamports and owns the vault token accounts.
pub fn find_vault_signer_address(program_id: &Pubkey, vault: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SIGNER_SEED, vault.as_ref()], program_id)
}

pub fn find_schedule_address(program_id: &Pubkey, event_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SCHEDULE_SEED, &event_id_seed(event_id)], program_id)
}

/// Schedule-scoped signer, published for clients that segregate custody
/// per schedule.
pub fn find_schedule_signer_address(program_id: &Pubkey, schedule: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SIGNER_SEED, schedule.as_ref()], program_id)
}

pub fn find_redeem_index_address(
    program_id: &Pubkey,
    event_id: u64,
    index: u16,
    marker_key: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            REDEEM_INDEX_SEED,
            &event_id_seed(event_id),
            &index.to_le_bytes(),
            marker_key.as_ref(),
        ],
        program_id,
    )
}

/// Signer seeds for the vault custody signer (when bump is known).
pub fn vault_signer_seeds<'a>(vault: &'a Pubkey, bump: &'a [u8; 1]) -> [&'a [u8]; 3] {
    [SIGNER_SEED, vault.as_ref(), bump]
}

/// Reject `supplied` unless it equals the derived `expected`.
pub fn verify_address(supplied: &Pubkey, expected: &Pubkey) -> Result<()> {
    require_keys_eq!(*supplied, *expected, VaultError::InvalidDerivedAddress);
    Ok(())
}
