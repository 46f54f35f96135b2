//! Program-wide constants.
//!
//! Seed byte values are part of the address compatibility surface: changing
//! any of them moves every derived account and requires a new program id.

use anchor_lang::prelude::*;

/// Seed prefix for vault records: `[VAULT_SEED, sha256(vault_name)]`.
pub const VAULT_SEED: &[u8] = &[93, 85, 196, 21, 227, 86, 221, 123];

/// Seed prefix for custody signers: `[SIGNER_SEED, vault_or_schedule]`.
pub const SIGNER_SEED: &[u8] = &[2, 151, 229, 53, 244, 77, 229, 7];

/// Seed prefix for schedules: `[SCHEDULE_SEED, event_id_le]`.
pub const SCHEDULE_SEED: &[u8] = &[244, 131, 10, 29, 174, 41, 128, 68];

/// Seed prefix for redeem index markers (`b"redeem_index"`).
pub const REDEEM_INDEX_SEED: &[u8] = &[114, 101, 100, 101, 101, 109, 95, 105, 110, 100, 101, 120];

/// Metaplex metadata PDA prefix.
pub const METADATA_SEED: &[u8] = b"metadata";

/// Mint sentinel for the native asset. A leg whose mint equals this
/// is paid in lamports instead of SPL tokens.
pub const NATIVE_MINT: Pubkey = anchor_lang::system_program::ID;

/// Maximum number of admins a vault can hold.
pub const MAX_ADMINS: usize = 16;

/// Maximum proof length accepted by the verifier (2^32 leaves).
pub const MAX_PROOF_LEN: usize = 32;
