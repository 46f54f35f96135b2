//! Unified error types for the Merkle Vault program
//!
//! Error codes are stable across versions for client compatibility.
//! Every rejection happens before the transaction commits, so none of
//! them leave partial state behind.

use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    // ========== Validation Errors ==========

    /// Schedule type byte is not one of the known variants
    #[msg("Invalid schedule type")]
    InvalidScheduleType, // 6000

    /// Leaf index is outside the schedule's declared user count
    #[msg("Leaf index out of declared range")]
    IndexOutOfRange, // 6001

    /// Proof is longer than any tree the program accepts
    #[msg("Invalid proof length")]
    InvalidProofLength, // 6002

    /// Amount must be greater than zero
    #[msg("Invalid amount: must be greater than zero")]
    InvalidAmount, // 6003

    /// Schedule must declare at least one leaf
    #[msg("Invalid user count: must be greater than zero")]
    InvalidUserCount, // 6004

    /// Admin list exceeds the vault capacity
    #[msg("Too many admins")]
    TooManyAdmins, // 6005

    /// Admin list contains the same address twice
    #[msg("Duplicate admin address")]
    DuplicateAdmin, // 6006

    /// Proposed owner is empty or already the owner
    #[msg("Invalid owner")]
    InvalidOwner, // 6007

    /// Two allocations share an index
    #[msg("Duplicate leaf index in allocation list")]
    DuplicateLeafIndex, // 6008

    /// Allocation indices are not 0..n
    #[msg("Allocation indices must be dense and start at zero")]
    NonContiguousLeafIndex, // 6009

    /// No allocations to commit
    #[msg("Allocation list is empty")]
    EmptyAllocation, // 6010

    // ========== Proof Errors ==========

    /// Merkle proof does not lead to the committed root
    #[msg("Invalid proof")]
    InvalidProof, // 6011

    /// Leaf fields do not fit the schedule's leaf encoding
    #[msg("Leaf fields do not match the schedule encoding")]
    LeafMismatch, // 6012

    // ========== State Errors ==========

    /// Schedule has been deactivated
    #[msg("Schedule inactive")]
    ScheduleInactive, // 6013

    /// Unlock time not reached
    #[msg("Schedule locked")]
    ScheduleLocked, // 6014

    /// Instruction used against the wrong kind of schedule
    #[msg("Wrong schedule type for this instruction")]
    WrongScheduleType, // 6015

    /// Leaf already redeemed (double-claim attempt)
    #[msg("Already redeemed")]
    AlreadyRedeemed, // 6016

    /// Redeem index marker must be initialized before claiming
    #[msg("Redeem index not initialized")]
    IndexNotInitialized, // 6017

    /// Account already exists at the derived address
    #[msg("Account already exists")]
    AccountAlreadyExists, // 6018

    /// No ownership transfer is pending
    #[msg("No pending ownership transfer")]
    NoPendingTransfer, // 6019

    // ========== Authorization Errors ==========

    /// Caller is not the owner, admin, or pending owner required
    #[msg("Unauthorized")]
    Unauthorized, // 6020

    /// Schedule belongs to another vault
    #[msg("Wrong vault id")]
    InvalidVault, // 6021

    /// Supplied address differs from the one derived from its seeds
    #[msg("Address does not match its derivation seeds")]
    InvalidDerivedAddress, // 6022

    // ========== NFT Errors ==========

    /// NFT token account is not for the claimed mint
    #[msg("Invalid mint account")]
    InvalidMintAccount, // 6023

    /// NFT token account does not hold exactly one unit
    #[msg("Invalid token amount")]
    InvalidTokenAmount, // 6024

    /// Metadata account could not be decoded
    #[msg("Invalid metadata")]
    InvalidMetadata, // 6025

    /// NFT does not belong to the expected collection
    #[msg("NFT collection mismatch")]
    InvalidCollection, // 6026

    /// Collection reference exists but is not verified
    #[msg("NFT collection is not verified")]
    UnverifiedCollection, // 6027

    // ========== Transfer Errors ==========

    /// Vault has insufficient balance for the payout
    #[msg("Insufficient vault balance")]
    InsufficientVaultBalance, // 6028

    /// Account is not an SPL token account
    #[msg("Invalid token account")]
    InvalidTokenAccount, // 6029

    /// Token account mint does not match the leg
    #[msg("Token mint does not match")]
    InvalidMint, // 6030

    /// Sending leg requires the claimant's fee token account
    #[msg("Fee token account missing")]
    MissingFeeAccount, // 6031

    /// Generic account mismatch
    #[msg("Invalid account")]
    InvalidAccount, // 6032

    /// Arithmetic overflow occurred
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow, // 6033
}
