//! NFT gating for redeem instructions
//!
//! A claimant proves it holds the NFT through its associated token account
//! for the mint, and the Metaplex metadata must name the expected
//! collection as verified.

use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::metadata::mpl_token_metadata::{self, accounts::Metadata, types::Collection};
use anchor_spl::token::{self, TokenAccount};

use crate::constants::METADATA_SEED;
use crate::error::VaultError;

/// Metaplex metadata PDA of `mint`.
pub fn find_metadata_address(mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[METADATA_SEED, mpl_token_metadata::ID.as_ref(), mint.as_ref()],
        &mpl_token_metadata::ID,
    )
}

/// Associated token account holding `mint` for `owner`.
pub fn nft_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Token account fields prove `holder` owns exactly one unit of `nft_mint`.
pub fn verify_holding(
    holder: &Pubkey,
    nft_mint: &Pubkey,
    account_owner: &Pubkey,
    account_mint: &Pubkey,
    amount: u64,
) -> Result<()> {
    require_keys_eq!(*account_owner, *holder, VaultError::Unauthorized);
    require_keys_eq!(*account_mint, *nft_mint, VaultError::InvalidMintAccount);
    require!(amount == 1, VaultError::InvalidTokenAmount);
    Ok(())
}

/// Metadata collection must be `expected` and verified.
pub fn verify_collection(collection: Option<&Collection>, expected: &Pubkey) -> Result<()> {
    let collection = collection.ok_or(VaultError::InvalidCollection)?;
    require_keys_eq!(collection.key, *expected, VaultError::InvalidCollection);
    require!(collection.verified, VaultError::UnverifiedCollection);
    Ok(())
}

/// Full on-chain check of an NFT-gated claim.
pub fn verify_nft_claim(
    holder: &Pubkey,
    nft_mint: &Pubkey,
    expected_collection: &Pubkey,
    nft_token_account: &AccountInfo,
    nft_metadata_account: &AccountInfo,
) -> Result<()> {
    require_keys_eq!(
        *nft_token_account.owner,
        token::ID,
        VaultError::InvalidTokenAccount
    );
    let data = nft_token_account.try_borrow_data()?;
    let holding = TokenAccount::try_deserialize(&mut &data[..])
        .map_err(|_| error!(VaultError::InvalidTokenAccount))?;
    verify_holding(holder, nft_mint, &holding.owner, &holding.mint, holding.amount)?;

    require_keys_eq!(
        *nft_metadata_account.owner,
        mpl_token_metadata::ID,
        VaultError::InvalidMetadata
    );
    let data = nft_metadata_account.try_borrow_data()?;
    let metadata =
        Metadata::safe_deserialize(&data).map_err(|_| error!(VaultError::InvalidMetadata))?;
    require_keys_eq!(metadata.mint, *nft_mint, VaultError::InvalidMetadata);

    verify_collection(metadata.collection.as_ref(), expected_collection)
}
