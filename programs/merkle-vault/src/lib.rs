//! Merkle Vault
//!
//! Custodial distribution of tokens and lamports against Merkle roots
//! committed per schedule. Claimants prove their allocation with a Merkle
//! proof; each allocation pays out at most once, tracked either in a
//! bitmap on the schedule or in a per-claim `RedeemIndex` account.

use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod merkle;
pub mod nft;
pub mod pda;
pub mod redemption;
pub mod state;
pub mod transfer;

#[cfg(test)]
mod testkit;

use instructions::*;
use merkle::ProofNode;
use state::MarkerScope;

#[cfg(feature = "mainnet")]
declare_id!("VLT2aFKdnYyseZgjWcW5TNu9gLMCUiRuQNZN5FhK45Q");

#[cfg(all(feature = "devnet", not(feature = "mainnet")))]
declare_id!("VT2uRTAsYJRavhAVcvSjk9TzyNeP1ccA6KUUD5JxeHj");

#[cfg(not(any(feature = "mainnet", feature = "devnet")))]
declare_id!("7fCiqPGJdD254RS3iUYFHL1ACtqFX78YXHwYhkbLWpXY");

#[program]
pub mod merkle_vault {
    use super::*;

    // ---- Vault administration ----

    pub fn create_vault(ctx: Context<CreateVault>, vault_path: [u8; 32]) -> Result<()> {
        instructions::admin::create_vault::handler(ctx, vault_path)
    }

    pub fn set_vault(ctx: Context<SetVault>, admins: Vec<Pubkey>) -> Result<()> {
        instructions::admin::set_vault::handler(ctx, admins)
    }

    pub fn transfer_ownership(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<()> {
        instructions::admin::transfer_ownership::handler(ctx, new_owner)
    }

    pub fn accept_ownership(ctx: Context<AcceptOwnership>) -> Result<()> {
        instructions::admin::transfer_ownership::accept_handler(ctx)
    }

    pub fn cancel_ownership_transfer(ctx: Context<CancelOwnershipTransfer>) -> Result<()> {
        instructions::admin::transfer_ownership::cancel_handler(ctx)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_schedule(
        ctx: Context<CreateSchedule>,
        user_count: u16,
        event_id: u64,
        timestamp: i64,
        merkle_root: [u8; 32],
        schedule_type: u8,
        receiving_token_mint: Pubkey,
        receiving_token_account: Pubkey,
        sending_token_mint: Pubkey,
        sending_token_account: Pubkey,
        marker_scope: MarkerScope,
    ) -> Result<()> {
        instructions::admin::create_schedule::handler(
            ctx,
            user_count,
            event_id,
            timestamp,
            merkle_root,
            schedule_type,
            receiving_token_mint,
            receiving_token_account,
            sending_token_mint,
            sending_token_account,
            marker_scope,
        )
    }

    pub fn set_schedule_status(ctx: Context<SetScheduleStatus>, is_active: bool) -> Result<()> {
        instructions::admin::set_schedule_status::handler(ctx, is_active)
    }

    pub fn withdraw_sol(ctx: Context<WithdrawSol>, amount: u64) -> Result<()> {
        instructions::admin::withdraw_sol::handler(ctx, amount)
    }

    pub fn withdraw_token(ctx: Context<WithdrawToken>, amount: u64) -> Result<()> {
        instructions::admin::withdraw_token::handler(ctx, amount)
    }

    // ---- Claims ----

    pub fn redeem_token<'info>(
        ctx: Context<'_, '_, '_, 'info, RedeemToken<'info>>,
        index: u16,
        timestamp: i64,
        proofs: Vec<ProofNode>,
        receiving_amount: u64,
        sending_amount: u64,
    ) -> Result<()> {
        instructions::redeem_token::handler(
            ctx,
            index,
            timestamp,
            proofs,
            receiving_amount,
            sending_amount,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn redeem_token_multi<'info>(
        ctx: Context<'_, '_, '_, 'info, RedeemTokenMulti<'info>>,
        index: u16,
        timestamp: i64,
        proofs: Vec<ProofNode>,
        receiving_token_mint: Pubkey,
        receiving_amount: u64,
        sending_amount: u64,
    ) -> Result<()> {
        instructions::redeem_token_multi::handler(
            ctx,
            index,
            timestamp,
            proofs,
            receiving_token_mint,
            receiving_amount,
            sending_amount,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn redeem_token_nft<'info>(
        ctx: Context<'_, '_, '_, 'info, RedeemTokenNft<'info>>,
        index: u16,
        timestamp: i64,
        nft_mint: Pubkey,
        nft_collection: Pubkey,
        receiving_amount: u64,
        sending_amount: u64,
        proofs: Vec<ProofNode>,
    ) -> Result<()> {
        instructions::redeem_token_nft::handler(
            ctx,
            index,
            timestamp,
            nft_mint,
            nft_collection,
            receiving_amount,
            sending_amount,
            proofs,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn redeem_token_nft_collection<'info>(
        ctx: Context<'_, '_, '_, 'info, RedeemTokenNftCollection<'info>>,
        index: u16,
        timestamp: i64,
        nft_mint: Pubkey,
        nft_collection: Pubkey,
        receiving_amount: u64,
        sending_amount: u64,
        proofs: Vec<ProofNode>,
    ) -> Result<()> {
        instructions::redeem_token_nft_collection::handler(
            ctx,
            index,
            timestamp,
            nft_mint,
            nft_collection,
            receiving_amount,
            sending_amount,
            proofs,
        )
    }

    pub fn init_redeem_index(
        ctx: Context<InitRedeemIndex>,
        index: u16,
        nft_mint: Pubkey,
    ) -> Result<()> {
        instructions::init_redeem_index::handler(ctx, index, nft_mint)
    }
}
