//! Redeem Token NFT Instruction
//!
//! Claim by whoever holds the specific NFT named in the leaf. The NFT must
//! sit in the claimant's associated token account and belong to a verified
//! collection. Redemption is tracked in the schedule bitmap.

use anchor_lang::prelude::*;
use anchor_spl::token::Token;

use crate::constants::{SCHEDULE_SEED, SIGNER_SEED};
use crate::error::VaultError;
use crate::events::Redeemed;
use crate::merkle::{Allocation, ProofNode};
use crate::nft;
use crate::redemption::process_claim;
use crate::state::{Schedule, ScheduleType, Vault};
use crate::transfer::{Custody, PayoutAccounts};

#[derive(Accounts)]
#[instruction(index: u16, timestamp: i64, nft_mint: Pubkey)]
pub struct RedeemTokenNft<'info> {
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [SCHEDULE_SEED, schedule.event_id.to_le_bytes().as_ref()],
        bump = schedule.bump,
        constraint = schedule.vault_id == vault.key() @ VaultError::InvalidVault,
    )]
    pub schedule: Account<'info, Schedule>,

    /// CHECK: custody signer PDA
    #[account(
        mut,
        seeds = [SIGNER_SEED, vault.key().as_ref()],
        bump = vault.signer_nonce,
    )]
    pub vault_signer: UncheckedAccount<'info>,

    /// CHECK: schedule's receiving account, decoded on token legs
    #[account(
        mut,
        address = schedule.receiving_token_account @ VaultError::InvalidAccount,
    )]
    pub vault_token_account: UncheckedAccount<'info>,

    /// NFT holder
    #[account(mut)]
    pub user: Signer<'info>,

    /// CHECK: decoded on token legs
    #[account(mut)]
    pub user_token_account: UncheckedAccount<'info>,

    /// CHECK: claimant's associated token account for `nft_mint`
    #[account(address = nft::nft_token_address(&user.key(), &nft_mint) @ VaultError::InvalidAccount)]
    pub user_nft_token_account: UncheckedAccount<'info>,

    /// CHECK: Metaplex metadata of `nft_mint`
    #[account(address = nft::find_metadata_address(&nft_mint).0 @ VaultError::InvalidMetadata)]
    pub nft_metadata_account: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[allow(clippy::too_many_arguments)]
pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, RedeemTokenNft<'info>>,
    index: u16,
    timestamp: i64,
    nft_mint: Pubkey,
    nft_collection: Pubkey,
    receiving_amount: u64,
    sending_amount: u64,
    proofs: Vec<ProofNode>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let user = ctx.accounts.user.key();

    nft::verify_nft_claim(
        &user,
        &nft_mint,
        &nft_collection,
        &ctx.accounts.user_nft_token_account.to_account_info(),
        &ctx.accounts.nft_metadata_account.to_account_info(),
    )?;

    let allocation = Allocation::nft(
        index,
        timestamp,
        nft_mint,
        nft_collection,
        receiving_amount,
        sending_amount,
    );
    let schedule = &mut ctx.accounts.schedule;
    let payout = process_claim(
        schedule,
        None,
        ScheduleType::NftDistribution,
        &allocation,
        &proofs,
        now,
    )?;

    let vault_signer = ctx.accounts.vault_signer.to_account_info();
    let accounts = PayoutAccounts {
        custody: Custody {
            vault: ctx.accounts.vault.key(),
            signer_nonce: ctx.accounts.vault.signer_nonce,
            signer: &vault_signer,
        },
        vault_token_account: &ctx.accounts.vault_token_account.to_account_info(),
        user: &ctx.accounts.user.to_account_info(),
        user_token_account: &ctx.accounts.user_token_account.to_account_info(),
        fee_accounts: ctx.remaining_accounts,
        token_program: &ctx.accounts.token_program.to_account_info(),
        system_program: &ctx.accounts.system_program.to_account_info(),
    };
    accounts.execute(&payout, &schedule.sending_token_account)?;

    emit!(Redeemed {
        schedule: schedule.key(),
        index,
        recipient: user,
        receiving_token_mint: payout.receiving.asset.mint(),
        receiving_amount,
        sending_amount,
        timestamp: now,
    });

    msg!("Redeemed index {} with NFT {}", index, nft_mint);
    Ok(())
}
