//! Redeem Token Instruction
//!
//! Fungible claim by the wallet named in the leaf. The leaf is rebuilt from
//! the signer and the arguments; the schedule picks its encoding.

use anchor_lang::prelude::*;
use anchor_spl::token::Token;

use crate::constants::{SCHEDULE_SEED, SIGNER_SEED};
use crate::error::VaultError;
use crate::events::Redeemed;
use crate::merkle::{Allocation, ProofNode};
use crate::redemption::process_claim;
use crate::state::{Schedule, ScheduleType, Vault};
use crate::transfer::{Custody, PayoutAccounts};

#[derive(Accounts)]
pub struct RedeemToken<'info> {
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

    /// Wallet named in the leaf
    #[account(mut)]
    pub user: Signer<'info>,

    /// CHECK: decoded on token legs
    #[account(mut)]
    pub user_token_account: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, RedeemToken<'info>>,
    index: u16,
    timestamp: i64,
    proofs: Vec<ProofNode>,
    receiving_amount: u64,
    sending_amount: u64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let user = ctx.accounts.user.key();
    let allocation = Allocation::wallet(index, timestamp, user, receiving_amount, sending_amount);

    let schedule = &mut ctx.accounts.schedule;
    let payout = process_claim(schedule, None, ScheduleType::Distribution, &allocation, &proofs, now)?;

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

    msg!("Redeemed index {}", index);
    Ok(())
}
