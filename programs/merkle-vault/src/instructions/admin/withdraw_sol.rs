//! Withdraw SOL Instruction
//!
//! Moves lamports out of vault custody. Owner or admin only.

use anchor_lang::prelude::*;

use crate::constants::SIGNER_SEED;
use crate::error::VaultError;
use crate::events::SolWithdrawn;
use crate::state::Vault;
use crate::transfer::Custody;

#[derive(Accounts)]
pub struct WithdrawSol<'info> {
    pub admin: Signer<'info>,

    pub vault: Account<'info, Vault>,

    /// CHECK: custody signer PDA, holds no data
    #[account(
        mut,
        seeds = [SIGNER_SEED, vault.key().as_ref()],
        bump = vault.signer_nonce,
    )]
    pub vault_signer: UncheckedAccount<'info>,

    /// CHECK: any lamport destination
    #[account(mut)]
    pub recipient: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<WithdrawSol>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::InvalidAmount);
    let admin = ctx.accounts.admin.key();
    ctx.accounts.vault.require_admin(&admin)?;

    let vault_signer = ctx.accounts.vault_signer.to_account_info();
    let recipient = ctx.accounts.recipient.to_account_info();
    let custody = Custody {
        vault: ctx.accounts.vault.key(),
        signer_nonce: ctx.accounts.vault.signer_nonce,
        signer: &vault_signer,
    };
    custody.pay_native(&ctx.accounts.system_program.to_account_info(), &recipient, amount)?;

    emit!(SolWithdrawn {
        vault: custody.vault,
        admin,
        recipient: recipient.key(),
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Withdrew {} lamports", amount);
    Ok(())
}
