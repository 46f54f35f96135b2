//! Withdraw Token Instruction
//!
//! Moves SPL tokens out of a custody-owned token account. Owner or admin only.

use anchor_lang::prelude::*;
use anchor_spl::token::Token;

use crate::constants::SIGNER_SEED;
use crate::error::VaultError;
use crate::events::TokenWithdrawn;
use crate::state::Vault;
use crate::transfer::{load_token_account, Custody};

#[derive(Accounts)]
pub struct WithdrawToken<'info> {
    pub admin: Signer<'info>,

    pub vault: Account<'info, Vault>,

    /// CHECK: custody signer PDA, authority of `sender`
    #[account(
        seeds = [SIGNER_SEED, vault.key().as_ref()],
        bump = vault.signer_nonce,
    )]
    pub vault_signer: UncheckedAccount<'info>,

    /// CHECK: decoded and checked against the custody signer
    #[account(mut)]
    pub sender: UncheckedAccount<'info>,

    /// CHECK: decoded and checked against the sender's mint
    #[account(mut)]
    pub recipient: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<WithdrawToken>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::InvalidAmount);
    let admin = ctx.accounts.admin.key();
    ctx.accounts.vault.require_admin(&admin)?;

    let vault_signer = ctx.accounts.vault_signer.to_account_info();
    let sender = ctx.accounts.sender.to_account_info();
    let recipient = ctx.accounts.recipient.to_account_info();
    let mint = load_token_account(&sender)?.mint;

    let custody = Custody {
        vault: ctx.accounts.vault.key(),
        signer_nonce: ctx.accounts.vault.signer_nonce,
        signer: &vault_signer,
    };
    custody.pay_token(
        &ctx.accounts.token_program.to_account_info(),
        &sender,
        &recipient,
        &mint,
        amount,
    )?;

    emit!(TokenWithdrawn {
        vault: custody.vault,
        admin,
        source: sender.key(),
        recipient: recipient.key(),
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Withdrew {} tokens of {}", amount, mint);
    Ok(())
}
