//! Ownership Transfer Instructions (2-Step)

use anchor_lang::prelude::*;

use crate::events::{
    OwnershipTransferCancelled, OwnershipTransferCompleted, OwnershipTransferInitiated,
};
use crate::state::Vault;

#[derive(Accounts)]
pub struct TransferOwnership<'info> {
    pub owner: Signer<'info>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,
}

pub fn handler(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<()> {
    let current_owner = ctx.accounts.owner.key();
    let vault = &mut ctx.accounts.vault;

    vault.require_owner(&current_owner)?;
    vault.ownership.propose(new_owner)?;

    emit!(OwnershipTransferInitiated {
        vault: vault.key(),
        current_owner,
        pending_owner: new_owner,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Ownership transfer initiated to: {}", new_owner);
    Ok(())
}

#[derive(Accounts)]
pub struct AcceptOwnership<'info> {
    pub new_owner: Signer<'info>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,
}

pub fn accept_handler(ctx: Context<AcceptOwnership>) -> Result<()> {
    let new_owner = ctx.accounts.new_owner.key();
    let vault = &mut ctx.accounts.vault;

    let old_owner = vault.ownership.accept(&new_owner)?;

    emit!(OwnershipTransferCompleted {
        vault: vault.key(),
        old_owner,
        new_owner,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Ownership transfer completed");
    Ok(())
}

#[derive(Accounts)]
pub struct CancelOwnershipTransfer<'info> {
    pub owner: Signer<'info>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,
}

pub fn cancel_handler(ctx: Context<CancelOwnershipTransfer>) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let vault = &mut ctx.accounts.vault;

    vault.require_owner(&owner)?;
    let cancelled_pending = vault.ownership.cancel()?;

    emit!(OwnershipTransferCancelled {
        vault: vault.key(),
        owner,
        cancelled_pending,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Ownership transfer cancelled");
    Ok(())
}
