//! Set Vault Admins Instruction

use anchor_lang::prelude::*;

use crate::events::VaultAdminsUpdated;
use crate::state::Vault;

#[derive(Accounts)]
pub struct SetVault<'info> {
    pub owner: Signer<'info>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,
}

pub fn handler(ctx: Context<SetVault>, admins: Vec<Pubkey>) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let vault = &mut ctx.accounts.vault;

    vault.require_owner(&owner)?;
    vault.set_admins(admins)?;

    emit!(VaultAdminsUpdated {
        vault: vault.key(),
        owner,
        admin_count: vault.admins.len() as u8,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Vault admins updated: {}", vault.admins.len());
    Ok(())
}
