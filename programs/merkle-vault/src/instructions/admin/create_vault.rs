//! Create Vault Instruction

use anchor_lang::prelude::*;

use crate::constants::VAULT_SEED;
use crate::events::VaultCreated;
use crate::pda;
use crate::state::Vault;

#[derive(Accounts)]
#[instruction(vault_path: [u8; 32])]
pub struct CreateVault<'info> {
    /// Payer, becomes the vault owner
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        init,
        payer = owner,
        space = Vault::space(),
        seeds = [VAULT_SEED, vault_path.as_ref()],
        bump,
    )]
    pub vault: Account<'info, Vault>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CreateVault>, _vault_path: [u8; 32]) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let vault_key = ctx.accounts.vault.key();
    let (vault_signer, signer_nonce) = pda::find_vault_signer_address(ctx.program_id, &vault_key);

    let vault = &mut ctx.accounts.vault;
    vault.initialize(owner, ctx.bumps.vault, signer_nonce);

    emit!(VaultCreated {
        vault: vault_key,
        owner,
        vault_signer,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Vault created, custody signer: {}", vault_signer);
    Ok(())
}
